use crate::models::{Direction, DirectionTitles, LineRoute};
use crate::stores::Stores;
use crate::theme::LineTheme;

/// Everything a line header needs to render, composed per call from the
/// stores; nothing here is cached
#[derive(Debug, Clone, PartialEq)]
pub struct LineView {
    pub code: String,
    /// The explicitly selected route, or the line's default when none is
    /// selected yet
    pub route: Option<LineRoute>,
    pub direction: Direction,
    pub titles: Option<DirectionTitles>,
    pub visible: bool,
    pub theme: LineTheme,
}

/// Read model and command surface for the pinned-line headers.
///
/// Commands are synchronous fire-and-forget into the store bundle; reads
/// re-compose from current store state on every call.
#[derive(Clone)]
pub struct SelectedLineViewModel {
    stores: Stores,
}

impl SelectedLineViewModel {
    #[must_use]
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    /// The composed view of one pinned line, `None` when not pinned
    #[must_use]
    pub fn line(&self, code: &str) -> Option<LineView> {
        let theme = self.stores.lines.theme_of(code)?;
        let route = self.resolved_route(code);

        Some(LineView {
            code: code.to_string(),
            direction: route.as_ref().map_or(Direction::default(), LineRoute::direction),
            titles: route.as_ref().and_then(LineRoute::titles),
            route,
            visible: self.stores.filters.is_visible(code),
            theme,
        })
    }

    /// Composed views for the lines under the active group filter, in pin
    /// order
    #[must_use]
    pub fn lines(&self) -> Vec<LineView> {
        self.stores
            .effective_lines()
            .iter()
            .filter_map(|code| self.line(code))
            .collect()
    }

    /// Select the opposite-direction counterpart of the line's current
    /// route. Prefers the route whose code differs only in the direction
    /// segment; falls back to the first route of the opposite direction.
    /// No-op when the line has no such counterpart.
    pub fn switch_direction(&self, code: &str) {
        let Some(current) = self.resolved_route(code) else { return };
        let routes = self.stores.lines.routes_of(code);
        let opposite = current.direction().opposite();

        let counterpart_code = swap_direction_segment(&current.route_code, opposite);
        let target = routes
            .iter()
            .find(|r| r.route_code == counterpart_code)
            .or_else(|| routes.iter().find(|r| r.direction() == opposite));

        if let Some(target) = target {
            self.stores.select_route(code, &target.route_code);
        }
    }

    /// Unpin the line, tearing down its state across all stores
    pub fn delete_line(&self, code: &str) {
        self.stores.delete_line(code);
    }

    /// Hide or show the line on the map; a hidden line stays tracked
    pub fn toggle_visibility(&self, code: &str) {
        self.stores.filters.toggle_line_visibility(code);
    }

    fn resolved_route(&self, code: &str) -> Option<LineRoute> {
        let routes = self.stores.lines.routes_of(code);

        if let Some(selected) = self.stores.filters.selected_route(code) {
            if let Some(route) = routes.iter().find(|r| r.route_code == selected) {
                return Some(route.clone());
            }
        }

        // Default to the first outbound route, as the feed orders them
        routes
            .iter()
            .find(|r| r.direction() == Direction::Outbound)
            .or_else(|| routes.first())
            .cloned()
    }
}

/// `"34_G_D0"` with `Inbound` becomes `"34_D_D0"`; codes without a
/// direction segment come back unchanged
fn swap_direction_segment(route_code: &str, direction: Direction) -> String {
    let mut segments: Vec<&str> = route_code.split('_').collect();
    if segments.len() > 1 {
        segments[1] = direction.wire_tag();
    }
    segments.join("_")
}
