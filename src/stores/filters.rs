use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::LineRoute;

use super::store::{Store, SubscribeOptions, Subscription};

/// Per-line route selection and visibility, plus the active group filter
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FiltersState {
    /// Line code -> explicitly selected route code
    pub selected_routes: HashMap<String, String>,
    /// Lines hidden from the map; hidden lines stay tracked
    pub invisible_lines: HashSet<String>,
    /// Active group filter, if any
    pub selected_group: Option<Uuid>,
}

/// Store for cross-cutting selection state (routes, visibility, group filter)
#[derive(Clone, Default)]
pub struct FiltersStore {
    store: Store<FiltersState>,
}

impl FiltersStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a route for a line. Silently leaves state unchanged when the
    /// route code does not belong to the line's known routes.
    pub fn select_route(&self, code: &str, route_code: &str, known_routes: &[LineRoute]) {
        if !known_routes.iter().any(|r| r.route_code == route_code) {
            crate::log!("ignoring unknown route {route_code} for line {code}");
            return;
        }

        self.store.update(|s| {
            s.selected_routes.insert(code.to_string(), route_code.to_string());
        });
    }

    #[must_use]
    pub fn selected_route(&self, code: &str) -> Option<String> {
        self.store.select(|s| s.selected_routes.get(code).cloned())
    }

    /// Flip a line's visibility. The line stays tracked while hidden so it
    /// can be shown again instantly.
    pub fn toggle_line_visibility(&self, code: &str) {
        self.store.update(|s| {
            if !s.invisible_lines.remove(code) {
                s.invisible_lines.insert(code.to_string());
            }
        });
    }

    #[must_use]
    pub fn is_visible(&self, code: &str) -> bool {
        self.store.select(|s| !s.invisible_lines.contains(code))
    }

    pub fn set_selected_group(&self, group: Option<Uuid>) {
        self.store.update(|s| s.selected_group = group);
    }

    #[must_use]
    pub fn selected_group(&self) -> Option<Uuid> {
        self.store.select(|s| s.selected_group)
    }

    /// Drop all filter state for an unpinned line
    pub(crate) fn clear_line(&self, code: &str) {
        self.store.update(|s| {
            s.selected_routes.remove(code);
            s.invisible_lines.remove(code);
        });
    }

    pub(crate) fn set_state(&self, state: FiltersState) {
        self.store.update(|s| *s = state);
    }

    #[must_use]
    pub fn state(&self) -> FiltersState {
        self.store.get()
    }

    /// Observe one line's visibility without observing unrelated writes
    pub fn subscribe_visibility(
        &self,
        code: &str,
        listener: impl FnMut(&bool) + 'static,
        fire_immediately: bool,
    ) -> Subscription {
        let code = code.to_string();
        self.store.subscribe(
            move |s| !s.invisible_lines.contains(&code),
            listener,
            SubscribeOptions { fire_immediately },
        )
    }

    #[must_use]
    pub fn store(&self) -> &Store<FiltersState> {
        &self.store
    }
}
