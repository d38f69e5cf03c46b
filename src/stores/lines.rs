use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{LineGroup, LineRoute, VehicleReading};
use crate::theme::{assign_theme, LineTheme};

use super::store::{Store, SubscribeOptions, Subscription};

/// Per-line state owned by the lines store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineState {
    /// Live vehicle readings, refreshed wholesale on each poll
    pub vehicles: Vec<VehicleReading>,
    /// Known route variants for the line
    pub routes: Vec<LineRoute>,
    pub theme: LineTheme,
}

/// Pinned lines (in pin order) and line groups
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LinesState {
    pub lines: IndexMap<String, LineState>,
    pub line_groups: Vec<LineGroup>,
}

/// Store for the pinned-line set, vehicle readings, themes and groups
#[derive(Clone, Default)]
pub struct LinesStore {
    store: Store<LinesState>,
}

impl LinesStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin a line. Assigns a palette theme not used by another pinned
    /// line, reusing colors once the palette is exhausted. No-op when the
    /// line is already pinned.
    pub fn add_line(&self, code: &str) {
        if self.is_pinned(code) {
            return;
        }

        self.store.update(|s| {
            let in_use: Vec<LineTheme> = s.lines.values().map(|l| l.theme.clone()).collect();
            s.lines.insert(
                code.to_string(),
                LineState {
                    vehicles: Vec::new(),
                    routes: Vec::new(),
                    theme: assign_theme(&in_use),
                },
            );
        });
        crate::log!("pinned line {code}");
    }

    /// Unpin a line, dropping its readings, routes, theme and any group
    /// membership. No-op when the line is not pinned.
    pub fn delete_line(&self, code: &str) {
        if !self.is_pinned(code) {
            return;
        }

        self.store.update(|s| {
            s.lines.shift_remove(code);
            for group in &mut s.line_groups {
                group.line_codes.retain(|c| c != code);
            }
        });
        crate::log!("unpinned line {code}");
    }

    #[must_use]
    pub fn is_pinned(&self, code: &str) -> bool {
        self.store.select(|s| s.lines.contains_key(code))
    }

    /// Pinned line codes in pin order
    #[must_use]
    pub fn pinned_lines(&self) -> Vec<String> {
        self.store.select(|s| s.lines.keys().cloned().collect())
    }

    /// The group's member codes when a group filter is active, else all
    /// pinned codes in pin order
    #[must_use]
    pub fn effective_lines(&self, active_group: Option<Uuid>) -> Vec<String> {
        self.store.select(|s| {
            active_group
                .and_then(|id| s.line_groups.iter().find(|g| g.id == id))
                .map_or_else(
                    || s.lines.keys().cloned().collect(),
                    |group| group.line_codes.clone(),
                )
        })
    }

    /// Replace a line's vehicle readings wholesale. Ignored for lines
    /// that are not pinned.
    pub fn set_vehicle_readings(&self, code: &str, readings: Vec<VehicleReading>) {
        if !self.is_pinned(code) {
            return;
        }
        self.store.update(|s| {
            if let Some(line) = s.lines.get_mut(code) {
                line.vehicles = readings;
            }
        });
    }

    pub fn set_routes(&self, code: &str, routes: Vec<LineRoute>) {
        if !self.is_pinned(code) {
            return;
        }
        self.store.update(|s| {
            if let Some(line) = s.lines.get_mut(code) {
                line.routes = routes;
            }
        });
    }

    #[must_use]
    pub fn vehicles_of(&self, code: &str) -> Vec<VehicleReading> {
        self.store
            .select(|s| s.lines.get(code).map(|l| l.vehicles.clone()))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn routes_of(&self, code: &str) -> Vec<LineRoute> {
        self.store
            .select(|s| s.lines.get(code).map(|l| l.routes.clone()))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn theme_of(&self, code: &str) -> Option<LineTheme> {
        self.store.select(|s| s.lines.get(code).map(|l| l.theme.clone()))
    }

    /// Create a group, optionally named; unnamed groups get a numbered title
    pub fn create_group(&self, title: Option<&str>) -> Uuid {
        let mut id = Uuid::nil();
        self.store.update(|s| {
            let title = title.map_or_else(
                || format!("Group {}", s.line_groups.len() + 1),
                ToString::to_string,
            );
            let group = LineGroup::new(title);
            id = group.id;
            s.line_groups.push(group);
        });
        id
    }

    pub fn delete_group(&self, id: Uuid) {
        self.store.update(|s| s.line_groups.retain(|g| g.id != id));
    }

    /// Add a pinned line to a group. Membership is exclusive: the line is
    /// removed from any group it previously belonged to. No-op when the
    /// group does not exist or the line is not pinned.
    pub fn add_line_to_group(&self, id: Uuid, code: &str) {
        if !self.is_pinned(code) {
            return;
        }

        self.store.update(|s| {
            if !s.line_groups.iter().any(|g| g.id == id) {
                return;
            }
            for group in &mut s.line_groups {
                group.line_codes.retain(|c| c != code);
            }
            if let Some(group) = s.line_groups.iter_mut().find(|g| g.id == id) {
                group.line_codes.push(code.to_string());
            }
        });
    }

    pub fn remove_line_from_group(&self, id: Uuid, code: &str) {
        self.store.update(|s| {
            if let Some(group) = s.line_groups.iter_mut().find(|g| g.id == id) {
                group.line_codes.retain(|c| c != code);
            }
        });
    }

    /// The group a line belongs to, if any; membership is exclusive so at
    /// most one group matches
    #[must_use]
    pub fn group_containing(&self, code: &str) -> Option<Uuid> {
        self.store
            .select(|s| s.line_groups.iter().find(|g| g.contains(code)).map(|g| g.id))
    }

    #[must_use]
    pub fn groups(&self) -> Vec<LineGroup> {
        self.store.select(|s| s.line_groups.clone())
    }

    /// Observe one line's vehicle readings without observing unrelated
    /// store writes
    pub fn subscribe_vehicles(
        &self,
        code: &str,
        listener: impl FnMut(&Option<Vec<VehicleReading>>) + 'static,
        fire_immediately: bool,
    ) -> Subscription {
        let code = code.to_string();
        self.store.subscribe(
            move |s| s.lines.get(&code).map(|l| l.vehicles.clone()),
            listener,
            SubscribeOptions { fire_immediately },
        )
    }

    pub(crate) fn set_state(&self, state: LinesState) {
        self.store.update(|s| *s = state);
    }

    #[must_use]
    pub fn state(&self) -> LinesState {
        self.store.get()
    }

    #[must_use]
    pub fn store(&self) -> &Store<LinesState> {
        &self.store
    }
}
