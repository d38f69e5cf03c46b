mod filters;
mod lines;
mod settings;
mod store;

pub use filters::{FiltersState, FiltersStore};
pub use lines::{LineState, LinesState, LinesStore};
pub use settings::{SettingsState, SettingsStore};
pub use store::{Store, SubscribeOptions, Subscription};

use serde::{Deserialize, Serialize};

/// Session snapshot of the slices that outlive a poll cycle.
///
/// Vehicle readings are ephemeral and deliberately excluded; they are
/// refreshed wholesale by the next poll after a restore.
#[derive(Serialize, Deserialize)]
struct SessionSnapshot {
    lines: LinesState,
    filters: FiltersState,
    settings: SettingsState,
}

/// Bundle of the engine's stores: the injectable state container handed
/// to trackers and view models. Constructible per test instance.
#[derive(Clone, Default)]
pub struct Stores {
    pub lines: LinesStore,
    pub filters: FiltersStore,
    pub settings: SettingsStore,
}

impl Stores {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin a line
    pub fn add_line(&self, code: &str) {
        self.lines.add_line(code);
    }

    /// Unpin a line, clearing its route selection, visibility flag and
    /// group membership across stores
    pub fn delete_line(&self, code: &str) {
        self.lines.delete_line(code);
        self.filters.clear_line(code);
    }

    /// Select a route for a line, validated against its known routes
    pub fn select_route(&self, code: &str, route_code: &str) {
        let known = self.lines.routes_of(code);
        self.filters.select_route(code, route_code, &known);
    }

    /// Lines shown under the currently selected group filter
    #[must_use]
    pub fn effective_lines(&self) -> Vec<String> {
        self.lines.effective_lines(self.filters.selected_group())
    }

    /// Serialize the persistent slices to JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn snapshot(&self) -> Result<String, String> {
        let mut lines = self.lines.state();
        for line in lines.lines.values_mut() {
            line.vehicles.clear();
        }

        let snapshot = SessionSnapshot {
            lines,
            filters: self.filters.state(),
            settings: self.settings.store().get(),
        };

        serde_json::to_string(&snapshot).map_err(|e| format!("Failed to serialize session: {e}"))
    }

    /// Restore the persistent slices from a JSON snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be parsed
    pub fn restore(&self, json: &str) -> Result<(), String> {
        let snapshot: SessionSnapshot =
            serde_json::from_str(json).map_err(|e| format!("Failed to parse session: {e}"))?;

        self.lines.set_state(snapshot.lines);
        self.filters.set_state(snapshot.filters);
        let settings = snapshot.settings;
        self.settings.store().update(|s| *s = settings);
        Ok(())
    }
}
