use serde::{Deserialize, Serialize};

use super::store::{Store, SubscribeOptions, Subscription};

/// Global user settings observed by the engine
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SettingsState {
    /// While on, the user-position closest-stop variant is active
    pub show_my_location: bool,
    pub show_traffic: bool,
}

/// Settings store with per-setting subscriptions
#[derive(Clone, Default)]
pub struct SettingsStore {
    store: Store<SettingsState>,
}

impl SettingsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn show_my_location(&self) -> bool {
        self.store.select(|s| s.show_my_location)
    }

    pub fn set_show_my_location(&self, on: bool) {
        self.store.update(|s| s.show_my_location = on);
    }

    pub fn set_show_traffic(&self, on: bool) {
        self.store.update(|s| s.show_traffic = on);
    }

    /// Observe the `show_my_location` setting without observing unrelated
    /// settings writes
    pub fn subscribe_show_my_location(
        &self,
        listener: impl FnMut(&bool) + 'static,
        fire_immediately: bool,
    ) -> Subscription {
        self.store.subscribe(
            |s| s.show_my_location,
            listener,
            SubscribeOptions { fire_immediately },
        )
    }

    #[must_use]
    pub fn store(&self) -> &Store<SettingsState> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_show_my_location_subscription_fires_immediately() {
        let settings = SettingsStore::new();
        settings.set_show_my_location(true);

        let seen = Rc::new(Cell::new(false));
        let seen_in = Rc::clone(&seen);
        let _sub = settings.subscribe_show_my_location(move |on| seen_in.set(*on), true);

        assert!(seen.get());
    }

    #[test]
    fn test_unrelated_setting_does_not_notify() {
        let settings = SettingsStore::new();
        let calls = Rc::new(Cell::new(0));

        let calls_in = Rc::clone(&calls);
        let _sub = settings.subscribe_show_my_location(move |_| calls_in.set(calls_in.get() + 1), false);

        settings.set_show_traffic(true);
        assert_eq!(calls.get(), 0);

        settings.set_show_my_location(true);
        assert_eq!(calls.get(), 1);
    }
}
