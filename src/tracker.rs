use std::cell::RefCell;
use std::rc::Rc;

use crate::feed::{LocationStream, LocationWatchHandle, WatchOptions};
use crate::geometry::distance_between;
use crate::models::{BusStop, Coordinates, Direction, VehicleReading};
use crate::stores::{SettingsStore, Subscription};

/// A stop currently fully visible in the list viewport, with its index in
/// the direction-filtered stop sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleStop {
    pub index: usize,
    pub stop_code: String,
}

/// The stop a tracked vehicle is currently closest to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosestStopMatch {
    pub index: usize,
    pub stop_code: String,
}

/// Matches feed-reported vehicle positions against the visible stop window.
///
/// The feed reports each vehicle's nearest known stop directly, so this is
/// a matching problem rather than a geometric one: the first stop of the
/// visible window referenced by any on-route reading wins, ties broken by
/// list order. When no reading matches, the last result is retained until
/// the visible window itself changes, so a vehicle briefly leaving the
/// viewport does not flicker the result to none.
#[derive(Default)]
pub struct VehicleStopMatcher {
    window: Vec<VisibleStop>,
    last_match: Option<ClosestStopMatch>,
}

impl VehicleStopMatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the visible stop window. A changed window drops the
    /// retained result.
    pub fn set_visible_window(&mut self, window: Vec<VisibleStop>) {
        if window != self.window {
            self.window = window;
            self.last_match = None;
        }
    }

    /// Re-evaluate against fresh vehicle readings for the viewed route.
    ///
    /// Readings whose direction or route code do not match the viewed
    /// route are ignored even when their nearest-stop code would hit.
    pub fn update(
        &mut self,
        route_code: &str,
        direction: Direction,
        readings: &[VehicleReading],
    ) -> Option<ClosestStopMatch> {
        let on_route: Vec<&VehicleReading> = readings
            .iter()
            .filter(|r| r.direction == direction && r.route_code == route_code)
            .collect();

        let hit = self
            .window
            .iter()
            .find(|stop| on_route.iter().any(|r| r.nearest_stop_code == stop.stop_code));

        if let Some(stop) = hit {
            self.last_match = Some(ClosestStopMatch {
                index: stop.index,
                stop_code: stop.stop_code.clone(),
            });
        }

        self.current()
    }

    /// The current result, `None` when unresolved
    #[must_use]
    pub fn current(&self) -> Option<ClosestStopMatch> {
        self.last_match.clone()
    }
}

/// Tracks the geographically closest stop to the device position.
///
/// Started with [`ClosestStopWatcher::start`], the watcher observes the
/// `show_my_location` setting (fire-immediately) and holds a location
/// watch only while the setting is on. The output updates only when the
/// closest stop's code changes. Dropping the watcher, or calling
/// [`ClosestStopWatcher::stop`], cancels both subscriptions synchronously;
/// no callback runs afterwards.
pub struct ClosestStopWatcher {
    closest: Rc<RefCell<Option<BusStop>>>,
    watch: Rc<RefCell<Option<LocationWatchHandle>>>,
    settings_sub: Subscription,
}

impl ClosestStopWatcher {
    pub fn start(
        settings: &SettingsStore,
        stream: Rc<dyn LocationStream>,
        stops: &[BusStop],
        direction: Direction,
        options: WatchOptions,
        on_change: impl Fn(Option<&BusStop>) + 'static,
    ) -> Self {
        let stops: Rc<Vec<BusStop>> = Rc::new(
            stops.iter().filter(|s| s.direction == direction).cloned().collect(),
        );
        let closest: Rc<RefCell<Option<BusStop>>> = Rc::new(RefCell::new(None));
        let watch: Rc<RefCell<Option<LocationWatchHandle>>> = Rc::new(RefCell::new(None));
        let on_change: Rc<dyn Fn(Option<&BusStop>)> = Rc::new(on_change);

        let location_callback: Rc<dyn Fn(Coordinates)> = {
            let stops = Rc::clone(&stops);
            let closest = Rc::clone(&closest);
            let on_change = Rc::clone(&on_change);

            Rc::new(move |fix: Coordinates| {
                let nearest = stops
                    .iter()
                    .map(|stop| (distance_between(fix, stop.coordinate), stop))
                    .min_by(|a, b| a.0.total_cmp(&b.0));

                let Some((_, stop)) = nearest else { return };

                // Debounce by identity: re-render only when the code changes
                let changed = closest.borrow().as_ref().map_or(true, |c| c.code != stop.code);
                if changed {
                    *closest.borrow_mut() = Some(stop.clone());
                    on_change(Some(stop));
                }
            })
        };

        let settings_sub = {
            let closest = Rc::clone(&closest);
            let watch = Rc::clone(&watch);
            let on_change = Rc::clone(&on_change);

            settings.subscribe_show_my_location(
                move |on: &bool| {
                    if *on {
                        if watch.borrow().is_none() {
                            crate::log!("starting device location watch");
                            let handle = stream.watch(options, Rc::clone(&location_callback));
                            *watch.borrow_mut() = Some(handle);
                        }
                    } else {
                        if let Some(mut handle) = watch.borrow_mut().take() {
                            crate::log!("stopping device location watch");
                            handle.remove();
                        }
                        if closest.borrow().is_some() {
                            *closest.borrow_mut() = None;
                            on_change(None);
                        }
                    }
                },
                true,
            )
        };

        Self { closest, watch, settings_sub }
    }

    /// The current geographically closest stop, `None` while the setting
    /// is off or no fix has arrived
    #[must_use]
    pub fn closest_stop(&self) -> Option<BusStop> {
        self.closest.borrow().clone()
    }

    /// Cancel the settings subscription and any active location watch.
    /// Idempotent; also runs on drop.
    pub fn stop(&mut self) {
        self.settings_sub.unsubscribe();
        if let Some(mut handle) = self.watch.borrow_mut().take() {
            handle.remove();
        }
    }
}

impl Drop for ClosestStopWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::ManualLocationStream;
    use chrono::Utc;

    fn reading(route_code: &str, direction: Direction, nearest: &str) -> VehicleReading {
        VehicleReading {
            door_no: "B-1234".to_string(),
            coordinate: Coordinates { latitude: 41.0, longitude: 29.0 },
            route_code: route_code.to_string(),
            nearest_stop_code: nearest.to_string(),
            direction,
            last_update: Utc::now(),
        }
    }

    fn window(codes: &[&str]) -> Vec<VisibleStop> {
        codes
            .iter()
            .enumerate()
            .map(|(index, code)| VisibleStop { index, stop_code: (*code).to_string() })
            .collect()
    }

    fn stop_at(code: &str, latitude: f64, direction: Direction) -> BusStop {
        BusStop::new(
            code,
            code,
            Coordinates { latitude, longitude: 29.0 },
            direction,
        )
    }

    #[test]
    fn test_matcher_reports_referenced_stop() {
        let mut matcher = VehicleStopMatcher::new();
        matcher.set_visible_window(window(&["S1", "S2", "S3"]));

        let result = matcher.update(
            "34_G_D0",
            Direction::Outbound,
            &[reading("34_G_D0", Direction::Outbound, "S2")],
        );

        let result = result.expect("match");
        assert_eq!(result.stop_code, "S2");
        assert_eq!(result.index, 1);
    }

    #[test]
    fn test_matcher_ignores_wrong_direction() {
        let mut matcher = VehicleStopMatcher::new();
        matcher.set_visible_window(window(&["S1", "S2", "S3"]));

        let result = matcher.update(
            "34_G_D0",
            Direction::Outbound,
            &[reading("34_G_D0", Direction::Inbound, "S2")],
        );

        assert_eq!(result, None);
    }

    #[test]
    fn test_matcher_ignores_other_route() {
        let mut matcher = VehicleStopMatcher::new();
        matcher.set_visible_window(window(&["S1", "S2"]));

        let result = matcher.update(
            "34_G_D0",
            Direction::Outbound,
            &[reading("34AS_G_D0", Direction::Outbound, "S2")],
        );

        assert_eq!(result, None);
    }

    #[test]
    fn test_matcher_first_visible_stop_wins() {
        let mut matcher = VehicleStopMatcher::new();
        matcher.set_visible_window(window(&["S1", "S2", "S3"]));

        let result = matcher.update(
            "34_G_D0",
            Direction::Outbound,
            &[
                reading("34_G_D0", Direction::Outbound, "S3"),
                reading("34_G_D0", Direction::Outbound, "S2"),
            ],
        );

        assert_eq!(result.expect("match").stop_code, "S2");
    }

    #[test]
    fn test_matcher_retains_last_result_until_window_changes() {
        let mut matcher = VehicleStopMatcher::new();
        matcher.set_visible_window(window(&["S1", "S2", "S3"]));
        matcher.update(
            "34_G_D0",
            Direction::Outbound,
            &[reading("34_G_D0", Direction::Outbound, "S2")],
        );

        // Vehicles leave the matching set: no flicker to none
        let retained = matcher.update("34_G_D0", Direction::Outbound, &[]);
        assert_eq!(retained.expect("retained").stop_code, "S2");

        // The window scrolls away: retention ends
        matcher.set_visible_window(window(&["S4", "S5"]));
        assert_eq!(matcher.current(), None);
    }

    #[test]
    fn test_matcher_unchanged_window_keeps_result() {
        let mut matcher = VehicleStopMatcher::new();
        matcher.set_visible_window(window(&["S1", "S2"]));
        matcher.update(
            "34_G_D0",
            Direction::Outbound,
            &[reading("34_G_D0", Direction::Outbound, "S1")],
        );

        matcher.set_visible_window(window(&["S1", "S2"]));
        assert_eq!(matcher.current().expect("match").stop_code, "S1");
    }

    fn watcher_fixture(
        settings: &SettingsStore,
        stream: &ManualLocationStream,
        changes: &Rc<RefCell<Vec<Option<String>>>>,
    ) -> ClosestStopWatcher {
        let stops = vec![
            stop_at("S1", 41.00, Direction::Outbound),
            stop_at("S2", 41.01, Direction::Outbound),
            stop_at("S3", 41.02, Direction::Outbound),
            stop_at("X1", 41.00, Direction::Inbound),
        ];

        let changes_in = Rc::clone(changes);
        ClosestStopWatcher::start(
            settings,
            Rc::new(stream.clone()),
            &stops,
            Direction::Outbound,
            WatchOptions::default(),
            move |stop| changes_in.borrow_mut().push(stop.map(|s| s.code.clone())),
        )
    }

    #[test]
    fn test_watcher_only_active_while_setting_on() {
        let settings = SettingsStore::new();
        let stream = ManualLocationStream::new();
        let changes = Rc::new(RefCell::new(Vec::new()));

        let _watcher = watcher_fixture(&settings, &stream, &changes);
        assert_eq!(stream.active_watchers(), 0);

        settings.set_show_my_location(true);
        assert_eq!(stream.active_watchers(), 1);

        settings.set_show_my_location(false);
        assert_eq!(stream.active_watchers(), 0);
    }

    #[test]
    fn test_watcher_debounces_by_stop_identity() {
        let settings = SettingsStore::new();
        let stream = ManualLocationStream::new();
        let changes = Rc::new(RefCell::new(Vec::new()));

        let watcher = watcher_fixture(&settings, &stream, &changes);
        settings.set_show_my_location(true);

        stream.push_fix(Coordinates { latitude: 41.001, longitude: 29.0 });
        stream.push_fix(Coordinates { latitude: 41.002, longitude: 29.0 });
        stream.push_fix(Coordinates { latitude: 41.019, longitude: 29.0 });

        assert_eq!(
            *changes.borrow(),
            vec![Some("S1".to_string()), Some("S3".to_string())]
        );
        assert_eq!(watcher.closest_stop().expect("closest").code, "S3");
    }

    #[test]
    fn test_watcher_ignores_other_direction_stops() {
        let settings = SettingsStore::new();
        let stream = ManualLocationStream::new();
        let changes = Rc::new(RefCell::new(Vec::new()));

        let _watcher = watcher_fixture(&settings, &stream, &changes);
        settings.set_show_my_location(true);

        // X1 (inbound) sits at the same coordinate but is filtered out
        stream.push_fix(Coordinates { latitude: 41.0, longitude: 29.0 });
        assert_eq!(*changes.borrow(), vec![Some("S1".to_string())]);
    }

    #[test]
    fn test_setting_off_clears_result() {
        let settings = SettingsStore::new();
        let stream = ManualLocationStream::new();
        let changes = Rc::new(RefCell::new(Vec::new()));

        let watcher = watcher_fixture(&settings, &stream, &changes);
        settings.set_show_my_location(true);
        stream.push_fix(Coordinates { latitude: 41.0, longitude: 29.0 });

        settings.set_show_my_location(false);
        assert_eq!(watcher.closest_stop(), None);
        assert_eq!(changes.borrow().last(), Some(&None));
    }

    #[test]
    fn test_dropped_watcher_observes_no_further_events() {
        let settings = SettingsStore::new();
        let stream = ManualLocationStream::new();
        let changes = Rc::new(RefCell::new(Vec::new()));

        let watcher = watcher_fixture(&settings, &stream, &changes);
        settings.set_show_my_location(true);
        drop(watcher);

        assert_eq!(stream.active_watchers(), 0);
        stream.push_fix(Coordinates { latitude: 41.0, longitude: 29.0 });
        settings.set_show_my_location(false);
        settings.set_show_my_location(true);

        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn test_stop_is_idempotent() {
        let settings = SettingsStore::new();
        let stream = ManualLocationStream::new();
        let changes = Rc::new(RefCell::new(Vec::new()));

        let mut watcher = watcher_fixture(&settings, &stream, &changes);
        settings.set_show_my_location(true);

        watcher.stop();
        watcher.stop();
        assert_eq!(stream.active_watchers(), 0);
    }

    #[test]
    fn test_fire_immediately_starts_watch_when_setting_already_on() {
        let settings = SettingsStore::new();
        settings.set_show_my_location(true);
        let stream = ManualLocationStream::new();
        let changes = Rc::new(RefCell::new(Vec::new()));

        let _watcher = watcher_fixture(&settings, &stream, &changes);
        assert_eq!(stream.active_watchers(), 1);
    }
}
