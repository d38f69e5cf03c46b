//! Interfaces to the engine's external collaborators.
//!
//! Network fetching, caching and sensor polling live outside the core;
//! the engine consumes them through the traits here. `ManualLocationStream`
//! and `FixedQueries` are in-memory implementations used by tests and by
//! hosts that already hold the data.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::constants::{DEFAULT_WATCH_DISTANCE_M, DEFAULT_WATCH_INTERVAL_MS};
use crate::models::{BusStop, Coordinates, LineRoute};

/// Minimum deltas between delivered device location fixes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatchOptions {
    pub time_interval_ms: u32,
    pub distance_interval_m: f64,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            time_interval_ms: DEFAULT_WATCH_INTERVAL_MS,
            distance_interval_m: DEFAULT_WATCH_DISTANCE_M,
        }
    }
}

/// A subscribable device-position stream.
///
/// Dropping or removing the returned handle stops delivery synchronously;
/// no callback runs after removal returns.
pub trait LocationStream {
    fn watch(&self, options: WatchOptions, callback: Rc<dyn Fn(Coordinates)>) -> LocationWatchHandle;
}

/// Handle for one active location watch; removes the watch on drop
pub struct LocationWatchHandle {
    remove: Option<Box<dyn FnOnce()>>,
}

impl LocationWatchHandle {
    #[must_use]
    pub fn new(remove: Box<dyn FnOnce()>) -> Self {
        Self { remove: Some(remove) }
    }

    /// Stop the watch. Safe to call more than once.
    pub fn remove(&mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }
}

impl Drop for LocationWatchHandle {
    fn drop(&mut self) {
        self.remove();
    }
}

/// Read-only view of the cached stop/route query layer.
///
/// `None` means "no data yet"; the engine treats a failed fetch and a
/// pending fetch identically as absence.
pub trait StopQueries {
    /// Ordered stop sequence for a line, covering all directions
    fn stops(&self, line_code: &str) -> Option<Vec<BusStop>>;
    /// Known route variants for a line
    fn routes(&self, line_code: &str) -> Option<Vec<LineRoute>>;
}

/// In-memory `StopQueries` backed by fixed data
#[derive(Default)]
pub struct FixedQueries {
    stops: HashMap<String, Vec<BusStop>>,
    routes: HashMap<String, Vec<LineRoute>>,
}

impl FixedQueries {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_stops(&mut self, line_code: &str, stops: Vec<BusStop>) {
        self.stops.insert(line_code.to_string(), stops);
    }

    pub fn insert_routes(&mut self, line_code: &str, routes: Vec<LineRoute>) {
        self.routes.insert(line_code.to_string(), routes);
    }
}

impl StopQueries for FixedQueries {
    fn stops(&self, line_code: &str) -> Option<Vec<BusStop>> {
        self.stops.get(line_code).cloned()
    }

    fn routes(&self, line_code: &str) -> Option<Vec<LineRoute>> {
        self.routes.get(line_code).cloned()
    }
}

type WatcherMap = RefCell<HashMap<u64, Rc<dyn Fn(Coordinates)>>>;

#[derive(Default)]
struct ManualStreamInner {
    watchers: WatcherMap,
    next_id: Cell<u64>,
}

/// Hand-pumped location stream for tests and replays
#[derive(Clone, Default)]
pub struct ManualLocationStream {
    inner: Rc<ManualStreamInner>,
}

impl ManualLocationStream {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a fix to every active watcher
    pub fn push_fix(&self, coordinate: Coordinates) {
        let callbacks: Vec<Rc<dyn Fn(Coordinates)>> =
            self.inner.watchers.borrow().values().map(Rc::clone).collect();
        for callback in callbacks {
            callback(coordinate);
        }
    }

    #[must_use]
    pub fn active_watchers(&self) -> usize {
        self.inner.watchers.borrow().len()
    }
}

impl LocationStream for ManualLocationStream {
    fn watch(&self, _options: WatchOptions, callback: Rc<dyn Fn(Coordinates)>) -> LocationWatchHandle {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner.watchers.borrow_mut().insert(id, callback);

        let inner = Rc::downgrade(&self.inner);
        LocationWatchHandle::new(Box::new(move || {
            if let Some(inner) = inner.upgrade() {
                inner.watchers.borrow_mut().remove(&id);
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_stream_delivers_to_watcher() {
        let stream = ManualLocationStream::new();
        let seen = Rc::new(Cell::new(0));

        let seen_in = Rc::clone(&seen);
        let _handle = stream.watch(
            WatchOptions::default(),
            Rc::new(move |_| seen_in.set(seen_in.get() + 1)),
        );

        stream.push_fix(Coordinates { latitude: 41.0, longitude: 29.0 });
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn test_removed_watcher_receives_nothing() {
        let stream = ManualLocationStream::new();
        let seen = Rc::new(Cell::new(0));

        let seen_in = Rc::clone(&seen);
        let mut handle = stream.watch(
            WatchOptions::default(),
            Rc::new(move |_| seen_in.set(seen_in.get() + 1)),
        );

        handle.remove();
        handle.remove(); // idempotent
        stream.push_fix(Coordinates { latitude: 41.0, longitude: 29.0 });

        assert_eq!(seen.get(), 0);
        assert_eq!(stream.active_watchers(), 0);
    }

    #[test]
    fn test_drop_removes_watcher() {
        let stream = ManualLocationStream::new();
        {
            let _handle = stream.watch(WatchOptions::default(), Rc::new(|_| {}));
            assert_eq!(stream.active_watchers(), 1);
        }
        assert_eq!(stream.active_watchers(), 0);
    }

    #[test]
    fn test_fixed_queries_absent_line_is_none() {
        let queries = FixedQueries::new();
        assert!(queries.stops("34").is_none());
        assert!(queries.routes("34").is_none());
    }
}
