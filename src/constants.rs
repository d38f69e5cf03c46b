/// Height of one row in a selected line's stop list, in display points
pub const ITEM_SIZE: f64 = 46.0;

/// Collapsed stop list height: three rows with half a row clipped at each edge
pub const COLLAPSED_HEIGHT: f64 = ITEM_SIZE * 3.0 - (ITEM_SIZE / 2.0) * 2.0;

/// Expanded stop list height shown while the user is scrolling
pub const EXPANDED_HEIGHT: f64 = COLLAPSED_HEIGHT * 2.0;

/// Duration of the height expand/collapse animation in milliseconds
pub const HEIGHT_ANIMATION_MS: f64 = 300.0;

/// Delay before re-snapping after the tracked stop changes while idle,
/// so the list's own layout pass after a data refresh is not raced
pub const SNAP_RESCHEDULE_DELAY_MS: f64 = 500.0;

/// Delay before collapsing when momentum ends with no tracked stop,
/// absorbing a vehicle match that reappears quickly
pub const NO_TARGET_COLLAPSE_DELAY_MS: f64 = 1000.0;

/// Cached stop/route data fresher than this many minutes is served
/// without a refetch by the external query layer
pub const QUERY_STALE_MINUTES: i64 = 30;

/// Default minimum interval between device location fixes in milliseconds
pub const DEFAULT_WATCH_INTERVAL_MS: u32 = 5000;

/// Default minimum movement between device location fixes in meters
pub const DEFAULT_WATCH_DISTANCE_M: f64 = 30.0;
