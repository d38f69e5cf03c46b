use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Coordinates, Direction};

/// One live vehicle sample from the position feed.
///
/// `nearest_stop_code` is the feed-reported back-reference to the stop the
/// vehicle is currently closest to; the engine matches against it rather
/// than recomputing distances from the raw coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleReading {
    pub door_no: String,
    pub coordinate: Coordinates,
    pub route_code: String,
    pub nearest_stop_code: String,
    pub direction: Direction,
    pub last_update: DateTime<Utc>,
}
