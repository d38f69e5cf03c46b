use serde::{Deserialize, Serialize};

use super::Direction;

/// A geographic coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A stop on a line's ordered stop sequence.
///
/// Stops are supplied by the external query layer and are immutable for
/// the engine's purposes; a stop's index within its line+direction
/// sequence is positional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusStop {
    pub code: String,
    pub name: String,
    pub coordinate: Coordinates,
    pub direction: Direction,
}

impl BusStop {
    #[must_use]
    pub fn new(code: &str, name: &str, coordinate: Coordinates, direction: Direction) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            coordinate,
            direction,
        }
    }
}
