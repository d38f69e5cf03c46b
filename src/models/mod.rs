mod group;
mod route;
mod stop;
mod vehicle;

pub use group::LineGroup;
pub use route::{DirectionTitles, LineRoute};
pub use stop::{BusStop, Coordinates};
pub use vehicle::VehicleReading;

use serde::{Deserialize, Serialize};

/// Travel direction of a route variant, using the feed's wire tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Direction {
    #[default]
    #[serde(rename = "G")]
    Outbound,
    #[serde(rename = "D")]
    Inbound,
}

impl Direction {
    /// Parse the direction tag embedded in a route code.
    ///
    /// Route codes have the shape `LINE_TAG_VARIANT` (e.g. `34_G_D0`);
    /// the second underscore-separated segment carries the direction.
    /// Missing or unknown tags fall back to outbound, matching the feed.
    #[must_use]
    pub fn from_route_code(route_code: &str) -> Self {
        match route_code.split('_').nth(1) {
            Some("D") => Self::Inbound,
            _ => Self::Outbound,
        }
    }

    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Outbound => Self::Inbound,
            Self::Inbound => Self::Outbound,
        }
    }

    /// The tag used by the feed for this direction
    #[must_use]
    pub fn wire_tag(self) -> &'static str {
        match self {
            Self::Outbound => "G",
            Self::Inbound => "D",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_route_code() {
        assert_eq!(Direction::from_route_code("34_G_D0"), Direction::Outbound);
        assert_eq!(Direction::from_route_code("34_D_D0"), Direction::Inbound);
    }

    #[test]
    fn test_direction_from_malformed_route_code_defaults_outbound() {
        assert_eq!(Direction::from_route_code("34"), Direction::Outbound);
        assert_eq!(Direction::from_route_code(""), Direction::Outbound);
        assert_eq!(Direction::from_route_code("34_X_D0"), Direction::Outbound);
    }

    #[test]
    fn test_direction_opposite_round_trips() {
        assert_eq!(Direction::Outbound.opposite(), Direction::Inbound);
        assert_eq!(Direction::Inbound.opposite().opposite(), Direction::Inbound);
    }

    #[test]
    fn test_direction_serializes_to_wire_tag() {
        let json = serde_json::to_string(&Direction::Inbound).expect("serialize");
        assert_eq!(json, "\"D\"");
        let parsed: Direction = serde_json::from_str("\"G\"").expect("deserialize");
        assert_eq!(parsed, Direction::Outbound);
    }
}
