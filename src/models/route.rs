use serde::{Deserialize, Serialize};

use super::Direction;

/// Left/right display titles for a route's two endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionTitles {
    pub left: String,
    pub right: String,
}

impl DirectionTitles {
    /// Derive titles from a long name of the form `"KADIKOY - TAKSIM"`.
    ///
    /// Returns `None` unless the name contains exactly one separator, so a
    /// name with zero or multiple hyphens is never split ambiguously.
    #[must_use]
    pub fn from_long_name(long_name: &str) -> Option<Self> {
        let mut parts = long_name.split('-');
        let left = parts.next()?;
        let right = parts.next()?;
        if parts.next().is_some() {
            return None;
        }

        Some(Self {
            left: left.trim().to_string(),
            right: right.trim().to_string(),
        })
    }
}

/// One directional variant of a line's path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRoute {
    pub route_code: String,
    pub route_long_name: String,
    /// Explicit endpoint titles from the data source. When absent, a
    /// validated split of `route_long_name` is used as a fallback.
    #[serde(default)]
    pub direction_titles: Option<DirectionTitles>,
}

impl LineRoute {
    #[must_use]
    pub fn new(route_code: &str, route_long_name: &str) -> Self {
        Self {
            route_code: route_code.to_string(),
            route_long_name: route_long_name.to_string(),
            direction_titles: None,
        }
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        Direction::from_route_code(&self.route_code)
    }

    /// Endpoint titles: the explicit field when present, else the
    /// validated long-name split
    #[must_use]
    pub fn titles(&self) -> Option<DirectionTitles> {
        self.direction_titles
            .clone()
            .or_else(|| DirectionTitles::from_long_name(&self.route_long_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_titles_split_on_single_separator() {
        let titles = DirectionTitles::from_long_name("KADIKOY - TAKSIM").expect("titles");
        assert_eq!(titles.left, "KADIKOY");
        assert_eq!(titles.right, "TAKSIM");
    }

    #[test]
    fn test_titles_reject_zero_or_multiple_separators() {
        assert_eq!(DirectionTitles::from_long_name("RING HATTI"), None);
        assert_eq!(DirectionTitles::from_long_name("A - B - C"), None);
    }

    #[test]
    fn test_explicit_titles_take_precedence() {
        let mut route = LineRoute::new("34_G_D0", "A - B");
        route.direction_titles = Some(DirectionTitles {
            left: "Avcilar".to_string(),
            right: "Zincirlikuyu".to_string(),
        });

        let titles = route.titles().expect("titles");
        assert_eq!(titles.left, "Avcilar");
    }

    #[test]
    fn test_route_direction_comes_from_code() {
        assert_eq!(LineRoute::new("34_D_D0", "B - A").direction(), Direction::Inbound);
        assert_eq!(LineRoute::new("34_G_D0", "A - B").direction(), Direction::Outbound);
    }
}
