use crate::models::Coordinates;

/// Mean Earth radius in meters
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculates the great-circle distance between two coordinates in meters.
///
/// Uses the haversine formula, which is numerically stable for the small
/// separations typical of stop-to-device distances within one city.
///
/// # Arguments
/// * `a` - First coordinate in degrees
/// * `b` - Second coordinate in degrees
#[must_use]
pub fn distance_between(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().asin();

    EARTH_RADIUS_M * c
}
