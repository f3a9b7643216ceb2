use std::sync::OnceLock;

use geographiclib_rs::{Geodesic, InverseGeodesic};

use crate::models::Location;

fn wgs84() -> &'static Geodesic {
    static WGS84: OnceLock<Geodesic> = OnceLock::new();
    WGS84.get_or_init(Geodesic::wgs84)
}

/// Geodesic distance in kilometres between two points on the WGS-84
/// ellipsoid. Karney's inverse solution, which converges for every pair of
/// points including nearly antipodal ones.
pub fn calculate_distance(from: &Location, to: &Location) -> f64 {
    let meters: f64 = wgs84().inverse(from.latitude, from.longitude, to.latitude, to.longitude);
    meters / 1000.0
}
