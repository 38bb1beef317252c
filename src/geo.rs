//! Geodesic distance between airports.

use geographiclib_rs::{Geodesic, InverseGeodesic};

/// Meters per international nautical mile.
pub const METERS_PER_NM: f64 = 1852.0;

/// Ellipsoidal (WGS84) great-circle distance in nautical miles.
///
/// Inputs are decimal degrees and are not range-checked.
pub fn distance_nm(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let s12: f64 = Geodesic::wgs84().inverse(lat1, lon1, lat2, lon2);
    s12 / METERS_PER_NM
}
