//! Great-circle distance.

use crate::model::Coordinate;
use crate::CoreError;

/// Mean Earth radius used for all distance computations.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points, in kilometres.
///
/// Symmetric, non-negative, and exactly `0.0` for identical points.
///
/// # Errors
///
/// Returns [`CoreError::InvalidCoordinate`] if either point is non-finite or
/// outside the valid latitude/longitude ranges.
pub fn distance_km(a: Coordinate, b: Coordinate) -> Result<f64, CoreError> {
    let a = a.validate()?;
    let b = b.validate()?;
    if a == b {
        return Ok(0.0);
    }

    let (lat1, lat2) = (a.latitude.to_radians(), b.latitude.to_radians());
    let d_lat = lat2 - lat1;
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1.0 for antipodal points.
    let central_angle = 2.0 * h.sqrt().min(1.0).asin();

    Ok(EARTH_RADIUS_KM * central_angle)
}
