use crate::error::FeeError;
use crate::models::shop::GeoPoint;

/// Mean earth radius (IUGG).
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// Great-circle distance in meters between two points given in degrees.
pub fn calculate_distance(a: &GeoPoint, b: &GeoPoint) -> Result<f64, FeeError> {
    a.validate()?;
    b.validate()?;

    if a == b {
        return Ok(0.0);
    }

    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let sin_lat = (delta_lat / 2.0).sin();
    let sin_lng = (delta_lng / 2.0).sin();

    // Rounding can push the haversine a hair above 1 for antipodal points.
    let haversine = (sin_lat * sin_lat + lat1.cos() * lat2.cos() * sin_lng * sin_lng).clamp(0.0, 1.0);
    let central_angle = 2.0 * haversine.sqrt().asin();

    Ok(EARTH_RADIUS_METERS * central_angle)
}
