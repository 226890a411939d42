use crate::models::Coordinate;

/// Earth's radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate the Haversine distance between two points in kilometers
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in kilometers
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Great-circle distance between two coordinates in kilometers
#[inline]
pub fn distance_km(from: Coordinate, to: Coordinate) -> f64 {
    haversine_distance(from.latitude, from.longitude, to.latitude, to.longitude)
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// Calculate a bounding box around a center point
///
/// Much cheaper than Haversine, used to prefilter upstream catalog queries.
/// 1° latitude ≈ 111km, 1° longitude ≈ 111km * cos(latitude)
///
/// # Arguments
/// * `lat` - Center latitude in degrees
/// * `lon` - Center longitude in degrees
/// * `radius_km` - Radius in kilometers
///
/// # Returns
/// BoundingBox with min/max lat/lon
pub fn calculate_bounding_box(lat: f64, lon: f64, radius_km: f64) -> BoundingBox {
    // 1 degree latitude is approximately 111 km
    let lat_delta = radius_km / 111.0;

    // 1 degree longitude varies by latitude
    let lon_delta = radius_km / (111.0 * lat.to_radians().cos().abs());

    BoundingBox {
        min_lat: lat - lat_delta,
        max_lat: lat + lat_delta,
        min_lon: lon - lon_delta,
        max_lon: lon + lon_delta,
    }
}

/// Check if a point is within a bounding box
#[inline]
pub fn is_within_bounding_box(lat: f64, lon: f64, bbox: &BoundingBox) -> bool {
    lat >= bbox.min_lat
        && lat <= bbox.max_lat
        && lon >= bbox.min_lon
        && lon <= bbox.max_lon
}
