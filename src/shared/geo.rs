//! Geodesy helpers shared by the report store and the station directory.
//!
//! Points are indexed in R-trees as `[longitude, latitude]` pairs. Radius
//! searches first query a degree-based bounding envelope, then filter the
//! candidates by haversine distance.

use rstar::AABB;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Earth's radius in meters (for Haversine formula)
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Approximate length of one degree of latitude, in meters
const METERS_PER_DEGREE_LAT: f64 = 111_320.0;

/// A WGS84 point. Longitude first, matching GeoJSON ordering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Longitude in [-180, 180] and latitude in [-90, 90], both finite
    pub fn is_valid(&self) -> bool {
        self.longitude.is_finite()
            && self.latitude.is_finite()
            && (-180.0..=180.0).contains(&self.longitude)
            && (-90.0..=90.0).contains(&self.latitude)
    }

    /// R-tree key for this point
    pub fn as_key(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    /// Great-circle distance to another point in meters
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        haversine_distance(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

/// Calculate Haversine distance between two points in meters
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_METERS * c
}

/// Degree-space envelope that contains every point within `radius_meters`
/// of `center`.
///
/// The envelope is padded by 10% so that the haversine filter applied
/// afterwards is the only thing deciding membership. Near the poles or
/// across the antimeridian it widens to the full longitude range.
pub fn bounding_envelope(center: &GeoPoint, radius_meters: f64) -> AABB<[f64; 2]> {
    let radius = radius_meters.max(0.0) * 1.1;
    let lat_delta = radius / METERS_PER_DEGREE_LAT;

    let min_lat = (center.latitude - lat_delta).max(-90.0);
    let max_lat = (center.latitude + lat_delta).min(90.0);

    let cos_lat = center.latitude.to_radians().cos().abs();
    let (min_lon, max_lon) = if min_lat <= -90.0 || max_lat >= 90.0 || cos_lat < 1e-6 {
        (-180.0, 180.0)
    } else {
        let lon_delta = lat_delta / cos_lat;
        let min_lon = center.longitude - lon_delta;
        let max_lon = center.longitude + lon_delta;
        if min_lon < -180.0 || max_lon > 180.0 {
            (-180.0, 180.0)
        } else {
            (min_lon, max_lon)
        }
    };

    AABB::from_corners([min_lon, min_lat], [max_lon, max_lat])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstar::Envelope;

    #[test]
    fn test_haversine_distance() {
        // MG Road to Majestic, Bengaluru: roughly 4.5km apart
        let mg_road = (12.9756, 77.6066);
        let majestic = (12.9767, 77.5713);

        let distance = haversine_distance(mg_road.0, mg_road.1, majestic.0, majestic.1);

        assert!(distance > 3_500.0 && distance < 4_500.0);
    }

    #[test]
    fn test_haversine_same_point() {
        let distance = haversine_distance(12.97, 77.59, 12.97, 77.59);

        assert!(distance < 1.0);
    }

    #[test]
    fn test_point_validity() {
        assert!(GeoPoint::new(77.59, 12.97).is_valid());
        assert!(GeoPoint::new(-180.0, -90.0).is_valid());
        assert!(GeoPoint::new(180.0, 90.0).is_valid());
        assert!(!GeoPoint::new(77.59, 200.0).is_valid());
        assert!(!GeoPoint::new(181.0, 0.0).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_bounding_envelope_contains_points_on_the_radius() {
        let center = GeoPoint::new(77.59, 12.97);
        let envelope = bounding_envelope(&center, 2_000.0);

        // 2km due north and due east of the center
        let north = [77.59, 12.97 + 2_000.0 / 111_320.0];
        let east = [77.59 + 2_000.0 / (111_320.0 * 12.97_f64.to_radians().cos()), 12.97];

        assert!(envelope.contains_point(&north));
        assert!(envelope.contains_point(&east));
        assert!(!envelope.contains_point(&[77.70, 12.97]));
    }

    #[test]
    fn test_bounding_envelope_widens_across_antimeridian() {
        let center = GeoPoint::new(179.99, 0.0);
        let envelope = bounding_envelope(&center, 5_000.0);

        assert!(envelope.contains_point(&[-179.99, 0.0]));
    }
}
