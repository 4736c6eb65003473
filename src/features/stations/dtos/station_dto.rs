use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::stations::models::StationCandidate;
use crate::shared::geo::GeoPoint;

/// Query parameters for nearby police stations
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct NearbyStationsQuery {
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    #[param(example = 12.97)]
    pub lat: f64,

    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "Longitude must be between -180 and 180"
    ))]
    #[param(example = 77.59)]
    pub lon: f64,

    /// Search radius in meters (defaults to the configured radius)
    #[validate(range(min = 1.0, max = 50000.0, message = "Radius must be between 1 and 50000 meters"))]
    pub radius: Option<f64>,
}

impl NearbyStationsQuery {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lon, self.lat)
    }
}

/// Response DTO for a nearby police station
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StationResponseDto {
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub coordinates: GeoPoint,
    /// Distance from the query point in meters, rounded to whole meters
    pub distance: f64,
}

impl From<StationCandidate> for StationResponseDto {
    fn from(candidate: StationCandidate) -> Self {
        Self {
            id: candidate.id,
            name: candidate.name,
            address: candidate.address,
            phone: candidate.phone,
            coordinates: candidate.coordinates,
            distance: candidate.distance_meters.round(),
        }
    }
}
