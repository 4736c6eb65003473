use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::geo::GeoPoint;

/// Police station entry in the station directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PoliceStation {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub coordinates: GeoPoint,
}

/// Station returned by a nearest-station lookup
#[derive(Debug, Clone, PartialEq)]
pub struct StationCandidate {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub coordinates: GeoPoint,
    /// Great-circle distance from the query point, in meters
    pub distance_meters: f64,
}

impl StationCandidate {
    pub fn from_station(station: &PoliceStation, distance_meters: f64) -> Self {
        Self {
            id: station.id.clone(),
            name: station.name.clone(),
            address: station.address.clone(),
            phone: station.phone.clone(),
            coordinates: station.coordinates,
            distance_meters,
        }
    }
}
