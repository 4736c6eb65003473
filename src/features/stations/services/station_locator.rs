use std::path::Path;

use async_trait::async_trait;
use rstar::primitives::GeomWithData;
use rstar::RTree;

use crate::core::error::AppError;
use crate::features::stations::models::{PoliceStation, StationCandidate};
use crate::shared::geo::{bounding_envelope, GeoPoint};

/// Ranked lookup of police stations around a point
#[async_trait]
pub trait StationLocator: Send + Sync {
    /// Stations within `radius_meters` of `point`, nearest first
    async fn nearest(
        &self,
        point: &GeoPoint,
        radius_meters: f64,
    ) -> Result<Vec<StationCandidate>, AppError>;

    /// Look up one station by id
    async fn find(&self, station_id: &str) -> Result<Option<PoliceStation>, AppError>;
}

/// Index into `StationDirectory::stations`
type StationPoint = GeomWithData<[f64; 2], usize>;

/// In-memory station directory with an R-tree over station coordinates
pub struct StationDirectory {
    stations: Vec<PoliceStation>,
    index: RTree<StationPoint>,
}

impl StationDirectory {
    pub fn new(stations: Vec<PoliceStation>) -> Result<Self, AppError> {
        if let Some(bad) = stations.iter().find(|s| !s.coordinates.is_valid()) {
            return Err(AppError::validation(
                "coordinates",
                format!("Station {} has out-of-range coordinates", bad.id),
            ));
        }

        Ok(Self::indexed(stations))
    }

    /// Load the directory from a JSON array of stations
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::Internal(format!(
                "Failed to read stations file {}: {}",
                path.display(),
                e
            ))
        })?;

        let stations: Vec<PoliceStation> = serde_json::from_str(&content).map_err(|e| {
            AppError::Internal(format!(
                "Failed to parse stations file {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::info!(
            "Loaded {} police stations from {}",
            stations.len(),
            path.display()
        );
        Self::new(stations)
    }

    /// Directory seeded with central Bengaluru stations
    pub fn builtin() -> Self {
        Self::indexed(builtin_stations())
    }

    fn indexed(stations: Vec<PoliceStation>) -> Self {
        let points = stations
            .iter()
            .enumerate()
            .map(|(i, s)| GeomWithData::new(s.coordinates.as_key(), i))
            .collect();

        Self {
            stations,
            index: RTree::bulk_load(points),
        }
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }
}

#[async_trait]
impl StationLocator for StationDirectory {
    async fn nearest(
        &self,
        point: &GeoPoint,
        radius_meters: f64,
    ) -> Result<Vec<StationCandidate>, AppError> {
        if !point.is_valid() {
            return Err(AppError::validation(
                "coordinates",
                "Coordinates must be longitude in [-180, 180] and latitude in [-90, 90]",
            ));
        }
        if !radius_meters.is_finite() || radius_meters < 0.0 {
            return Err(AppError::validation("radius", "Radius must be non-negative"));
        }

        let envelope = bounding_envelope(point, radius_meters);

        let mut candidates: Vec<StationCandidate> = self
            .index
            .locate_in_envelope(&envelope)
            .filter_map(|entry| self.stations.get(entry.data))
            .map(|station| (point.distance_to(&station.coordinates), station))
            .filter(|(distance, _)| *distance <= radius_meters)
            .map(|(distance, station)| StationCandidate::from_station(station, distance))
            .collect();

        candidates.sort_by(|a, b| {
            a.distance_meters
                .total_cmp(&b.distance_meters)
                .then_with(|| a.id.cmp(&b.id))
        });

        tracing::debug!(
            "Found {} stations within {}m of ({}, {})",
            candidates.len(),
            radius_meters,
            point.latitude,
            point.longitude
        );
        Ok(candidates)
    }

    async fn find(&self, station_id: &str) -> Result<Option<PoliceStation>, AppError> {
        Ok(self.stations.iter().find(|s| s.id == station_id).cloned())
    }
}

fn builtin_stations() -> Vec<PoliceStation> {
    let seed = [
        (
            "ps_001",
            "MG Road Police Station",
            "MG Road, Bengaluru, Karnataka 560001",
            "+91-80-22942222",
            77.6059,
            12.9757,
        ),
        (
            "ps_002",
            "Ashok Nagar Police Station",
            "Brigade Road, Ashok Nagar, Bengaluru, Karnataka 560025",
            "+91-80-22942560",
            77.6070,
            12.9719,
        ),
        (
            "ps_003",
            "Commercial Street Police Station",
            "Commercial Street, Shivajinagar, Bengaluru, Karnataka 560001",
            "+91-80-22942534",
            77.6083,
            12.9822,
        ),
        (
            "ps_004",
            "Cubbon Park Police Station",
            "Kasturba Road, Bengaluru, Karnataka 560001",
            "+91-80-22942591",
            77.5952,
            12.9779,
        ),
        (
            "ps_005",
            "Halasuru Gate Police Station",
            "JC Road, Sudhama Nagar, Bengaluru, Karnataka 560002",
            "+91-80-22942520",
            77.5843,
            12.9646,
        ),
        (
            "ps_006",
            "Upparpet Police Station",
            "Kempegowda Bus Station Road, Gandhi Nagar, Bengaluru, Karnataka 560009",
            "+91-80-22942581",
            77.5713,
            12.9767,
        ),
    ];

    seed.into_iter()
        .map(|(id, name, address, phone, longitude, latitude)| PoliceStation {
            id: id.to_string(),
            name: name.to_string(),
            address: address.to_string(),
            phone: Some(phone.to_string()),
            coordinates: GeoPoint::new(longitude, latitude),
        })
        .collect()
}
