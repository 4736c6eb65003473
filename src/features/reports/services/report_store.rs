//! ReportRecord persistence.
//!
//! `ReportStore` is the storage seam; `InMemoryReportStore` keeps documents
//! in a map guarded by an `RwLock`, with an R-tree over report coordinates
//! for proximity queries and a number plate index for exact-match lookups.
//! Every write is a compare-and-swap on the record's `version`.

use std::collections::{BTreeSet, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use rstar::primitives::GeomWithData;
use rstar::RTree;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{
    EvidencePhoto, NewPhoto, NewReport, ReportLocation, ReportPatch, ReportRecord, ReportStatus,
    Reward, VehicleDetails,
};
use crate::shared::constants::MAX_DESCRIPTION_LENGTH;
use crate::shared::geo::{bounding_envelope, GeoPoint};
use crate::shared::types::SortDirection;
use crate::shared::validation::{normalize_number_plate, NUMBER_PLATE_REGEX};

/// "All reports within `radius_meters` of `center`"
#[derive(Debug, Clone, Copy)]
pub struct Proximity {
    pub center: GeoPoint,
    pub radius_meters: f64,
}

/// Filter, sort and page for `ReportStore::query`.
///
/// Filters combine with AND. With `near` set, results are ordered by
/// ascending distance and `sort` only breaks ties.
#[derive(Debug, Clone)]
pub struct ReportQuery {
    pub reporter_id: Option<String>,
    pub status: Option<ReportStatus>,
    pub number_plate: Option<String>,
    pub station_id: Option<String>,
    pub near: Option<Proximity>,
    pub sort: SortDirection,
    pub offset: usize,
    pub limit: usize,
}

impl Default for ReportQuery {
    fn default() -> Self {
        Self {
            reporter_id: None,
            status: None,
            number_plate: None,
            station_id: None,
            near: None,
            sort: SortDirection::Desc,
            offset: 0,
            limit: usize::MAX,
        }
    }
}

#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Validate a submission, apply defaults and persist it as `pending`
    async fn create(&self, input: NewReport) -> Result<ReportRecord>;

    async fn get(&self, id: Uuid) -> Result<ReportRecord>;

    /// Apply a patch to the non-lifecycle fields
    async fn update(&self, id: Uuid, patch: ReportPatch) -> Result<ReportRecord>;

    /// Commit a full record if its `version` still matches the stored one
    async fn replace(&self, record: ReportRecord) -> Result<ReportRecord>;

    /// Matching records for the requested page, plus the total match count
    async fn query(&self, query: &ReportQuery) -> Result<(Vec<ReportRecord>, usize)>;
}

type IndexedPoint = GeomWithData<[f64; 2], Uuid>;

#[derive(Default)]
struct StoreState {
    records: HashMap<Uuid, ReportRecord>,
    spatial: RTree<IndexedPoint>,
    by_plate: HashMap<String, BTreeSet<Uuid>>,
}

#[derive(Default)]
pub struct InMemoryReportStore {
    state: RwLock<StoreState>,
}

impl InMemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreState>> {
        self.state
            .read()
            .map_err(|_| AppError::Internal("report store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState>> {
        self.state
            .write()
            .map_err(|_| AppError::Internal("report store lock poisoned".to_string()))
    }
}

#[async_trait]
impl ReportStore for InMemoryReportStore {
    async fn create(&self, input: NewReport) -> Result<ReportRecord> {
        let record = build_record(input)?;
        validate_record(&record)?;

        let mut state = self.write()?;
        state
            .spatial
            .insert(GeomWithData::new(record.location.coordinates.as_key(), record.id));
        state
            .by_plate
            .entry(record.vehicle_details.number_plate.clone())
            .or_default()
            .insert(record.id);
        state.records.insert(record.id, record.clone());
        drop(state);

        tracing::info!(
            "Created report: {} ({}) plate={}",
            record.id,
            record.violation_type,
            record.vehicle_details.number_plate
        );

        Ok(record)
    }

    async fn get(&self, id: Uuid) -> Result<ReportRecord> {
        self.read()?
            .records
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))
    }

    async fn update(&self, id: Uuid, patch: ReportPatch) -> Result<ReportRecord> {
        let mut state = self.write()?;
        let current = state
            .records
            .get(&id)
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;

        if let Some(expected) = patch.expected_version {
            check_version(current, expected)?;
        }

        let mut next = current.clone();
        apply_patch(&mut next, patch)?;
        validate_record(&next)?;

        next.version = current.version + 1;
        next.updated_at = Utc::now();
        state.records.insert(id, next.clone());
        drop(state);

        tracing::info!("Updated report: {} (version {})", id, next.version);
        Ok(next)
    }

    async fn replace(&self, record: ReportRecord) -> Result<ReportRecord> {
        let mut state = self.write()?;
        let current = state
            .records
            .get(&record.id)
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", record.id)))?;

        check_version(current, record.version)?;
        check_write_invariants(current, &record)?;
        validate_record(&record)?;

        let mut next = record;
        next.version = current.version + 1;
        next.updated_at = Utc::now();
        state.records.insert(next.id, next.clone());
        drop(state);

        tracing::debug!(
            "Committed report: {} status={} version={}",
            next.id,
            next.status,
            next.version
        );
        Ok(next)
    }

    async fn query(&self, query: &ReportQuery) -> Result<(Vec<ReportRecord>, usize)> {
        let state = self.read()?;

        let plate = query.number_plate.as_deref().map(normalize_number_plate);

        // (distance, record) pairs; distance is 0 when no proximity filter applies
        let mut matches: Vec<(f64, &ReportRecord)> = match (&query.near, &plate) {
            (Some(near), _) => {
                let envelope = bounding_envelope(&near.center, near.radius_meters);
                state
                    .spatial
                    .locate_in_envelope(&envelope)
                    .filter_map(|entry| state.records.get(&entry.data))
                    .map(|r| (near.center.distance_to(&r.location.coordinates), r))
                    .filter(|(distance, _)| *distance <= near.radius_meters)
                    .collect()
            }
            (None, Some(plate)) => state
                .by_plate
                .get(plate)
                .into_iter()
                .flatten()
                .filter_map(|id| state.records.get(id))
                .map(|r| (0.0, r))
                .collect(),
            (None, None) => state.records.values().map(|r| (0.0, r)).collect(),
        };

        matches.retain(|(_, r)| {
            query
                .reporter_id
                .as_ref()
                .is_none_or(|id| &r.reporter_id == id)
                && query.status.is_none_or(|s| r.status == s)
                && plate
                    .as_ref()
                    .is_none_or(|p| &r.vehicle_details.number_plate == p)
                && query.station_id.as_ref().is_none_or(|station| {
                    r.assigned_police_station
                        .as_ref()
                        .is_some_and(|a| &a.station_id == station)
                })
        });

        matches.sort_by(|(da, a), (db, b)| {
            // v7 ids are time-ordered, so they break created_at ties
            let by_time = match query.sort {
                SortDirection::Desc => (b.created_at, b.id).cmp(&(a.created_at, a.id)),
                SortDirection::Asc => (a.created_at, a.id).cmp(&(b.created_at, b.id)),
            };
            da.total_cmp(db).then(by_time)
        });

        let total = matches.len();
        let page = matches
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .map(|(_, r)| r.clone())
            .collect();

        Ok((page, total))
    }
}

fn check_version(current: &ReportRecord, expected: u64) -> Result<()> {
    if current.version != expected {
        return Err(AppError::ConcurrencyConflict(format!(
            "Report {} was modified concurrently (expected version {}, found {})",
            current.id, expected, current.version
        )));
    }
    Ok(())
}

fn build_record(input: NewReport) -> Result<ReportRecord> {
    let reporter_id = input.reporter_id.trim().to_string();
    if reporter_id.is_empty() {
        return Err(AppError::validation("reporterId", "Reporter is required"));
    }

    let violation_type = input
        .violation_type
        .ok_or_else(|| AppError::validation("violationType", "Violation type is required"))?;

    let coordinates = input.coordinates.ok_or_else(|| {
        AppError::validation("location.coordinates", "Location coordinates are required")
    })?;

    let address = input
        .address
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .ok_or_else(|| AppError::validation("location.address", "Address is required"))?;

    let number_plate = input
        .number_plate
        .as_deref()
        .map(normalize_number_plate)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| {
            AppError::validation("vehicleDetails.numberPlate", "Number plate is required")
        })?;

    let now = Utc::now();
    let photos = input
        .photos
        .into_iter()
        .map(|p| to_evidence(p, now))
        .collect::<Result<Vec<_>>>()?;

    Ok(ReportRecord {
        id: Uuid::now_v7(),
        reporter_id,
        violation_type,
        description: input.description,
        location: ReportLocation {
            coordinates,
            address,
            landmark: input.landmark,
        },
        photos,
        vehicle_details: VehicleDetails {
            number_plate,
            vehicle_type: input.vehicle_type.unwrap_or_default(),
            make: input.make,
            model: input.model,
            color: input.color,
        },
        status: ReportStatus::Pending,
        assigned_police_station: None,
        verification: None,
        challan: None,
        reward: Reward::default(),
        priority: input.priority.unwrap_or_default(),
        is_anonymous: input.is_anonymous,
        ai_analysis: None,
        reported_at: input.reported_at.unwrap_or(now),
        created_at: now,
        updated_at: now,
        version: 1,
    })
}

fn to_evidence(photo: NewPhoto, uploaded_at: chrono::DateTime<Utc>) -> Result<EvidencePhoto> {
    if photo.public_id.trim().is_empty() {
        return Err(AppError::validation("photos.publicId", "Photo id is required"));
    }
    if photo.url.trim().is_empty() {
        return Err(AppError::validation("photos.url", "Photo URL is required"));
    }
    Ok(EvidencePhoto {
        public_id: photo.public_id,
        url: photo.url,
        uploaded_at,
    })
}

fn apply_patch(record: &mut ReportRecord, patch: ReportPatch) -> Result<()> {
    if let Some(description) = patch.description {
        record.description = Some(description);
    }
    if let Some(priority) = patch.priority {
        record.priority = priority;
    }
    if let Some(vehicle_type) = patch.vehicle_type {
        record.vehicle_details.vehicle_type = vehicle_type;
    }
    if patch.make.is_some() {
        record.vehicle_details.make = patch.make;
    }
    if patch.model.is_some() {
        record.vehicle_details.model = patch.model;
    }
    if patch.color.is_some() {
        record.vehicle_details.color = patch.color;
    }
    if patch.ai_analysis.is_some() {
        record.ai_analysis = patch.ai_analysis;
    }

    let now = Utc::now();
    for photo in patch.add_photos {
        record.photos.push(to_evidence(photo, now)?);
    }
    Ok(())
}

/// Field-level checks applied to every persisted record
fn validate_record(record: &ReportRecord) -> Result<()> {
    if !record.location.coordinates.is_valid() {
        return Err(AppError::validation(
            "location.coordinates",
            "Coordinates must be longitude in [-180, 180] and latitude in [-90, 90]",
        ));
    }

    if let Some(description) = &record.description {
        if description.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err(AppError::validation(
                "description",
                format!(
                    "Description cannot exceed {} characters",
                    MAX_DESCRIPTION_LENGTH
                ),
            ));
        }
    }

    if !NUMBER_PLATE_REGEX.is_match(&record.vehicle_details.number_plate) {
        return Err(AppError::validation(
            "vehicleDetails.numberPlate",
            "Number plate may only contain letters, digits, spaces and hyphens",
        ));
    }

    if let Some(challan) = &record.challan {
        if challan.fine_amount < 0 {
            return Err(AppError::validation(
                "challan.fineAmount",
                "Fine amount cannot be negative",
            ));
        }
    }

    if record.reward.amount < 0 {
        return Err(AppError::validation(
            "reward.amount",
            "Reward amount cannot be negative",
        ));
    }

    if record.reward.amount > 0 && record.challan.is_none() {
        return Err(AppError::validation(
            "reward.amount",
            "Reward requires an issued fine",
        ));
    }

    Ok(())
}

/// Checks that compare a pending write with the stored record
fn check_write_invariants(current: &ReportRecord, next: &ReportRecord) -> Result<()> {
    if next.reporter_id != current.reporter_id {
        return Err(AppError::validation("reporterId", "Reporter cannot change"));
    }

    if next.location.coordinates != current.location.coordinates {
        return Err(AppError::validation(
            "location.coordinates",
            "Coordinates cannot change after submission",
        ));
    }

    if next.vehicle_details.number_plate != current.vehicle_details.number_plate {
        return Err(AppError::validation(
            "vehicleDetails.numberPlate",
            "Number plate cannot change after submission",
        ));
    }

    if !next.photos.starts_with(&current.photos) {
        return Err(AppError::validation("photos", "Photos are append-only"));
    }

    if next.status != current.status && !current.status.can_transition_to(next.status) {
        return Err(AppError::InvalidTransition {
            from: current.status,
            to: next.status,
        });
    }

    if current.reward.computed_at.is_some() {
        if next.reward.computed_at != current.reward.computed_at {
            return Err(AppError::validation(
                "reward.computedAt",
                "Reward derivation cannot be undone",
            ));
        }
        if next.reward.amount != current.reward.amount {
            return Err(AppError::validation(
                "reward.amount",
                "Reward amount is already derived",
            ));
        }
    }

    Ok(())
}
