use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{
    FineSchedule, NewPhoto, ReportPatch, ReportRecord, ViolationType,
};
use crate::features::reports::services::report_store::{ReportQuery, ReportStore};

/// Aggregate view of one reporter's history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReporterSummary {
    pub total_reports: usize,
    /// Reports in `verified` or `challan_issued`
    pub verified_reports: usize,
    pub total_earnings: i64,
    /// Whole percent, 0 when the reporter has no reports
    pub success_rate: u32,
}

/// Catalogue entry for one violation type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViolationEntry {
    pub violation_type: ViolationType,
    pub display_name: &'static str,
    pub fine_amount: i64,
}

/// Service for report reads and non-lifecycle edits
pub struct ReportService {
    store: Arc<dyn ReportStore>,
    fines: FineSchedule,
}

impl ReportService {
    pub fn new(store: Arc<dyn ReportStore>, fines: FineSchedule) -> Self {
        Self { store, fines }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<ReportRecord> {
        self.store.get(id).await
    }

    /// Filtered, paginated listing. Returns the page and the total match count.
    pub async fn list(&self, query: &ReportQuery) -> Result<(Vec<ReportRecord>, usize)> {
        if let Some(near) = &query.near {
            if !near.center.is_valid() {
                return Err(AppError::validation(
                    "coordinates",
                    "Coordinates must be longitude in [-180, 180] and latitude in [-90, 90]",
                ));
            }
            if !near.radius_meters.is_finite() || near.radius_meters < 0.0 {
                return Err(AppError::validation("radius", "Radius must be non-negative"));
            }
        }

        self.store.query(query).await
    }

    /// Change description, priority, vehicle descriptors or the analysis record
    pub async fn update(&self, id: Uuid, patch: ReportPatch) -> Result<ReportRecord> {
        let record = self.store.update(id, patch).await?;
        tracing::info!("Report updated: {} (version {})", record.id, record.version);
        Ok(record)
    }

    /// Append evidence photos after the existing ones
    pub async fn add_photos(
        &self,
        id: Uuid,
        photos: Vec<NewPhoto>,
        expected_version: Option<u64>,
    ) -> Result<ReportRecord> {
        if photos.is_empty() {
            return Err(AppError::validation("photos", "At least one photo is required"));
        }

        let count = photos.len();
        let record = self
            .store
            .update(
                id,
                ReportPatch {
                    expected_version,
                    add_photos: photos,
                    ..Default::default()
                },
            )
            .await?;

        tracing::info!(
            "Added {} photos to report {} ({} total)",
            count,
            record.id,
            record.photos.len()
        );
        Ok(record)
    }

    pub async fn reporter_summary(&self, reporter_id: &str) -> Result<ReporterSummary> {
        let (reports, _) = self
            .store
            .query(&ReportQuery {
                reporter_id: Some(reporter_id.to_string()),
                ..Default::default()
            })
            .await?;

        Ok(summarize(&reports))
    }

    pub fn violations(&self) -> Vec<ViolationEntry> {
        self.fines
            .entries()
            .into_iter()
            .map(|(violation_type, fine_amount)| ViolationEntry {
                violation_type,
                display_name: violation_type.display_name(),
                fine_amount,
            })
            .collect()
    }
}

fn summarize(reports: &[ReportRecord]) -> ReporterSummary {
    let total_reports = reports.len();
    let verified_reports = reports.iter().filter(|r| r.status.is_verified()).count();
    let total_earnings = reports.iter().map(|r| r.reward.amount).sum();

    let success_rate = if total_reports == 0 {
        0
    } else {
        ((verified_reports as f64 / total_reports as f64) * 100.0).round() as u32
    };

    ReporterSummary {
        total_reports,
        verified_reports,
        total_earnings,
        success_rate,
    }
}
