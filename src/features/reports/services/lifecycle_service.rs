//! Report lifecycle engine.
//!
//! Drives `status` along pending -> under_review -> verified ->
//! challan_issued (or under_review -> rejected) and writes each transition's
//! side-effect fields in the same commit. Reporter notifications go out after
//! the commit; their failures are logged and never undo the transition.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::core::config::{ChallanConfig, RewardConfig, StationConfig};
use crate::core::error::{AppError, Result};
use crate::features::reports::models::{
    Challan, FineSchedule, NewReport, ReportRecord, ReportStatus, StationAssignment, Verification,
};
use crate::features::reports::services::report_store::ReportStore;
use crate::features::reports::services::reward::apply_reward;
use crate::features::stations::models::StationCandidate;
use crate::features::stations::services::StationLocator;
use crate::modules::notifications::{NotificationEvent, NotificationPayload, Notifier};
use crate::shared::constants::CHALLAN_NUMBER_PREFIX;

/// Hand a pending report to a police station
#[derive(Debug, Clone, Default)]
pub struct AssignStation {
    /// Station chosen by the caller; nearest station when `None`
    pub station_id: Option<String>,
    pub officer: Option<String>,
    pub radius_meters: Option<f64>,
    pub expected_version: Option<u64>,
}

/// Verifier outcome shared by approval and rejection
#[derive(Debug, Clone, Default)]
pub struct VerificationDecision {
    pub verifier_id: String,
    pub notes: Option<String>,
    pub is_number_plate_valid: Option<bool>,
    pub is_photo_authentic: Option<bool>,
    pub is_location_accurate: Option<bool>,
    pub expected_version: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct IssueChallan {
    /// Generated as CHN-YYYY-NNNNNNN when `None`
    pub challan_number: Option<String>,
    /// Issue time plus the configured due days when `None`
    pub due_date: Option<DateTime<Utc>>,
    pub expected_version: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct ChallanPayment {
    pub payment_method: String,
    pub expected_version: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct RewardCredit {
    pub transaction_id: Option<String>,
    pub expected_version: Option<u64>,
}

pub struct LifecycleService {
    store: Arc<dyn ReportStore>,
    notifier: Arc<dyn Notifier>,
    locator: Arc<dyn StationLocator>,
    fines: FineSchedule,
    reward_percentage: u32,
    challan_due_days: i64,
    search_radius_meters: f64,
    challan_sequence: AtomicU64,
}

impl LifecycleService {
    pub fn new(
        store: Arc<dyn ReportStore>,
        notifier: Arc<dyn Notifier>,
        locator: Arc<dyn StationLocator>,
        reward: &RewardConfig,
        challan: &ChallanConfig,
        stations: &StationConfig,
    ) -> Self {
        Self {
            store,
            notifier,
            locator,
            fines: challan.fines.clone(),
            reward_percentage: reward.percentage,
            challan_due_days: challan.due_days,
            search_radius_meters: stations.search_radius_meters,
            challan_sequence: AtomicU64::new(0),
        }
    }

    /// Create a new report in `pending`
    pub async fn submit(&self, input: NewReport) -> Result<ReportRecord> {
        let record = self.store.create(input).await?;
        tracing::info!(
            "Report submitted: {} by {} ({})",
            record.id,
            record.reporter_id,
            record.violation_type
        );
        Ok(record)
    }

    /// pending -> under_review
    pub async fn assign_station(&self, id: Uuid, input: AssignStation) -> Result<ReportRecord> {
        let mut record = self
            .load_for(id, input.expected_version, ReportStatus::UnderReview)
            .await?;

        let station = self.resolve_station(&record, &input).await?;
        let from = record.status;

        record.status = ReportStatus::UnderReview;
        record.assigned_police_station = Some(StationAssignment {
            station_id: station.id,
            station_name: station.name,
            station_address: station.address,
            contact_number: station.phone,
            assigned_at: Utc::now(),
            assigned_officer: input.officer.filter(|o| !o.trim().is_empty()),
        });

        let record = self.commit(record, from).await?;

        self.notify(
            &record,
            NotificationEvent::ReportSubmitted,
            NotificationPayload::for_report(record.id),
        )
        .await;

        Ok(record)
    }

    /// under_review -> verified.
    ///
    /// Creates the challan from the fine schedule and derives the reward in
    /// the same commit.
    pub async fn verify(&self, id: Uuid, decision: VerificationDecision) -> Result<ReportRecord> {
        let mut record = self
            .load_for(id, decision.expected_version, ReportStatus::Verified)
            .await?;

        let verifier_id = required_verifier(&decision.verifier_id)?;
        let (plate, photo, location) = match (
            decision.is_number_plate_valid,
            decision.is_photo_authentic,
            decision.is_location_accurate,
        ) {
            (Some(plate), Some(photo), Some(location)) => (plate, photo, location),
            (None, _, _) => return Err(missing_check("verification.isNumberPlateValid")),
            (_, None, _) => return Err(missing_check("verification.isPhotoAuthentic")),
            (_, _, None) => return Err(missing_check("verification.isLocationAccurate")),
        };

        let now = Utc::now();
        let from = record.status;

        record.status = ReportStatus::Verified;
        record.verification = Some(Verification {
            verified_by: verifier_id,
            verified_at: now,
            verification_notes: decision.notes,
            is_number_plate_valid: Some(plate),
            is_photo_authentic: Some(photo),
            is_location_accurate: Some(location),
        });
        record.challan = Some(Challan::new(self.fines.fine_for(record.violation_type)));
        apply_reward(&mut record, self.reward_percentage, now);

        let record = self.commit(record, from).await?;

        let fine = record.fine_amount().unwrap_or_default();
        self.notify(
            &record,
            NotificationEvent::ReportVerified,
            NotificationPayload::for_report(record.id)
                .with_fine(fine)
                .with_reward(record.reward.amount),
        )
        .await;

        Ok(record)
    }

    /// under_review -> rejected. No challan or reward is created.
    pub async fn reject(&self, id: Uuid, decision: VerificationDecision) -> Result<ReportRecord> {
        let mut record = self
            .load_for(id, decision.expected_version, ReportStatus::Rejected)
            .await?;

        let verifier_id = required_verifier(&decision.verifier_id)?;
        let from = record.status;

        record.status = ReportStatus::Rejected;
        record.verification = Some(Verification {
            verified_by: verifier_id,
            verified_at: Utc::now(),
            verification_notes: decision.notes,
            is_number_plate_valid: decision.is_number_plate_valid,
            is_photo_authentic: decision.is_photo_authentic,
            is_location_accurate: decision.is_location_accurate,
        });

        let record = self.commit(record, from).await?;

        let reason = record
            .verification
            .as_ref()
            .and_then(|v| v.verification_notes.as_deref())
            .map(|notes| format!(" Reason: {}", notes))
            .unwrap_or_default();
        self.notify(
            &record,
            NotificationEvent::Generic,
            NotificationPayload::for_report(record.id)
                .with_title("Report Rejected")
                .with_message(format!(
                    "Your report #{} could not be verified and has been rejected.{}",
                    record.id, reason
                )),
        )
        .await;

        Ok(record)
    }

    /// verified -> challan_issued. Administrative; notifies nobody.
    pub async fn issue_challan(&self, id: Uuid, input: IssueChallan) -> Result<ReportRecord> {
        let mut record = self
            .load_for(id, input.expected_version, ReportStatus::ChallanIssued)
            .await?;

        let now = Utc::now();
        let due_date = input
            .due_date
            .unwrap_or_else(|| now + Duration::days(self.challan_due_days));
        if due_date < now {
            return Err(AppError::validation(
                "challan.dueDate",
                "Due date cannot be before the issue date",
            ));
        }

        let challan_number = match input.challan_number.map(|n| n.trim().to_string()) {
            Some(number) if !number.is_empty() => number,
            _ => self.next_challan_number(now),
        };

        let from = record.status;
        let challan = record.challan.as_mut().ok_or_else(|| {
            AppError::Internal(format!("Verified report {} has no challan", id))
        })?;
        challan.challan_number = Some(challan_number);
        challan.issued_at = Some(now);
        challan.due_date = Some(due_date);
        record.status = ReportStatus::ChallanIssued;

        self.commit(record, from).await
    }

    /// Mark an issued challan as paid. Status does not change.
    pub async fn record_challan_payment(
        &self,
        id: Uuid,
        input: ChallanPayment,
    ) -> Result<ReportRecord> {
        let mut record = self.load(id, input.expected_version).await?;

        let payment_method = input.payment_method.trim().to_string();
        if payment_method.is_empty() {
            return Err(AppError::validation(
                "paymentMethod",
                "Payment method is required",
            ));
        }

        let status = record.status;
        let challan = match record.challan.as_mut() {
            Some(challan) if status == ReportStatus::ChallanIssued && !challan.is_paid => challan,
            _ => {
                return Err(AppError::InvalidTransition {
                    from: status,
                    to: ReportStatus::ChallanIssued,
                })
            }
        };

        challan.is_paid = true;
        challan.paid_at = Some(Utc::now());
        challan.payment_method = Some(payment_method);

        let record = self.store.replace(record).await?;
        tracing::info!("Challan paid for report {}", record.id);
        Ok(record)
    }

    /// Pay out a derived reward. Allowed once, after the amount is non-zero.
    pub async fn credit_reward(&self, id: Uuid, input: RewardCredit) -> Result<ReportRecord> {
        let mut record = self.load(id, input.expected_version).await?;

        if record.reward.amount <= 0 || record.reward.is_paid {
            return Err(AppError::InvalidTransition {
                from: record.status,
                to: record.status,
            });
        }

        record.reward.is_paid = true;
        record.reward.paid_at = Some(Utc::now());
        record.reward.transaction_id = input.transaction_id.filter(|t| !t.trim().is_empty());

        let record = self.store.replace(record).await?;
        tracing::info!(
            "Reward of {} credited for report {}",
            record.reward.amount,
            record.id
        );

        self.notify(
            &record,
            NotificationEvent::RewardCredited,
            NotificationPayload::for_report(record.id).with_reward(record.reward.amount),
        )
        .await;

        Ok(record)
    }

    /// Fetch a record and check the caller's version
    async fn load(&self, id: Uuid, expected_version: Option<u64>) -> Result<ReportRecord> {
        let record = self.store.get(id).await?;

        if let Some(expected) = expected_version {
            if record.version != expected {
                return Err(AppError::ConcurrencyConflict(format!(
                    "Report {} was modified concurrently (expected version {}, found {})",
                    id, expected, record.version
                )));
            }
        }

        Ok(record)
    }

    /// Fetch a record that must be able to move to `to`
    async fn load_for(
        &self,
        id: Uuid,
        expected_version: Option<u64>,
        to: ReportStatus,
    ) -> Result<ReportRecord> {
        let record = self.load(id, expected_version).await?;

        if !record.status.can_transition_to(to) {
            return Err(AppError::InvalidTransition {
                from: record.status,
                to,
            });
        }

        Ok(record)
    }

    async fn commit(&self, record: ReportRecord, from: ReportStatus) -> Result<ReportRecord> {
        let record = self.store.replace(record).await?;
        tracing::info!(
            "Report {} moved from {} to {} (version {})",
            record.id,
            from,
            record.status,
            record.version
        );
        Ok(record)
    }

    async fn resolve_station(
        &self,
        record: &ReportRecord,
        input: &AssignStation,
    ) -> Result<StationCandidate> {
        let point = record.location.coordinates;

        if let Some(station_id) = input.station_id.as_deref() {
            let station = self
                .locator
                .find(station_id)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to look up station {}: {:?}", station_id, e);
                    AppError::Dependency(format!("Station lookup failed: {}", e))
                })?
                .ok_or_else(|| AppError::NotFound(format!("Station {} not found", station_id)))?;
            let distance = point.distance_to(&station.coordinates);
            return Ok(StationCandidate::from_station(&station, distance));
        }

        let radius = input.radius_meters.unwrap_or(self.search_radius_meters);
        let candidates = self.locator.nearest(&point, radius).await.map_err(|e| {
            tracing::error!("Failed to find stations near report {}: {:?}", record.id, e);
            AppError::Dependency(format!("Station lookup failed: {}", e))
        })?;

        candidates.into_iter().next().ok_or_else(|| {
            AppError::NotFound(format!(
                "No police station within {}m of report {}",
                radius, record.id
            ))
        })
    }

    fn next_challan_number(&self, now: DateTime<Utc>) -> String {
        let seq = self.challan_sequence.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{}-{:07}", CHALLAN_NUMBER_PREFIX, now.format("%Y"), seq)
    }

    async fn notify(
        &self,
        record: &ReportRecord,
        event: NotificationEvent,
        payload: NotificationPayload,
    ) {
        match self.notifier.send(&record.reporter_id, event, &payload).await {
            Ok(outcomes) => {
                let failed = outcomes.iter().filter(|o| !o.is_delivered()).count();
                if failed > 0 {
                    tracing::warn!(
                        "{} of {} {} notifications failed for report {}",
                        failed,
                        outcomes.len(),
                        event,
                        record.id
                    );
                }
            }
            Err(e) => {
                tracing::error!(
                    "Failed to send {} notification for report {}: {:?}",
                    event,
                    record.id,
                    e
                );
            }
        }
    }
}

fn required_verifier(verifier_id: &str) -> Result<String> {
    let verifier_id = verifier_id.trim();
    if verifier_id.is_empty() {
        return Err(AppError::validation(
            "verification.verifiedBy",
            "Verifier is required",
        ));
    }
    Ok(verifier_id.to_string())
}

fn missing_check(field: &str) -> AppError {
    AppError::validation(field, "All verification checks are required to approve")
}
