use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::geo::GeoPoint;

/// Traffic violation categories a citizen can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ViolationType {
    NoHelmet,
    WrongSide,
    SignalJump,
    Overspeeding,
    DrunkDriving,
    Other,
}

impl ViolationType {
    pub const ALL: [ViolationType; 6] = [
        ViolationType::NoHelmet,
        ViolationType::WrongSide,
        ViolationType::SignalJump,
        ViolationType::Overspeeding,
        ViolationType::DrunkDriving,
        ViolationType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationType::NoHelmet => "no_helmet",
            ViolationType::WrongSide => "wrong_side",
            ViolationType::SignalJump => "signal_jump",
            ViolationType::Overspeeding => "overspeeding",
            ViolationType::DrunkDriving => "drunk_driving",
            ViolationType::Other => "other",
        }
    }

    /// Human-readable name shown in the violation catalogue
    pub fn display_name(&self) -> &'static str {
        match self {
            ViolationType::NoHelmet => "No Helmet",
            ViolationType::WrongSide => "Wrong Side Driving",
            ViolationType::SignalJump => "Signal Jump",
            ViolationType::Overspeeding => "Overspeeding",
            ViolationType::DrunkDriving => "Drunk Driving",
            ViolationType::Other => "Other",
        }
    }
}

impl std::fmt::Display for ViolationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    #[default]
    Motorcycle,
    Car,
    Truck,
    Bus,
    Auto,
    Other,
}

/// Report lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    UnderReview,
    Verified,
    Rejected,
    ChallanIssued,
}

impl ReportStatus {
    /// Edges of the lifecycle state machine.
    ///
    /// pending -> under_review -> verified -> challan_issued, with
    /// under_review -> rejected as the only other exit.
    pub fn can_transition_to(&self, next: ReportStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        matches!(
            (self, next),
            (ReportStatus::Pending, ReportStatus::UnderReview)
                | (ReportStatus::UnderReview, ReportStatus::Verified)
                | (ReportStatus::UnderReview, ReportStatus::Rejected)
                | (ReportStatus::Verified, ReportStatus::ChallanIssued)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ReportStatus::Rejected | ReportStatus::ChallanIssued)
    }

    /// Whether the report counts as a successful (verified) report
    pub fn is_verified(&self) -> bool {
        matches!(self, ReportStatus::Verified | ReportStatus::ChallanIssued)
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStatus::Pending => write!(f, "pending"),
            ReportStatus::UnderReview => write!(f, "under_review"),
            ReportStatus::Verified => write!(f, "verified"),
            ReportStatus::Rejected => write!(f, "rejected"),
            ReportStatus::ChallanIssued => write!(f, "challan_issued"),
        }
    }
}

/// Informational priority; never affects transitions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportLocation {
    pub coordinates: GeoPoint,
    pub address: String,
    pub landmark: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EvidencePhoto {
    /// Id of the photo in external storage
    pub public_id: String,
    pub url: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDetails {
    pub number_plate: String,
    pub vehicle_type: VehicleType,
    pub make: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StationAssignment {
    pub station_id: String,
    pub station_name: String,
    pub station_address: String,
    pub contact_number: Option<String>,
    pub assigned_at: DateTime<Utc>,
    pub assigned_officer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    pub verified_by: String,
    pub verified_at: DateTime<Utc>,
    pub verification_notes: Option<String>,
    pub is_number_plate_valid: Option<bool>,
    pub is_photo_authentic: Option<bool>,
    pub is_location_accurate: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Challan {
    /// Assigned when the challan is formally issued
    pub challan_number: Option<String>,
    pub fine_amount: i64,
    pub issued_at: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub payment_method: Option<String>,
}

impl Challan {
    pub fn new(fine_amount: i64) -> Self {
        Self {
            challan_number: None,
            fine_amount,
            issued_at: None,
            due_date: None,
            is_paid: false,
            paid_at: None,
            payment_method: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    /// Derived from the challan fine, never supplied by callers
    pub amount: i64,
    /// Set when the amount was derived; the amount is frozen afterwards
    pub computed_at: Option<DateTime<Utc>>,
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AiAnalysis {
    pub number_plate_confidence: Option<f64>,
    pub violation_confidence: Option<f64>,
    pub image_quality_score: Option<f64>,
    pub fraud_risk_score: Option<f64>,
    pub processed_at: Option<DateTime<Utc>>,
}

/// Persisted violation report document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportRecord {
    pub id: Uuid,
    pub reporter_id: String,
    pub violation_type: ViolationType,
    pub description: Option<String>,
    pub location: ReportLocation,
    pub photos: Vec<EvidencePhoto>,
    pub vehicle_details: VehicleDetails,
    pub status: ReportStatus,
    pub assigned_police_station: Option<StationAssignment>,
    pub verification: Option<Verification>,
    pub challan: Option<Challan>,
    pub reward: Reward,
    pub priority: ReportPriority,
    pub is_anonymous: bool,
    pub ai_analysis: Option<AiAnalysis>,
    pub reported_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Optimistic concurrency token, bumped on every committed write
    pub version: u64,
}

impl ReportRecord {
    pub fn fine_amount(&self) -> Option<i64> {
        self.challan.as_ref().map(|c| c.fine_amount)
    }
}

/// Photo reference supplied when attaching evidence
#[derive(Debug, Clone)]
pub struct NewPhoto {
    pub public_id: String,
    pub url: String,
}

/// Unvalidated submission; the store checks required fields on create
#[derive(Debug, Clone, Default)]
pub struct NewReport {
    pub reporter_id: String,
    pub violation_type: Option<ViolationType>,
    pub description: Option<String>,
    pub coordinates: Option<GeoPoint>,
    pub address: Option<String>,
    pub landmark: Option<String>,
    pub photos: Vec<NewPhoto>,
    pub number_plate: Option<String>,
    pub vehicle_type: Option<VehicleType>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub priority: Option<ReportPriority>,
    pub is_anonymous: bool,
    pub reported_at: Option<DateTime<Utc>>,
}

/// Changes to the non-lifecycle fields of a report
#[derive(Debug, Clone, Default)]
pub struct ReportPatch {
    pub expected_version: Option<u64>,
    pub description: Option<String>,
    pub priority: Option<ReportPriority>,
    pub vehicle_type: Option<VehicleType>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub add_photos: Vec<NewPhoto>,
    pub ai_analysis: Option<AiAnalysis>,
}
