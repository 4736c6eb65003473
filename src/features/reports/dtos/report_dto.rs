use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{
    AiAnalysis, Challan, EvidencePhoto, NewPhoto, NewReport, ReportLocation, ReportPatch,
    ReportPriority, ReportRecord, ReportStatus, Reward, StationAssignment, VehicleDetails,
    VehicleType, Verification, ViolationType,
};
use crate::features::reports::services::{
    AssignStation, ChallanPayment, IssueChallan, Proximity, ReportQuery, ReporterSummary,
    RewardCredit, VerificationDecision, ViolationEntry,
};
use crate::shared::geo::GeoPoint;
use crate::shared::types::{default_page, default_page_size, PaginationQuery, SortDirection};

// =============================================================================
// RESPONSE DTOs
// =============================================================================

/// External view of a report.
///
/// `reporterId` is left out entirely for anonymous reports.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponseDto {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter_id: Option<String>,
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
    pub version: u64,
}

impl From<ReportRecord> for ReportResponseDto {
    fn from(r: ReportRecord) -> Self {
        let reporter_id = (!r.is_anonymous).then_some(r.reporter_id);
        Self {
            id: r.id,
            reporter_id,
            violation_type: r.violation_type,
            description: r.description,
            location: r.location,
            photos: r.photos,
            vehicle_details: r.vehicle_details,
            status: r.status,
            assigned_police_station: r.assigned_police_station,
            verification: r.verification,
            challan: r.challan,
            reward: r.reward,
            priority: r.priority,
            is_anonymous: r.is_anonymous,
            ai_analysis: r.ai_analysis,
            reported_at: r.reported_at,
            created_at: r.created_at,
            updated_at: r.updated_at,
            version: r.version,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReporterSummaryDto {
    pub reporter_id: String,
    pub total_reports: usize,
    pub verified_reports: usize,
    pub total_earnings: i64,
    /// Percentage of reports verified, rounded to a whole number
    pub success_rate: u32,
}

impl ReporterSummaryDto {
    pub fn new(reporter_id: String, summary: ReporterSummary) -> Self {
        Self {
            reporter_id,
            total_reports: summary.total_reports,
            verified_reports: summary.verified_reports,
            total_earnings: summary.total_earnings,
            success_rate: summary.success_rate,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ViolationDto {
    #[serde(rename = "type")]
    pub violation_type: ViolationType,
    pub name: String,
    /// Fine in rupees
    pub fine: i64,
}

impl From<ViolationEntry> for ViolationDto {
    fn from(entry: ViolationEntry) -> Self {
        Self {
            violation_type: entry.violation_type,
            name: entry.display_name.to_string(),
            fine: entry.fine_amount,
        }
    }
}

// =============================================================================
// SUBMISSION & EDIT DTOs
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhotoDto {
    #[validate(length(min = 1, max = 255, message = "Photo id is required"))]
    pub public_id: String,

    #[validate(length(min = 1, max = 2048, message = "Photo URL is required"))]
    pub url: String,
}

impl From<PhotoDto> for NewPhoto {
    fn from(dto: PhotoDto) -> Self {
        Self {
            public_id: dto.public_id,
            url: dto.url,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationDto {
    pub coordinates: Option<GeoPoint>,
    pub address: Option<String>,
    pub landmark: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDetailsDto {
    #[validate(length(max = 20, message = "Number plate must be at most 20 characters"))]
    pub number_plate: Option<String>,
    pub vehicle_type: Option<VehicleType>,
    #[validate(length(max = 50))]
    pub make: Option<String>,
    #[validate(length(max = 50))]
    pub model: Option<String>,
    #[validate(length(max = 30))]
    pub color: Option<String>,
}

/// Request DTO for submitting a violation report.
///
/// Required fields are checked when the report is created so that a missing
/// field is reported by its name (`violationType`, `location.coordinates`,
/// `location.address`, `vehicleDetails.numberPlate`).
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportDto {
    #[validate(length(min = 1, max = 128, message = "Reporter is required"))]
    pub reporter_id: String,

    pub violation_type: Option<ViolationType>,

    #[validate(length(
        max = 500,
        message = "Description must be at most 500 characters"
    ))]
    pub description: Option<String>,

    pub location: Option<LocationDto>,

    #[serde(default)]
    #[validate(nested)]
    pub photos: Vec<PhotoDto>,

    #[validate(nested)]
    pub vehicle_details: Option<VehicleDetailsDto>,

    pub priority: Option<ReportPriority>,

    #[serde(default)]
    pub is_anonymous: bool,

    pub reported_at: Option<DateTime<Utc>>,
}

impl From<CreateReportDto> for NewReport {
    fn from(dto: CreateReportDto) -> Self {
        let (coordinates, address, landmark) = match dto.location {
            Some(l) => (l.coordinates, l.address, l.landmark),
            None => (None, None, None),
        };
        let vehicle = dto.vehicle_details;

        Self {
            reporter_id: dto.reporter_id,
            violation_type: dto.violation_type,
            description: dto.description,
            coordinates,
            address,
            landmark,
            photos: dto.photos.into_iter().map(Into::into).collect(),
            number_plate: vehicle.as_ref().and_then(|v| v.number_plate.clone()),
            vehicle_type: vehicle.as_ref().and_then(|v| v.vehicle_type),
            make: vehicle.as_ref().and_then(|v| v.make.clone()),
            model: vehicle.as_ref().and_then(|v| v.model.clone()),
            color: vehicle.and_then(|v| v.color),
            priority: dto.priority,
            is_anonymous: dto.is_anonymous,
            reported_at: dto.reported_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AiAnalysisDto {
    #[validate(range(min = 0.0, max = 1.0))]
    pub number_plate_confidence: Option<f64>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub violation_confidence: Option<f64>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub image_quality_score: Option<f64>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub fraud_risk_score: Option<f64>,
    pub processed_at: Option<DateTime<Utc>>,
}

/// Request DTO for editing the non-lifecycle fields of a report
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReportDto {
    pub expected_version: Option<u64>,

    #[validate(length(
        max = 500,
        message = "Description must be at most 500 characters"
    ))]
    pub description: Option<String>,

    pub priority: Option<ReportPriority>,
    pub vehicle_type: Option<VehicleType>,
    #[validate(length(max = 50))]
    pub make: Option<String>,
    #[validate(length(max = 50))]
    pub model: Option<String>,
    #[validate(length(max = 30))]
    pub color: Option<String>,

    #[validate(nested)]
    pub ai_analysis: Option<AiAnalysisDto>,
}

impl From<UpdateReportDto> for ReportPatch {
    fn from(dto: UpdateReportDto) -> Self {
        Self {
            expected_version: dto.expected_version,
            description: dto.description,
            priority: dto.priority,
            vehicle_type: dto.vehicle_type,
            make: dto.make,
            model: dto.model,
            color: dto.color,
            add_photos: Vec::new(),
            ai_analysis: dto.ai_analysis.map(|a| AiAnalysis {
                number_plate_confidence: a.number_plate_confidence,
                violation_confidence: a.violation_confidence,
                image_quality_score: a.image_quality_score,
                fraud_risk_score: a.fraud_risk_score,
                processed_at: a.processed_at.or_else(|| Some(Utc::now())),
            }),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddPhotosDto {
    pub expected_version: Option<u64>,

    #[validate(
        length(min = 1, max = 10, message = "Between 1 and 10 photos can be added"),
        nested
    )]
    pub photos: Vec<PhotoDto>,
}

// =============================================================================
// LIFECYCLE DTOs
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignStationDto {
    pub expected_version: Option<u64>,
    /// Station to assign; the nearest station is used when omitted
    pub station_id: Option<String>,
    #[validate(length(max = 100))]
    pub officer: Option<String>,
    /// Search radius for the nearest station, in meters
    #[validate(range(min = 1.0, max = 50000.0))]
    pub radius: Option<f64>,
}

impl From<AssignStationDto> for AssignStation {
    fn from(dto: AssignStationDto) -> Self {
        Self {
            station_id: dto.station_id,
            officer: dto.officer,
            radius_meters: dto.radius,
            expected_version: dto.expected_version,
        }
    }
}

/// Verifier decision, used both to verify and to reject
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerificationDecisionDto {
    pub expected_version: Option<u64>,
    #[validate(length(min = 1, max = 128, message = "Verifier is required"))]
    pub verified_by: String,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
    pub is_number_plate_valid: Option<bool>,
    pub is_photo_authentic: Option<bool>,
    pub is_location_accurate: Option<bool>,
}

impl From<VerificationDecisionDto> for VerificationDecision {
    fn from(dto: VerificationDecisionDto) -> Self {
        Self {
            verifier_id: dto.verified_by,
            notes: dto.notes,
            is_number_plate_valid: dto.is_number_plate_valid,
            is_photo_authentic: dto.is_photo_authentic,
            is_location_accurate: dto.is_location_accurate,
            expected_version: dto.expected_version,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueChallanDto {
    pub expected_version: Option<u64>,
    #[validate(length(min = 1, max = 50))]
    pub challan_number: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

impl From<IssueChallanDto> for IssueChallan {
    fn from(dto: IssueChallanDto) -> Self {
        Self {
            challan_number: dto.challan_number,
            due_date: dto.due_date,
            expected_version: dto.expected_version,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChallanPaymentDto {
    pub expected_version: Option<u64>,
    #[validate(length(min = 1, max = 50, message = "Payment method is required"))]
    pub payment_method: String,
}

impl From<ChallanPaymentDto> for ChallanPayment {
    fn from(dto: ChallanPaymentDto) -> Self {
        Self {
            payment_method: dto.payment_method,
            expected_version: dto.expected_version,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreditRewardDto {
    pub expected_version: Option<u64>,
    #[validate(length(max = 128))]
    pub transaction_id: Option<String>,
}

impl From<CreditRewardDto> for RewardCredit {
    fn from(dto: CreditRewardDto) -> Self {
        Self {
            transaction_id: dto.transaction_id,
            expected_version: dto.expected_version,
        }
    }
}

// =============================================================================
// QUERY PARAMS
// =============================================================================

/// Query params for listing reports.
///
/// Filters combine with AND. With `lat`/`lon` set, only reports within
/// `radius` meters are returned, nearest first.
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ReportQueryParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,
    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
    pub reporter_id: Option<String>,
    pub status: Option<ReportStatus>,
    /// Exact match after normalization
    pub number_plate: Option<String>,
    /// Assigned police station
    pub station_id: Option<String>,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub lat: Option<f64>,
    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "Longitude must be between -180 and 180"
    ))]
    pub lon: Option<f64>,
    /// Radius in meters around `lat`/`lon` (default 5000)
    #[validate(range(min = 1.0, max = 50000.0))]
    pub radius: Option<f64>,
    /// Sort direction by creation time (default: desc)
    #[serde(default)]
    pub sort: SortDirection,
}

impl ReportQueryParams {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            page_size: self.page_size,
        }
    }

    /// Store query for these params. A point needs both `lat` and `lon`.
    pub fn to_query(&self, default_radius_meters: f64) -> Result<ReportQuery> {
        let near = match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Proximity {
                center: GeoPoint::new(lon, lat),
                radius_meters: self.radius.unwrap_or(default_radius_meters),
            }),
            (Some(_), None) => {
                return Err(AppError::validation(
                    "lon",
                    "Longitude is required when latitude is given",
                ))
            }
            (None, Some(_)) => {
                return Err(AppError::validation(
                    "lat",
                    "Latitude is required when longitude is given",
                ))
            }
            (None, None) => None,
        };

        let pagination = self.pagination();
        Ok(ReportQuery {
            reporter_id: self.reporter_id.clone(),
            status: self.status,
            number_plate: self.number_plate.clone(),
            station_id: self.station_id.clone(),
            near,
            sort: self.sort,
            offset: pagination.offset(),
            limit: pagination.limit() as usize,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::sample_record;

    #[test]
    fn test_anonymous_reporter_is_omitted() {
        let mut record = sample_record();
        record.is_anonymous = true;

        let json = serde_json::to_value(ReportResponseDto::from(record)).unwrap();

        assert!(json.get("reporterId").is_none());
        assert_eq!(json["isAnonymous"], true);
    }

    #[test]
    fn test_named_reporter_is_included() {
        let json = serde_json::to_value(ReportResponseDto::from(sample_record())).unwrap();

        assert_eq!(json["reporterId"], "citizen-1");
        assert_eq!(json["vehicleDetails"]["numberPlate"], "KA01AB1234");
    }

    #[test]
    fn test_create_dto_maps_nested_fields() {
        let dto: CreateReportDto = serde_json::from_value(serde_json::json!({
            "reporterId": "citizen-1",
            "violationType": "signal_jump",
            "location": {
                "coordinates": { "longitude": 77.59, "latitude": 12.97 },
                "address": "Residency Road"
            },
            "vehicleDetails": { "numberPlate": " ka01ab1234 ", "vehicleType": "car" },
            "isAnonymous": true
        }))
        .unwrap();

        let input = NewReport::from(dto);

        assert_eq!(input.violation_type, Some(ViolationType::SignalJump));
        assert_eq!(input.coordinates, Some(GeoPoint::new(77.59, 12.97)));
        assert_eq!(input.number_plate.as_deref(), Some(" ka01ab1234 "));
        assert_eq!(input.vehicle_type, Some(VehicleType::Car));
        assert!(input.photos.is_empty());
        assert!(input.is_anonymous);
    }

    #[test]
    fn test_query_params_without_point_have_no_proximity() {
        let params: ReportQueryParams =
            serde_json::from_value(serde_json::json!({ "pageSize": 500 })).unwrap();

        let query = params.to_query(5_000.0).unwrap();

        assert!(query.near.is_none());
        assert_eq!(query.limit, 100);
        assert_eq!(query.offset, 0);
    }

    #[test]
    fn test_query_params_with_half_a_point_are_rejected() {
        let params: ReportQueryParams =
            serde_json::from_value(serde_json::json!({ "lat": 12.97 })).unwrap();
        let err = params.to_query(5_000.0).unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "lon"));

        let params: ReportQueryParams =
            serde_json::from_value(serde_json::json!({ "lon": 77.59 })).unwrap();
        let err = params.to_query(5_000.0).unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "lat"));
    }

    #[test]
    fn test_query_params_with_huge_page_do_not_overflow() {
        let params: ReportQueryParams =
            serde_json::from_value(serde_json::json!({ "page": i64::MAX, "pageSize": 10 }))
                .unwrap();

        let query = params.to_query(5_000.0).unwrap();

        assert_eq!(query.offset, usize::MAX);
        assert_eq!(query.limit, 10);
    }
}
