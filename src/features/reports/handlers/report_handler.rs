use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::reports::dtos::{
    AddPhotosDto, AssignStationDto, ChallanPaymentDto, CreateReportDto, CreditRewardDto,
    IssueChallanDto, ReportQueryParams, ReportResponseDto, ReporterSummaryDto, UpdateReportDto,
    VerificationDecisionDto,
};
use crate::features::reports::services::{LifecycleService, ReportService};
use crate::shared::types::{ApiResponse, Meta};

/// State for report handlers
#[derive(Clone)]
pub struct ReportState {
    pub lifecycle: Arc<LifecycleService>,
    pub report_service: Arc<ReportService>,
    /// Radius for proximity listings that give a point but no radius
    pub default_radius_meters: f64,
}

fn ok(report: ReportResponseDto, message: &str) -> Json<ApiResponse<ReportResponseDto>> {
    Json(ApiResponse::success(
        Some(report),
        Some(message.to_string()),
        None,
    ))
}

/// Submit a violation report
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body = CreateReportDto,
    responses(
        (status = 201, description = "Report submitted", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Missing or invalid field")
    ),
    tag = "reports"
)]
pub async fn create_report(
    State(state): State<ReportState>,
    AppJson(dto): AppJson<CreateReportDto>,
) -> Result<(StatusCode, Json<ApiResponse<ReportResponseDto>>)> {
    dto.validate()?;

    let report = state.lifecycle.submit(dto.into()).await?;
    Ok((
        StatusCode::CREATED,
        ok(report.into(), "Report submitted successfully"),
    ))
}

/// List reports, filtered and paginated
#[utoipa::path(
    get,
    path = "/api/reports",
    params(ReportQueryParams),
    responses(
        (status = 200, description = "Page of reports", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 400, description = "Invalid filter")
    ),
    tag = "reports"
)]
pub async fn list_reports(
    State(state): State<ReportState>,
    Query(params): Query<ReportQueryParams>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    params.validate()?;

    let query = params.to_query(state.default_radius_meters)?;
    let (reports, total) = state.report_service.list(&query).await?;
    let dtos: Vec<ReportResponseDto> = reports.into_iter().map(Into::into).collect();

    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta {
            total: total as i64,
        }),
    )))
}

/// Get report by ID
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportResponseDto>),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn get_report(
    State(state): State<ReportState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = state.report_service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}

/// Edit description, priority, vehicle details or AI analysis
#[utoipa::path(
    patch,
    path = "/api/reports/{id}",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    request_body = UpdateReportDto,
    responses(
        (status = 200, description = "Report updated", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Invalid field"),
        (status = 404, description = "Report not found"),
        (status = 409, description = "Version conflict")
    ),
    tag = "reports"
)]
pub async fn update_report(
    State(state): State<ReportState>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateReportDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    dto.validate()?;

    let report = state.report_service.update(id, dto.into()).await?;
    Ok(ok(report.into(), "Report updated"))
}

/// Append evidence photos
#[utoipa::path(
    post,
    path = "/api/reports/{id}/photos",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    request_body = AddPhotosDto,
    responses(
        (status = 200, description = "Photos added", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Invalid photo"),
        (status = 404, description = "Report not found"),
        (status = 409, description = "Version conflict")
    ),
    tag = "reports"
)]
pub async fn add_photos(
    State(state): State<ReportState>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<AddPhotosDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    dto.validate()?;

    let photos = dto.photos.into_iter().map(Into::into).collect();
    let report = state
        .report_service
        .add_photos(id, photos, dto.expected_version)
        .await?;
    Ok(ok(report.into(), "Photos added"))
}

/// Assign a pending report to a police station (pending -> under_review)
#[utoipa::path(
    post,
    path = "/api/reports/{id}/assign",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    request_body = AssignStationDto,
    responses(
        (status = 200, description = "Report assigned", body = ApiResponse<ReportResponseDto>),
        (status = 404, description = "Report or station not found"),
        (status = 409, description = "Invalid transition or version conflict"),
        (status = 502, description = "Station lookup failed")
    ),
    tag = "reports"
)]
pub async fn assign_station(
    State(state): State<ReportState>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<AssignStationDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    dto.validate()?;

    let report = state.lifecycle.assign_station(id, dto.into()).await?;
    Ok(ok(report.into(), "Report assigned to police station"))
}

/// Approve a report under review (under_review -> verified)
#[utoipa::path(
    post,
    path = "/api/reports/{id}/verify",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    request_body = VerificationDecisionDto,
    responses(
        (status = 200, description = "Report verified", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Verification check missing"),
        (status = 404, description = "Report not found"),
        (status = 409, description = "Invalid transition or version conflict")
    ),
    tag = "reports"
)]
pub async fn verify_report(
    State(state): State<ReportState>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<VerificationDecisionDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    dto.validate()?;

    let report = state.lifecycle.verify(id, dto.into()).await?;
    Ok(ok(report.into(), "Report verified"))
}

/// Reject a report under review (under_review -> rejected)
#[utoipa::path(
    post,
    path = "/api/reports/{id}/reject",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    request_body = VerificationDecisionDto,
    responses(
        (status = 200, description = "Report rejected", body = ApiResponse<ReportResponseDto>),
        (status = 404, description = "Report not found"),
        (status = 409, description = "Invalid transition or version conflict")
    ),
    tag = "reports"
)]
pub async fn reject_report(
    State(state): State<ReportState>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<VerificationDecisionDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    dto.validate()?;

    let report = state.lifecycle.reject(id, dto.into()).await?;
    Ok(ok(report.into(), "Report rejected"))
}

/// Formally issue the challan (verified -> challan_issued)
#[utoipa::path(
    post,
    path = "/api/reports/{id}/challan",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    request_body = IssueChallanDto,
    responses(
        (status = 200, description = "Challan issued", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Invalid due date"),
        (status = 404, description = "Report not found"),
        (status = 409, description = "Invalid transition or version conflict")
    ),
    tag = "reports"
)]
pub async fn issue_challan(
    State(state): State<ReportState>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<IssueChallanDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    dto.validate()?;

    let report = state.lifecycle.issue_challan(id, dto.into()).await?;
    Ok(ok(report.into(), "Challan issued"))
}

/// Record payment of an issued challan
#[utoipa::path(
    post,
    path = "/api/reports/{id}/challan/payment",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    request_body = ChallanPaymentDto,
    responses(
        (status = 200, description = "Challan marked paid", body = ApiResponse<ReportResponseDto>),
        (status = 404, description = "Report not found"),
        (status = 409, description = "Challan not issued, already paid, or version conflict")
    ),
    tag = "reports"
)]
pub async fn pay_challan(
    State(state): State<ReportState>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<ChallanPaymentDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    dto.validate()?;

    let report = state.lifecycle.record_challan_payment(id, dto.into()).await?;
    Ok(ok(report.into(), "Challan payment recorded"))
}

/// Credit the reporter's reward
#[utoipa::path(
    post,
    path = "/api/reports/{id}/reward/credit",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    request_body = CreditRewardDto,
    responses(
        (status = 200, description = "Reward credited", body = ApiResponse<ReportResponseDto>),
        (status = 404, description = "Report not found"),
        (status = 409, description = "No reward to credit, already credited, or version conflict")
    ),
    tag = "reports"
)]
pub async fn credit_reward(
    State(state): State<ReportState>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<CreditRewardDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    dto.validate()?;

    let report = state.lifecycle.credit_reward(id, dto.into()).await?;
    Ok(ok(report.into(), "Reward credited"))
}

/// Totals and success rate for one reporter
#[utoipa::path(
    get,
    path = "/api/reporters/{id}/summary",
    params(
        ("id" = String, Path, description = "Reporter ID")
    ),
    responses(
        (status = 200, description = "Reporter summary", body = ApiResponse<ReporterSummaryDto>)
    ),
    tag = "reports"
)]
pub async fn get_reporter_summary(
    State(state): State<ReportState>,
    Path(reporter_id): Path<String>,
) -> Result<Json<ApiResponse<ReporterSummaryDto>>> {
    let summary = state.report_service.reporter_summary(&reporter_id).await?;
    Ok(Json(ApiResponse::success(
        Some(ReporterSummaryDto::new(reporter_id, summary)),
        None,
        None,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::models::ReportStatus;
    use crate::features::reports::routes;
    use crate::shared::test_helpers::{report_services, RecordingNotifier};
    use axum_test::TestServer;
    use serde_json::{json, Value};

    fn server() -> TestServer {
        let (lifecycle, report_service) = report_services(RecordingNotifier::new());
        let app = routes::routes(lifecycle, report_service, 5_000.0);
        TestServer::new(app).unwrap()
    }

    fn submission(anonymous: bool) -> Value {
        json!({
            "reporterId": "citizen-1",
            "violationType": "no_helmet",
            "description": "Rider without helmet near the metro station",
            "location": {
                "coordinates": { "longitude": 77.6060, "latitude": 12.9756 },
                "address": "MG Road, Bengaluru"
            },
            "photos": [{ "publicId": "evidence/1", "url": "https://cdn.example.com/1.jpg" }],
            "vehicleDetails": { "numberPlate": "ka01ab1234", "vehicleType": "motorcycle" },
            "isAnonymous": anonymous
        })
    }

    async fn submit(server: &TestServer, anonymous: bool) -> ReportResponseDto {
        let response = server.post("/api/reports").json(&submission(anonymous)).await;
        response.assert_status(StatusCode::CREATED);
        response
            .json::<ApiResponse<ReportResponseDto>>()
            .data
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_report() {
        let server = server();

        let report = submit(&server, false).await;

        assert_eq!(report.status, ReportStatus::Pending);
        assert_eq!(report.vehicle_details.number_plate, "KA01AB1234");
        assert_eq!(report.reporter_id.as_deref(), Some("citizen-1"));
        assert_eq!(report.reward.amount, 0);
        assert_eq!(report.version, 1);
    }

    #[tokio::test]
    async fn test_create_report_names_missing_field() {
        let server = server();
        let mut body = submission(false);
        body["location"]
            .as_object_mut()
            .unwrap()
            .remove("coordinates");

        let response = server.post("/api/reports").json(&body).await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["errors"][0], "location.coordinates");
    }

    #[tokio::test]
    async fn test_create_report_rejects_out_of_range_latitude() {
        let server = server();
        let mut body = submission(false);
        body["location"]["coordinates"]["latitude"] = json!(200.0);

        let response = server.post("/api/reports").json(&body).await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_anonymous_report_hides_reporter() {
        let server = server();
        let report = submit(&server, true).await;

        let response = server.get(&format!("/api/reports/{}", report.id)).await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert!(body["data"].get("reporterId").is_none());

        // Still found when listing by reporter
        let listed = server
            .get("/api/reports")
            .add_query_param("reporterId", "citizen-1")
            .await;
        let listed: Value = listed.json();
        assert_eq!(listed["meta"]["total"], 1);
        assert!(listed["data"][0].get("reporterId").is_none());
    }

    #[tokio::test]
    async fn test_get_unknown_report_is_not_found() {
        let response = server()
            .get(&format!("/api/reports/{}", Uuid::now_v7()))
            .await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn test_full_lifecycle_over_http() {
        let server = server();
        let report = submit(&server, false).await;
        let base = format!("/api/reports/{}", report.id);

        server
            .post(&format!("{}/assign", base))
            .json(&json!({}))
            .await
            .assert_status_ok();

        let verified = server
            .post(&format!("{}/verify", base))
            .json(&json!({
                "verifiedBy": "officer-7",
                "isNumberPlateValid": true,
                "isPhotoAuthentic": true,
                "isLocationAccurate": true
            }))
            .await;
        verified.assert_status_ok();
        let verified = verified
            .json::<ApiResponse<ReportResponseDto>>()
            .data
            .unwrap();
        assert_eq!(verified.status, ReportStatus::Verified);
        assert_eq!(verified.challan.as_ref().unwrap().fine_amount, 500);
        assert_eq!(verified.reward.amount, 50);

        let issued = server
            .post(&format!("{}/challan", base))
            .json(&json!({ "expectedVersion": verified.version }))
            .await;
        issued.assert_status_ok();

        server
            .post(&format!("{}/challan/payment", base))
            .json(&json!({ "paymentMethod": "upi" }))
            .await
            .assert_status_ok();

        let credited = server
            .post(&format!("{}/reward/credit", base))
            .json(&json!({ "transactionId": "txn-1" }))
            .await;
        credited.assert_status_ok();
        let credited = credited
            .json::<ApiResponse<ReportResponseDto>>()
            .data
            .unwrap();
        assert_eq!(credited.status, ReportStatus::ChallanIssued);
        assert!(credited.reward.is_paid);
        assert!(credited.challan.unwrap().is_paid);

        let summary: Value = server
            .get("/api/reporters/citizen-1/summary")
            .await
            .json();
        assert_eq!(summary["data"]["totalReports"], 1);
        assert_eq!(summary["data"]["verifiedReports"], 1);
        assert_eq!(summary["data"]["totalEarnings"], 50);
        assert_eq!(summary["data"]["successRate"], 100);
    }

    #[tokio::test]
    async fn test_verify_pending_report_is_conflict() {
        let server = server();
        let report = submit(&server, false).await;

        let response = server
            .post(&format!("/api/reports/{}/verify", report.id))
            .json(&json!({
                "verifiedBy": "officer-7",
                "isNumberPlateValid": true,
                "isPhotoAuthentic": true,
                "isLocationAccurate": true
            }))
            .await;

        response.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_stale_expected_version_is_conflict() {
        let server = server();
        let report = submit(&server, false).await;

        let response = server
            .patch(&format!("/api/reports/{}", report.id))
            .json(&json!({ "expectedVersion": 7, "priority": "high" }))
            .await;

        response.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_add_photos_appends() {
        let server = server();
        let report = submit(&server, false).await;

        let response = server
            .post(&format!("/api/reports/{}/photos", report.id))
            .json(&json!({
                "photos": [{ "publicId": "evidence/2", "url": "https://cdn.example.com/2.jpg" }]
            }))
            .await;

        response.assert_status_ok();
        let updated = response
            .json::<ApiResponse<ReportResponseDto>>()
            .data
            .unwrap();
        assert_eq!(updated.photos.len(), 2);
        assert_eq!(updated.photos[1].public_id, "evidence/2");
    }

    #[tokio::test]
    async fn test_list_near_point() {
        let server = server();
        submit(&server, false).await;

        let near: Value = server
            .get("/api/reports")
            .add_query_param("lat", 12.97)
            .add_query_param("lon", 77.59)
            .add_query_param("radius", 5000)
            .await
            .json();
        assert_eq!(near["meta"]["total"], 1);

        let far: Value = server
            .get("/api/reports")
            .add_query_param("lat", 28.61)
            .add_query_param("lon", 77.20)
            .add_query_param("radius", 5000)
            .await
            .json();
        assert_eq!(far["meta"]["total"], 0);
    }

    #[tokio::test]
    async fn test_list_with_huge_page_is_empty() {
        let server = server();
        submit(&server, false).await;

        let response = server
            .get("/api/reports")
            .add_query_param("page", i64::MAX)
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["meta"]["total"], 1);
        assert_eq!(body["data"].as_array().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn test_list_with_latitude_only_is_rejected() {
        let server = server();

        let response = server
            .get("/api/reports")
            .add_query_param("lat", 12.97)
            .await;

        response.assert_status_bad_request();
    }
}
