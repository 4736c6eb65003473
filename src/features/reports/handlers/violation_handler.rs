use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::features::reports::dtos::ViolationDto;
use crate::features::reports::handlers::ReportState;
use crate::shared::types::{ApiResponse, Meta};

/// Violation catalogue with the fine charged for each type
#[utoipa::path(
    get,
    path = "/api/violations",
    responses(
        (status = 200, description = "Violation types and fines", body = ApiResponse<Vec<ViolationDto>>)
    ),
    tag = "violations"
)]
pub async fn list_violations(
    State(state): State<ReportState>,
) -> Result<Json<ApiResponse<Vec<ViolationDto>>>> {
    let violations: Vec<ViolationDto> = state
        .report_service
        .violations()
        .into_iter()
        .map(Into::into)
        .collect();
    let total = violations.len() as i64;

    Ok(Json(ApiResponse::success(
        Some(violations),
        None,
        Some(Meta { total }),
    )))
}
