use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::users::dtos::{
    NotificationSettingsResponseDto, UpdateNotificationSettingsDto,
};
use crate::features::users::services::UserContactService;
use crate::shared::types::ApiResponse;

/// Get a user's notification settings
#[utoipa::path(
    get,
    path = "/api/users/{id}/notifications",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Notification settings", body = ApiResponse<NotificationSettingsResponseDto>),
        (status = 404, description = "User has no contact details")
    ),
    tag = "users"
)]
pub async fn get_notification_settings(
    State(service): State<Arc<UserContactService>>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<NotificationSettingsResponseDto>>> {
    let contact = service.get(&user_id).await?;
    Ok(Json(ApiResponse::success(Some(contact.into()), None, None)))
}

/// Create or update a user's contact details and channel preferences
#[utoipa::path(
    put,
    path = "/api/users/{id}/notifications",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = UpdateNotificationSettingsDto,
    responses(
        (status = 200, description = "Notification settings updated", body = ApiResponse<NotificationSettingsResponseDto>),
        (status = 400, description = "Invalid phone, email or device token")
    ),
    tag = "users"
)]
pub async fn update_notification_settings(
    State(service): State<Arc<UserContactService>>,
    Path(user_id): Path<String>,
    AppJson(dto): AppJson<UpdateNotificationSettingsDto>,
) -> Result<Json<ApiResponse<NotificationSettingsResponseDto>>> {
    dto.validate()?;

    let contact = service.upsert(&user_id, dto.into()).await?;
    Ok(Json(ApiResponse::success(
        Some(contact.into()),
        Some("Notification settings updated".to_string()),
        None,
    )))
}
