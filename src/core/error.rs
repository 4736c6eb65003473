use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use validator::ValidationErrors;

use crate::features::reports::models::ReportStatus;
use crate::shared::types::ApiResponse;
use crate::shared::validation::first_invalid_field;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid transition: cannot move report from {from} to {to}")]
    InvalidTransition { from: ReportStatus, to: ReportStatus },

    #[error("Concurrency conflict: {0}")]
    ConcurrencyConflict(String),

    #[error("Dependency error: {0}")]
    Dependency(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let (field, message) = first_invalid_field(&errors);
        AppError::Validation { field, message }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::Validation { ref field, .. } => (
                StatusCode::BAD_REQUEST,
                self.to_string(),
                Some(vec![field.clone()]),
            ),
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::InvalidTransition { .. } => (StatusCode::CONFLICT, self.to_string(), None),
            AppError::ConcurrencyConflict(ref msg) => (StatusCode::CONFLICT, msg.clone(), None),
            AppError::Dependency(ref msg) => {
                tracing::error!("Dependency error: {}", msg);
                (StatusCode::BAD_GATEWAY, msg.clone(), None)
            }
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = Json(ApiResponse::<()>::error(Some(message), errors));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_names_field() {
        let err = AppError::validation("location.coordinates", "latitude out of range");
        assert_eq!(
            err.to_string(),
            "Validation error: location.coordinates: latitude out of range"
        );
    }

    #[test]
    fn test_invalid_transition_names_both_statuses() {
        let err = AppError::InvalidTransition {
            from: ReportStatus::Pending,
            to: ReportStatus::Verified,
        };
        assert_eq!(
            err.to_string(),
            "Invalid transition: cannot move report from pending to verified"
        );
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::validation("f", "m"), StatusCode::BAD_REQUEST),
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                AppError::InvalidTransition {
                    from: ReportStatus::Rejected,
                    to: ReportStatus::Verified,
                },
                StatusCode::CONFLICT,
            ),
            (
                AppError::ConcurrencyConflict("x".into()),
                StatusCode::CONFLICT,
            ),
            (AppError::Dependency("x".into()), StatusCode::BAD_GATEWAY),
            (
                AppError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
