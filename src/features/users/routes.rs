use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::users::handlers;
use crate::features::users::services::UserContactService;

/// Create routes for the users feature
pub fn routes(service: Arc<UserContactService>) -> Router {
    Router::new()
        .route(
            "/api/users/{id}/notifications",
            get(handlers::get_notification_settings).put(handlers::update_notification_settings),
        )
        .with_state(service)
}
