use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::stations::handlers;
use crate::features::stations::services::StationLocator;

#[derive(Clone)]
pub struct StationState {
    pub locator: Arc<dyn StationLocator>,
    pub default_radius_meters: f64,
}

/// Create routes for the stations feature
pub fn routes(locator: Arc<dyn StationLocator>, default_radius_meters: f64) -> Router {
    let state = StationState {
        locator,
        default_radius_meters,
    };

    Router::new()
        .route(
            "/api/police/stations",
            get(handlers::list_nearby_stations),
        )
        .with_state(state)
}
