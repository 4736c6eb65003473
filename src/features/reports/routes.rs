use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::reports::handlers::{self, ReportState};
use crate::features::reports::services::{LifecycleService, ReportService};

/// Create routes for the reports feature
///
/// Lifecycle transitions are POSTs on sub-resources of the report
pub fn routes(
    lifecycle: Arc<LifecycleService>,
    report_service: Arc<ReportService>,
    default_radius_meters: f64,
) -> Router {
    let state = ReportState {
        lifecycle,
        report_service,
        default_radius_meters,
    };

    Router::new()
        .route(
            "/api/reports",
            get(handlers::list_reports).post(handlers::create_report),
        )
        .route(
            "/api/reports/{id}",
            get(handlers::get_report).patch(handlers::update_report),
        )
        .route("/api/reports/{id}/photos", post(handlers::add_photos))
        .route("/api/reports/{id}/assign", post(handlers::assign_station))
        .route("/api/reports/{id}/verify", post(handlers::verify_report))
        .route("/api/reports/{id}/reject", post(handlers::reject_report))
        .route("/api/reports/{id}/challan", post(handlers::issue_challan))
        .route(
            "/api/reports/{id}/challan/payment",
            post(handlers::pay_challan),
        )
        .route(
            "/api/reports/{id}/reward/credit",
            post(handlers::credit_reward),
        )
        .route(
            "/api/reporters/{id}/summary",
            get(handlers::get_reporter_summary),
        )
        .route("/api/violations", get(handlers::list_violations))
        .with_state(state)
}
