use utoipa::{Modify, OpenApi};

use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::features::stations::{
    dtos as stations_dtos, handlers as stations_handlers, models as stations_models,
};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers};
use crate::shared::geo::GeoPoint;
use crate::shared::types::{ApiResponse, Meta, SortDirection};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Reports
        reports_handlers::report_handler::create_report,
        reports_handlers::report_handler::list_reports,
        reports_handlers::report_handler::get_report,
        reports_handlers::report_handler::update_report,
        reports_handlers::report_handler::add_photos,
        reports_handlers::report_handler::assign_station,
        reports_handlers::report_handler::verify_report,
        reports_handlers::report_handler::reject_report,
        reports_handlers::report_handler::issue_challan,
        reports_handlers::report_handler::pay_challan,
        reports_handlers::report_handler::credit_reward,
        reports_handlers::report_handler::get_reporter_summary,
        // Violations (public)
        reports_handlers::violation_handler::list_violations,
        // Police stations (public)
        stations_handlers::station_handler::list_nearby_stations,
        // Users
        users_handlers::contact_handler::get_notification_settings,
        users_handlers::contact_handler::update_notification_settings,
    ),
    components(
        schemas(
            // Shared
            Meta,
            GeoPoint,
            SortDirection,
            // Reports
            reports_models::ViolationType,
            reports_models::VehicleType,
            reports_models::ReportStatus,
            reports_models::ReportPriority,
            reports_models::ReportLocation,
            reports_models::EvidencePhoto,
            reports_models::VehicleDetails,
            reports_models::StationAssignment,
            reports_models::Verification,
            reports_models::Challan,
            reports_models::Reward,
            reports_models::AiAnalysis,
            reports_dtos::ReportResponseDto,
            reports_dtos::ReporterSummaryDto,
            reports_dtos::ViolationDto,
            reports_dtos::PhotoDto,
            reports_dtos::LocationDto,
            reports_dtos::VehicleDetailsDto,
            reports_dtos::CreateReportDto,
            reports_dtos::AiAnalysisDto,
            reports_dtos::UpdateReportDto,
            reports_dtos::AddPhotosDto,
            reports_dtos::AssignStationDto,
            reports_dtos::VerificationDecisionDto,
            reports_dtos::IssueChallanDto,
            reports_dtos::ChallanPaymentDto,
            reports_dtos::CreditRewardDto,
            ApiResponse<reports_dtos::ReportResponseDto>,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            ApiResponse<reports_dtos::ReporterSummaryDto>,
            ApiResponse<Vec<reports_dtos::ViolationDto>>,
            // Stations
            stations_models::PoliceStation,
            stations_dtos::StationResponseDto,
            ApiResponse<Vec<stations_dtos::StationResponseDto>>,
            // Users
            users_dtos::NotificationFlagsDto,
            users_dtos::UpdateNotificationSettingsDto,
            users_dtos::NotificationSettingsResponseDto,
            ApiResponse<users_dtos::NotificationSettingsResponseDto>,
        )
    ),
    tags(
        (name = "reports", description = "Violation reports and their lifecycle"),
        (name = "violations", description = "Violation catalogue and fines (public)"),
        (name = "stations", description = "Nearby police stations (public)"),
        (name = "users", description = "Contact details and notification preferences"),
    ),
    info(
        title = "CACHE API",
        version = "0.1.0",
        description = "API documentation for CACHE",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
