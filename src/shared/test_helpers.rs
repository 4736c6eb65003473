//! Builders and collaborator fakes shared by unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use fake::faker::address::en::{CityName, StreetName};
use fake::faker::lorem::en::Sentence;
use fake::Fake;
use uuid::Uuid;

use crate::core::config::{ChallanConfig, RewardConfig, StationConfig};
use crate::core::error::AppError;
use crate::features::reports::models::{
    EvidencePhoto, NewPhoto, NewReport, ReportLocation, ReportPriority, ReportRecord,
    ReportStatus, Reward, VehicleDetails, VehicleType, ViolationType,
};
use crate::features::reports::services::{
    InMemoryReportStore, LifecycleService, ReportService, ReportStore,
};
use crate::features::stations::models::{PoliceStation, StationCandidate};
use crate::features::stations::services::{StationDirectory, StationLocator};
use crate::modules::notifications::{
    DeliveryChannel, DeliveryOutcome, NotificationEvent, NotificationPayload, Notifier,
};
use crate::shared::geo::GeoPoint;

/// Next to the MG Road station of the built-in directory
pub fn mg_road() -> GeoPoint {
    GeoPoint::new(77.6060, 12.9756)
}

fn fake_address() -> String {
    let street: String = StreetName().fake();
    let city: String = CityName().fake();
    format!("{}, {}", street, city)
}

/// Valid submission for `reporter_id` near MG Road
pub fn new_report(reporter_id: &str) -> NewReport {
    new_report_at(reporter_id, mg_road())
}

pub fn new_report_at(reporter_id: &str, coordinates: GeoPoint) -> NewReport {
    let description: String = Sentence(3..8).fake();
    NewReport {
        reporter_id: reporter_id.to_string(),
        violation_type: Some(ViolationType::NoHelmet),
        description: Some(description),
        coordinates: Some(coordinates),
        address: Some(fake_address()),
        landmark: None,
        photos: vec![NewPhoto {
            public_id: format!("evidence/{}", Uuid::now_v7()),
            url: "https://cdn.example.com/evidence/photo.jpg".to_string(),
        }],
        number_plate: Some("KA01AB1234".to_string()),
        vehicle_type: Some(VehicleType::Motorcycle),
        ..Default::default()
    }
}

/// Freshly submitted record, built without going through a store
pub fn sample_record() -> ReportRecord {
    let now = Utc::now();
    ReportRecord {
        id: Uuid::now_v7(),
        reporter_id: "citizen-1".to_string(),
        violation_type: ViolationType::NoHelmet,
        description: Some("Rider without helmet".to_string()),
        location: ReportLocation {
            coordinates: mg_road(),
            address: fake_address(),
            landmark: None,
        },
        photos: vec![EvidencePhoto {
            public_id: "evidence/1".to_string(),
            url: "https://cdn.example.com/evidence/1.jpg".to_string(),
            uploaded_at: now,
        }],
        vehicle_details: VehicleDetails {
            number_plate: "KA01AB1234".to_string(),
            vehicle_type: VehicleType::Motorcycle,
            make: None,
            model: None,
            color: None,
        },
        status: ReportStatus::Pending,
        assigned_police_station: None,
        verification: None,
        challan: None,
        reward: Reward::default(),
        priority: ReportPriority::Medium,
        is_anonymous: false,
        ai_analysis: None,
        reported_at: now,
        created_at: now,
        updated_at: now,
        version: 1,
    }
}

/// One recorded `Notifier::send` call
#[derive(Debug, Clone)]
pub struct SentNotification {
    pub user_id: String,
    pub event: NotificationEvent,
    pub payload: NotificationPayload,
}

/// Notifier fake that records every call and can be told to fail
#[derive(Default)]
pub struct RecordingNotifier {
    calls: Mutex<Vec<SentNotification>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    pub fn calls(&self) -> Vec<SentNotification> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(
        &self,
        user_id: &str,
        event: NotificationEvent,
        payload: &NotificationPayload,
    ) -> Result<Vec<DeliveryOutcome>, AppError> {
        self.calls.lock().unwrap().push(SentNotification {
            user_id: user_id.to_string(),
            event,
            payload: payload.clone(),
        });

        if self.fail {
            return Err(AppError::Dependency("notification gateway down".to_string()));
        }

        Ok(vec![DeliveryOutcome {
            channel: DeliveryChannel::Sms,
            recipient: user_id.to_string(),
            message_id: Some("test-message".to_string()),
            error: None,
        }])
    }
}

/// StationLocator fake whose every lookup fails
pub struct FailingStationLocator;

#[async_trait]
impl StationLocator for FailingStationLocator {
    async fn nearest(
        &self,
        _point: &GeoPoint,
        _radius_meters: f64,
    ) -> Result<Vec<StationCandidate>, AppError> {
        Err(AppError::Dependency("station directory unavailable".to_string()))
    }

    async fn find(&self, _station_id: &str) -> Result<Option<PoliceStation>, AppError> {
        Err(AppError::Dependency("station directory unavailable".to_string()))
    }
}

/// Lifecycle and report services sharing one in-memory store, wired to the
/// built-in station directory and default configuration
pub fn report_services(
    notifier: Arc<RecordingNotifier>,
) -> (Arc<LifecycleService>, Arc<ReportService>) {
    let store: Arc<dyn ReportStore> = Arc::new(InMemoryReportStore::new());
    let challan = ChallanConfig::default();

    let lifecycle = LifecycleService::new(
        store.clone(),
        notifier,
        Arc::new(StationDirectory::builtin()),
        &RewardConfig::default(),
        &challan,
        &StationConfig::default(),
    );
    let reports = ReportService::new(store, challan.fines);

    (Arc::new(lifecycle), Arc::new(reports))
}
