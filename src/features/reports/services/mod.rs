pub mod lifecycle_service;
pub mod report_service;
pub mod report_store;
pub mod reward;

pub use lifecycle_service::{
    AssignStation, ChallanPayment, IssueChallan, LifecycleService, RewardCredit,
    VerificationDecision,
};
pub use report_service::{ReportService, ReporterSummary, ViolationEntry};
pub use report_store::{InMemoryReportStore, Proximity, ReportQuery, ReportStore};
pub use reward::{apply_reward, compute_reward};
