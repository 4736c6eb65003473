mod fine_schedule;
mod report;

pub use fine_schedule::FineSchedule;
pub use report::{
    AiAnalysis, Challan, EvidencePhoto, NewPhoto, NewReport, ReportLocation, ReportPatch,
    ReportPriority, ReportRecord, ReportStatus, Reward, StationAssignment, VehicleDetails,
    VehicleType, Verification, ViolationType,
};
