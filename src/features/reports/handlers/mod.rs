pub mod report_handler;
pub mod violation_handler;

pub use report_handler::*;
pub use violation_handler::*;
