pub mod reports;
pub mod stations;
pub mod users;
