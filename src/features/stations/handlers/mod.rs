pub mod station_handler;

pub use station_handler::*;
