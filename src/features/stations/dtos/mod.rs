mod station_dto;

pub use station_dto::*;
