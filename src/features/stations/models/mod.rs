mod police_station;

pub use police_station::{PoliceStation, StationCandidate};
