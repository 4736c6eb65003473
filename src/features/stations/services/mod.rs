mod station_locator;

pub use station_locator::{StationDirectory, StationLocator};
