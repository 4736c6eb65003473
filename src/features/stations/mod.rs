//! Police station directory.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/police/stations?lat&lon&radius` | Stations near a point, nearest first |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{StationDirectory, StationLocator};
