//! User contact details and notification preferences.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/users/{id}/notifications` | Get notification settings |
//! | PUT | `/api/users/{id}/notifications` | Create or update notification settings |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::UserContactService;
