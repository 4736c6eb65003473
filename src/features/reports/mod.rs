//! Violation reports.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/reports` | Submit a report (starts `pending`) |
//! | GET | `/api/reports` | Filtered, paginated listing; `lat`/`lon`/`radius` for proximity |
//! | GET | `/api/reports/{id}` | Report detail |
//! | PATCH | `/api/reports/{id}` | Edit description, priority, vehicle details, AI analysis |
//! | POST | `/api/reports/{id}/photos` | Append evidence photos |
//! | POST | `/api/reports/{id}/assign` | pending -> under_review |
//! | POST | `/api/reports/{id}/verify` | under_review -> verified |
//! | POST | `/api/reports/{id}/reject` | under_review -> rejected |
//! | POST | `/api/reports/{id}/challan` | verified -> challan_issued |
//! | POST | `/api/reports/{id}/challan/payment` | Mark the challan paid |
//! | POST | `/api/reports/{id}/reward/credit` | Mark the reward paid |
//! | GET | `/api/reporters/{id}/summary` | Reporter totals and success rate |
//! | GET | `/api/violations` | Violation catalogue with fines |
//!
//! Every mutating request accepts an optional `expectedVersion`.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{InMemoryReportStore, LifecycleService, ReportService, ReportStore};
