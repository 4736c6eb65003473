mod user_contact_service;

pub use user_contact_service::{ContactUpdate, UserContactService};
