//! Modules layer - Infrastructure components for external integrations
//!
//! Contains adapters for external services such as notification delivery.

pub mod notifications;
