//! Infrastructure layer - External service integrations
//!
//! This layer contains:
//! - Appointment providers (HTTP API, local SQLite, built-in demo data)
//! - Tokio runtime bridge for async operations

pub mod provider;
pub mod runtime;

pub use provider::{create_provider, AppointmentProvider, ProviderConfig};
pub use runtime::{RuntimeBridge, RuntimeCommand, RuntimeEvent};
