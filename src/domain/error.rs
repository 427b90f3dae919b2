use thiserror::Error;

use super::AppointmentId;

/// Errors surfaced by the dashboard view-model and status helpers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    /// The appointment provider failed while loading the collection
    #[error("failed to fetch appointments: {0}")]
    FetchFailed(String),

    /// `update_status` referenced an id that is not in the collection
    #[error("appointment {0} not found")]
    NotFound(AppointmentId),

    /// A status value outside pending/confirmed/cancelled/completed
    #[error("invalid appointment status: {0:?}")]
    InvalidStatus(String),

    /// The operation is only meaningful once data is loaded
    #[error("dashboard is {0}, not ready")]
    NotReady(&'static str),
}
