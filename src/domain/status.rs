//! Status presentation helpers
//!
//! Pure lookups from an appointment status to its display color and
//! label. The typed variants are total; the `_raw` variants accept wire
//! strings and reject anything outside the four known statuses instead of
//! falling back to a default color.

use super::{AppointmentStatus, Color, DashboardError, Theme};

pub fn color_for(status: AppointmentStatus, theme: &Theme) -> Color {
    match status {
        AppointmentStatus::Pending => theme.pending,
        AppointmentStatus::Confirmed => theme.confirmed,
        AppointmentStatus::Cancelled => theme.cancelled,
        AppointmentStatus::Completed => theme.completed,
    }
}

pub fn label_for(status: AppointmentStatus) -> &'static str {
    match status {
        AppointmentStatus::Pending => "Pending",
        AppointmentStatus::Confirmed => "Confirmed",
        AppointmentStatus::Cancelled => "Cancelled",
        AppointmentStatus::Completed => "Completed",
    }
}

pub fn color_for_raw(status: &str, theme: &Theme) -> Result<Color, DashboardError> {
    status.parse().map(|status| color_for(status, theme))
}

pub fn label_for_raw(status: &str) -> Result<&'static str, DashboardError> {
    status.parse().map(label_for)
}
