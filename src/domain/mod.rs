//! Appointment domain models
//!
//! Plain data types and pure helpers, independent of the terminal
//! front-end and of any appointment source.

mod appointment;
mod error;
pub mod status;
mod theme;

pub use appointment::{Appointment, AppointmentId, AppointmentStatus, Stats};
pub use error::DashboardError;
pub use theme::{Color, Theme};
