//! Actions the input layer hands to the app

use crate::core::view_model::ActiveTab;
use crate::domain::AppointmentStatus;

/// What a key press asks the app to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No action needed
    None,

    /// Switch the list filter
    SetTab(ActiveTab),

    /// Cycle the list filter
    NextTab,
    PrevTab,

    /// Move the list selection
    SelectNext,
    SelectPrev,

    /// Set the status of the selected appointment
    UpdateSelected(AppointmentStatus),

    /// Re-fetch appointments
    Refresh,

    /// Toggle the key help popup
    ToggleHelp,

    /// Show notification in status bar
    Notify(String, NotifyLevel),

    /// Request quit
    Quit,
}

/// Notification levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Warn,
    Error,
}
