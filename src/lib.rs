//! Clinic appointment dashboard
//!
//! [`core::DashboardViewModel`] holds the dashboard state and is driven by
//! the terminal front-end in `main.rs`; [`domain::status`] maps statuses to
//! colors and labels; [`infrastructure`] loads appointments off the UI
//! thread.

pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod logging;
pub mod store;
pub mod ui;
