//! Appointment provider abstraction and implementations

use std::path::PathBuf;

use anyhow::Result;

use crate::core::DashboardViewModel;
use crate::domain::{Appointment, AppointmentId, AppointmentStatus};

mod demo;
mod http;
mod sqlite;

pub use demo::{demo_appointments, DemoProvider};
pub use http::HttpProvider;
pub use sqlite::SqliteProvider;

/// Provider configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderConfig {
    /// Built-in sample data
    Demo,
    /// REST API base URL
    Http(String),
    /// Local SQLite database, optionally seeded with demo data when empty
    Sqlite { path: PathBuf, seed: bool },
}

impl ProviderConfig {
    /// Get display name for this source
    pub fn display(&self) -> String {
        match self {
            ProviderConfig::Demo => "demo".to_string(),
            ProviderConfig::Http(url) => url.clone(),
            ProviderConfig::Sqlite { path, .. } => path.display().to_string(),
        }
    }
}

/// Source of appointment data
#[async_trait::async_trait]
pub trait AppointmentProvider: Send + Sync + 'static {
    /// Load the full appointment collection
    async fn fetch_appointments(&self) -> Result<Vec<Appointment>>;

    /// Store a status change made on the dashboard
    async fn persist_status(&self, id: AppointmentId, status: AppointmentStatus) -> Result<()>;

    /// Get source display name
    fn source_name(&self) -> String;
}

/// Create a provider from configuration
pub fn create_provider(config: ProviderConfig) -> Result<Box<dyn AppointmentProvider>> {
    match config {
        ProviderConfig::Demo => Ok(Box::new(DemoProvider::new())),
        ProviderConfig::Http(url) => Ok(Box::new(HttpProvider::new(&url)?)),
        ProviderConfig::Sqlite { path, seed } => Ok(Box::new(SqliteProvider::open(&path, seed)?)),
    }
}

/// Run the initial fetch against `provider` and apply it in place.
///
/// Returns false when the view-model had already started a fetch.
pub async fn load_into(view_model: &mut DashboardViewModel, provider: &dyn AppointmentProvider) -> bool {
    let Some(ticket) = view_model.initialize() else {
        return false;
    };
    let result = provider.fetch_appointments().await;
    view_model.apply_fetch(ticket, result.map_err(|err| format!("{err:#}")))
}
