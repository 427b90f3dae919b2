use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Context, Result};

use super::{demo_appointments, AppointmentProvider};
use crate::domain::{Appointment, AppointmentId, AppointmentStatus};
use crate::store::AppointmentStore;

/// Provider reading from a local [`AppointmentStore`]
#[derive(Debug, Clone)]
pub struct SqliteProvider {
    store: Arc<Mutex<AppointmentStore>>,
    name: String,
}

impl SqliteProvider {
    /// Open the database, inserting the demo appointments when `seed` is
    /// set and the table is empty
    pub fn open(path: &Path, seed: bool) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        let store = AppointmentStore::open(path)?;
        Self::from_store(store, path.display().to_string(), seed)
    }

    pub fn from_store(store: AppointmentStore, name: String, seed: bool) -> Result<Self> {
        if seed && store.count()? == 0 {
            for appointment in demo_appointments() {
                store.insert(&appointment)?;
            }
            tracing::info!(db = %name, "seeded empty appointment table");
        }
        Ok(Self {
            store: Arc::new(Mutex::new(store)),
            name,
        })
    }

    async fn with_store<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&AppointmentStore) -> Result<T> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || {
            let store = store.lock().map_err(|_| anyhow!("store lock poisoned"))?;
            f(&store)
        })
        .await
        .context("store task panicked")?
    }
}

#[async_trait::async_trait]
impl AppointmentProvider for SqliteProvider {
    async fn fetch_appointments(&self) -> Result<Vec<Appointment>> {
        self.with_store(|store| store.load_all()).await
    }

    async fn persist_status(&self, id: AppointmentId, status: AppointmentStatus) -> Result<()> {
        let found = self
            .with_store(move |store| store.set_status(id, status))
            .await?;
        if !found {
            bail!("appointment {id} not found in {}", self.name);
        }
        Ok(())
    }

    fn source_name(&self) -> String {
        self.name.clone()
    }
}
