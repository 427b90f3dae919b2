use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;

use super::AppointmentProvider;
use crate::domain::{Appointment, AppointmentId, AppointmentStatus};

/// JSON REST provider.
///
/// `GET {base}/appointments` returns the collection,
/// `PATCH {base}/appointments/{id}` accepts `{"status": "..."}`.
#[derive(Debug, Clone)]
pub struct HttpProvider {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct StatusPatch {
    status: AppointmentStatus,
}

impl HttpProvider {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url),
        })
    }

    fn appointments_url(&self) -> String {
        format!("{}/appointments", self.base_url)
    }

    fn appointment_url(&self, id: AppointmentId) -> String {
        format!("{}/appointments/{}", self.base_url, id.0)
    }
}

#[async_trait::async_trait]
impl AppointmentProvider for HttpProvider {
    async fn fetch_appointments(&self) -> Result<Vec<Appointment>> {
        let url = self.appointments_url();
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?
            .error_for_status()
            .with_context(|| format!("GET {url}"))?;
        response
            .json::<Vec<Appointment>>()
            .await
            .context("Invalid appointments payload")
    }

    async fn persist_status(&self, id: AppointmentId, status: AppointmentStatus) -> Result<()> {
        let url = self.appointment_url(id);
        self.http
            .patch(&url)
            .json(&StatusPatch { status })
            .send()
            .await
            .with_context(|| format!("PATCH {url}"))?
            .error_for_status()
            .with_context(|| format!("PATCH {url}"))?;
        Ok(())
    }

    fn source_name(&self) -> String {
        self.base_url.clone()
    }
}

fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}
