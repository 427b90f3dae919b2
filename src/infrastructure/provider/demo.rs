use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use chrono::{DurationRound, TimeDelta, Utc};

use super::AppointmentProvider;
use crate::domain::{Appointment, AppointmentId, AppointmentStatus};

const SEED: [(&str, &str, i64, AppointmentStatus); 8] = [
    ("Dr. Amara Osei", "Cardiology", -26, AppointmentStatus::Completed),
    ("Dr. Lena Fischer", "Dermatology", -3, AppointmentStatus::Cancelled),
    ("Dr. Rahul Mehta", "Pediatrics", 2, AppointmentStatus::Confirmed),
    ("Dr. Sofia Ruiz", "Orthopedics", 5, AppointmentStatus::Pending),
    ("Dr. Kenji Sato", "Neurology", 20, AppointmentStatus::Pending),
    ("Dr. Amara Osei", "Cardiology", 28, AppointmentStatus::Confirmed),
    ("Dr. Grace Njeri", "Ophthalmology", 50, AppointmentStatus::Pending),
    ("Dr. Lena Fischer", "Dermatology", 74, AppointmentStatus::Confirmed),
];

/// Sample appointments scheduled around the current hour
pub fn demo_appointments() -> Vec<Appointment> {
    let now = Utc::now();
    let base = now.duration_trunc(TimeDelta::hours(1)).unwrap_or(now);
    SEED.iter()
        .enumerate()
        .map(|(idx, (doctor, specialty, offset_hours, status))| {
            Appointment::new(
                idx as u64 + 1,
                *doctor,
                *specialty,
                base + TimeDelta::hours(*offset_hours),
                *status,
            )
        })
        .collect()
}

/// In-memory provider backed by [`demo_appointments`]
#[derive(Debug)]
pub struct DemoProvider {
    appointments: Mutex<Vec<Appointment>>,
    latency: Duration,
}

impl DemoProvider {
    pub fn new() -> Self {
        Self::with_appointments(demo_appointments())
    }

    pub fn with_appointments(appointments: Vec<Appointment>) -> Self {
        Self {
            appointments: Mutex::new(appointments),
            latency: Duration::from_millis(350),
        }
    }

    /// Simulated round-trip delay before each fetch
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

impl Default for DemoProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AppointmentProvider for DemoProvider {
    async fn fetch_appointments(&self) -> Result<Vec<Appointment>> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let appointments = self
            .appointments
            .lock()
            .map_err(|_| anyhow!("demo data lock poisoned"))?;
        Ok(appointments.clone())
    }

    async fn persist_status(&self, id: AppointmentId, status: AppointmentStatus) -> Result<()> {
        let mut appointments = self
            .appointments
            .lock()
            .map_err(|_| anyhow!("demo data lock poisoned"))?;
        let Some(appointment) = appointments.iter_mut().find(|a| a.id() == id) else {
            bail!("appointment {id} not found");
        };
        appointment.set_status(status);
        Ok(())
    }

    fn source_name(&self) -> String {
        "demo".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn seed_has_unique_ids_and_every_status() {
        let appointments = demo_appointments();
        let ids: HashSet<AppointmentId> = appointments.iter().map(Appointment::id).collect();
        assert_eq!(ids.len(), SEED.len());
        for status in AppointmentStatus::ALL {
            assert!(appointments.iter().any(|a| a.status() == status));
        }
    }

    #[tokio::test]
    async fn persisted_status_is_visible_on_next_fetch() {
        let provider = DemoProvider::new().with_latency(Duration::ZERO);
        provider
            .persist_status(AppointmentId(4), AppointmentStatus::Confirmed)
            .await
            .unwrap();
        let appointments = provider.fetch_appointments().await.unwrap();
        let updated = appointments.iter().find(|a| a.id() == AppointmentId(4)).unwrap();
        assert_eq!(updated.status(), AppointmentStatus::Confirmed);

        assert!(provider
            .persist_status(AppointmentId(99), AppointmentStatus::Confirmed)
            .await
            .is_err());
    }
}
