use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DashboardError;

/// Unique appointment identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppointmentId(pub u64);

impl fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for AppointmentId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Lifecycle status of an appointment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 4] = [
        AppointmentStatus::Pending,
        AppointmentStatus::Confirmed,
        AppointmentStatus::Cancelled,
        AppointmentStatus::Completed,
    ];

    /// Wire form, as used by the HTTP API and the SQLite store
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = DashboardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "pending" => Ok(AppointmentStatus::Pending),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            "completed" => Ok(AppointmentStatus::Completed),
            _ => Err(DashboardError::InvalidStatus(value.to_string())),
        }
    }
}

/// A scheduled consultation.
///
/// Only the status can change after creation, and only through the
/// dashboard view-model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    id: AppointmentId,
    doctor_name: String,
    specialty: String,
    date_time: DateTime<Utc>,
    status: AppointmentStatus,
}

impl Appointment {
    pub fn new(
        id: u64,
        doctor_name: impl Into<String>,
        specialty: impl Into<String>,
        date_time: DateTime<Utc>,
        status: AppointmentStatus,
    ) -> Self {
        Self {
            id: AppointmentId(id),
            doctor_name: doctor_name.into(),
            specialty: specialty.into(),
            date_time,
            status,
        }
    }

    pub fn id(&self) -> AppointmentId {
        self.id
    }

    pub fn doctor_name(&self) -> &str {
        &self.doctor_name
    }

    pub fn specialty(&self) -> &str {
        &self.specialty
    }

    pub fn date_time(&self) -> DateTime<Utc> {
        self.date_time
    }

    pub fn status(&self) -> AppointmentStatus {
        self.status
    }

    pub(crate) fn set_status(&mut self, status: AppointmentStatus) {
        self.status = status;
    }
}

/// Aggregate counts derived from an appointment collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub by_status: BTreeMap<AppointmentStatus, usize>,
}

impl Stats {
    /// Count every appointment; all four statuses are always present
    pub fn from_appointments(appointments: &[Appointment]) -> Self {
        let mut by_status: BTreeMap<AppointmentStatus, usize> = AppointmentStatus::ALL
            .iter()
            .map(|status| (*status, 0))
            .collect();
        for appointment in appointments {
            *by_status.entry(appointment.status()).or_insert(0) += 1;
        }
        Self {
            total: appointments.len(),
            by_status,
        }
    }

    pub fn count(&self, status: AppointmentStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::from_appointments(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn parses_status_case_insensitively() {
        assert_eq!(
            " Confirmed ".parse::<AppointmentStatus>(),
            Ok(AppointmentStatus::Confirmed)
        );
        assert_eq!(
            "archived".parse::<AppointmentStatus>(),
            Err(DashboardError::InvalidStatus("archived".to_string()))
        );
    }

    #[test]
    fn stats_include_empty_buckets() {
        let appointments = vec![
            Appointment::new(1, "Dr. Ada", "Cardiology", at(9), AppointmentStatus::Pending),
            Appointment::new(2, "Dr. Lin", "Dermatology", at(10), AppointmentStatus::Pending),
        ];
        let stats = Stats::from_appointments(&appointments);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.count(AppointmentStatus::Pending), 2);
        assert_eq!(stats.count(AppointmentStatus::Completed), 0);
        assert_eq!(stats.by_status.len(), 4);
    }

    #[test]
    fn deserializes_camel_case_json() {
        let json = r#"{
            "id": 7,
            "doctorName": "Dr. Okafor",
            "specialty": "Pediatrics",
            "dateTime": "2024-03-01T09:30:00Z",
            "status": "cancelled"
        }"#;
        let appointment: Appointment = serde_json::from_str(json).unwrap();
        assert_eq!(appointment.id(), AppointmentId(7));
        assert_eq!(appointment.doctor_name(), "Dr. Okafor");
        assert_eq!(appointment.status(), AppointmentStatus::Cancelled);
    }

    #[test]
    fn rejects_unknown_status_in_json() {
        let json = r#"{"id":1,"doctorName":"x","specialty":"y","dateTime":"2024-03-01T09:30:00Z","status":"lost"}"#;
        assert!(serde_json::from_str::<Appointment>(json).is_err());
    }
}
