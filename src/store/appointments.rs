use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::domain::{Appointment, AppointmentId, AppointmentStatus};

/// Local SQLite appointment table
#[derive(Debug)]
pub struct AppointmentStore {
    conn: Connection,
}

impl AppointmentStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).with_context(|| format!("open db {}", path.display()))?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory().context("open in-memory db")?,
        };
        store.init()?;
        Ok(store)
    }

    pub fn load_all(&self) -> Result<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, doctor_name, specialty, date_time, status
             FROM appointments ORDER BY date_time, id",
        )?;
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let id: i64 = row.get(0)?;
            let doctor_name: String = row.get(1)?;
            let specialty: String = row.get(2)?;
            let date_time: String = row.get(3)?;
            let status: String = row.get(4)?;

            let date_time = DateTime::parse_from_rfc3339(&date_time)
                .with_context(|| format!("appointment {id}: bad date_time {date_time:?}"))?
                .with_timezone(&Utc);
            let status: AppointmentStatus = status
                .parse()
                .with_context(|| format!("appointment {id}: bad status"))?;
            let id = u64::try_from(id).with_context(|| format!("negative appointment id {id}"))?;

            out.push(Appointment::new(id, doctor_name, specialty, date_time, status));
        }
        Ok(out)
    }

    pub fn insert(&self, appointment: &Appointment) -> Result<()> {
        self.conn.execute(
            "INSERT INTO appointments(id, doctor_name, specialty, date_time, status)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                doctor_name=excluded.doctor_name,
                specialty=excluded.specialty,
                date_time=excluded.date_time,
                status=excluded.status",
            params![
                to_sql_id(appointment.id())?,
                appointment.doctor_name(),
                appointment.specialty(),
                appointment.date_time().to_rfc3339(),
                appointment.status().as_str(),
            ],
        )?;
        Ok(())
    }

    /// Returns false when no row has this id
    pub fn set_status(&self, id: AppointmentId, status: AppointmentStatus) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE appointments SET status = ?2 WHERE id = ?1",
            params![to_sql_id(id)?, status.as_str()],
        )?;
        Ok(changed > 0)
    }

    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM appointments", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS appointments (
                id          INTEGER PRIMARY KEY,
                doctor_name TEXT NOT NULL,
                specialty   TEXT NOT NULL,
                date_time   TEXT NOT NULL,
                status      TEXT NOT NULL
            );",
        )?;
        Ok(())
    }
}

fn to_sql_id(id: AppointmentId) -> Result<i64> {
    i64::try_from(id.0).with_context(|| format!("appointment id {} out of range", id.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(id: u64, hour: u32, status: AppointmentStatus) -> Appointment {
        Appointment::new(
            id,
            "Dr. Haddad",
            "Neurology",
            Utc.with_ymd_and_hms(2024, 6, 10, hour, 15, 0).unwrap(),
            status,
        )
    }

    #[test]
    fn insert_and_load_ordered_by_time() {
        let store = AppointmentStore::open_in_memory().unwrap();
        store.insert(&sample(2, 14, AppointmentStatus::Pending)).unwrap();
        store.insert(&sample(1, 9, AppointmentStatus::Confirmed)).unwrap();

        let loaded = store.load_all().unwrap();
        let ids: Vec<u64> = loaded.iter().map(|a| a.id().0).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(loaded[0], sample(1, 9, AppointmentStatus::Confirmed));
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn set_status_reports_missing_rows() {
        let store = AppointmentStore::open_in_memory().unwrap();
        store.insert(&sample(1, 9, AppointmentStatus::Pending)).unwrap();

        assert!(store
            .set_status(AppointmentId(1), AppointmentStatus::Completed)
            .unwrap());
        assert!(!store
            .set_status(AppointmentId(42), AppointmentStatus::Completed)
            .unwrap());
        assert_eq!(
            store.load_all().unwrap()[0].status(),
            AppointmentStatus::Completed
        );
    }

    #[test]
    fn corrupt_status_fails_the_load() {
        let store = AppointmentStore::open_in_memory().unwrap();
        store
            .conn
            .execute(
                "INSERT INTO appointments VALUES (1, 'Dr. X', 'ENT', '2024-06-10T09:00:00Z', 'lost')",
                [],
            )
            .unwrap();
        let err = store.load_all().unwrap_err();
        assert!(format!("{err:#}").contains("invalid appointment status"));
    }
}
