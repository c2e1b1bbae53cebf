use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::Connection;
use std::path::Path;
#[cfg(test)]
use std::sync::Mutex;

use crate::db::migrations::run_migrations;
use crate::db::repository::RecordRepo;
use crate::error::StoreError;
#[cfg(test)]
use crate::models::DailyRecord;
use crate::models::{Prayer, RecordMap};

/// Source and sink of per-day prayer records.
///
/// Dates without data are simply absent from `get_records`; callers treat
/// them as empty records.
pub trait PrayerStore {
    fn get_records(&self, start: NaiveDate, end: NaiveDate) -> Result<RecordMap, StoreError>;

    fn set_completion(
        &self,
        date: NaiveDate,
        prayer: Prayer,
        completed: bool,
    ) -> Result<(), StoreError>;

    /// Flip one prayer on one date; returns the stored value afterwards.
    fn toggle(&self, date: NaiveDate, prayer: Prayer) -> Result<bool, StoreError>;

    /// Create the five-prayer record for a date if it does not exist yet.
    fn ensure_day(&self, date: NaiveDate) -> Result<(), StoreError>;

    fn first_tracked_date(&self) -> Result<Option<NaiveDate>, StoreError>;
}

fn check_range(start: NaiveDate, end: NaiveDate) -> Result<(), StoreError> {
    if start > end {
        return Err(StoreError::InvalidDate(format!(
            "range start {} is after end {}",
            start, end
        )));
    }
    Ok(())
}

// ─── SQLite ──────────────────────────────────────────────────────────────────

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn =
            Connection::open(path).with_context(|| format!("Opening database at {:?}", path))?;

        // Loader thread reads while the UI writes
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.busy_timeout(std::time::Duration::from_secs(2))?;

        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    pub fn from_connection(conn: Connection) -> Result<Self> {
        run_migrations(&conn).context("Running migrations")?;
        Ok(Self { conn })
    }
}

impl PrayerStore for SqliteStore {
    fn get_records(&self, start: NaiveDate, end: NaiveDate) -> Result<RecordMap, StoreError> {
        check_range(start, end)?;
        let records =
            RecordRepo::get_date_range(&self.conn, start, end).map_err(StoreError::Load)?;
        log::debug!("loaded {} records for {}..={}", records.len(), start, end);
        Ok(records)
    }

    fn set_completion(
        &self,
        date: NaiveDate,
        prayer: Prayer,
        completed: bool,
    ) -> Result<(), StoreError> {
        let tx = self.conn.unchecked_transaction().map_err(StoreError::Write)?;
        RecordRepo::ensure_day(&tx, date).map_err(StoreError::Write)?;
        RecordRepo::set_completion(&tx, date, prayer, completed).map_err(StoreError::Write)?;
        tx.commit().map_err(StoreError::Write)?;
        log::debug!("set {} on {} to {}", prayer, date, completed);
        Ok(())
    }

    fn toggle(&self, date: NaiveDate, prayer: Prayer) -> Result<bool, StoreError> {
        let tx = self.conn.unchecked_transaction().map_err(StoreError::Write)?;
        RecordRepo::ensure_day(&tx, date).map_err(StoreError::Write)?;
        let now = RecordRepo::toggle(&tx, date, prayer).map_err(StoreError::Write)?;
        tx.commit().map_err(StoreError::Write)?;
        log::debug!("toggled {} on {} -> {}", prayer, date, now);
        Ok(now)
    }

    fn ensure_day(&self, date: NaiveDate) -> Result<(), StoreError> {
        RecordRepo::ensure_day(&self.conn, date).map_err(StoreError::Write)
    }

    fn first_tracked_date(&self) -> Result<Option<NaiveDate>, StoreError> {
        RecordRepo::first_date(&self.conn).map_err(StoreError::Load)
    }
}

// ─── In-memory ───────────────────────────────────────────────────────────────

/// Store kept entirely in memory; a mutex serialises every read-modify-write.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<RecordMap>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = DailyRecord>) -> Self {
        let map = records.into_iter().map(|r| (r.date, r)).collect();
        Self {
            records: Mutex::new(map),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RecordMap> {
        // A poisoned map is still a consistent map: every write is a single flag
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
impl PrayerStore for MemoryStore {
    fn get_records(&self, start: NaiveDate, end: NaiveDate) -> Result<RecordMap, StoreError> {
        check_range(start, end)?;
        Ok(self
            .lock()
            .range(start..=end)
            .map(|(d, r)| (*d, *r))
            .collect())
    }

    fn set_completion(
        &self,
        date: NaiveDate,
        prayer: Prayer,
        completed: bool,
    ) -> Result<(), StoreError> {
        self.lock()
            .entry(date)
            .or_insert_with(|| DailyRecord::empty(date))
            .set(prayer, completed);
        Ok(())
    }

    fn toggle(&self, date: NaiveDate, prayer: Prayer) -> Result<bool, StoreError> {
        Ok(self
            .lock()
            .entry(date)
            .or_insert_with(|| DailyRecord::empty(date))
            .toggle(prayer))
    }

    fn ensure_day(&self, date: NaiveDate) -> Result<(), StoreError> {
        self.lock()
            .entry(date)
            .or_insert_with(|| DailyRecord::empty(date));
        Ok(())
    }

    fn first_tracked_date(&self) -> Result<Option<NaiveDate>, StoreError> {
        Ok(self.lock().keys().next().copied())
    }
}
