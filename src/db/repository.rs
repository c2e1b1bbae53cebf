use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::str::FromStr;

use crate::models::{DailyRecord, Prayer, RecordMap};
use crate::utils::date::{date_key, DATE_FORMAT};

// ─── Prayer log ──────────────────────────────────────────────────────────────

pub struct RecordRepo;

impl RecordRepo {
    /// Ensure a row exists for each prayer on the given date (completed = 0).
    pub fn ensure_day(conn: &Connection, date: NaiveDate) -> rusqlite::Result<()> {
        let key = date_key(date);
        for prayer in Prayer::ALL {
            conn.execute(
                "INSERT OR IGNORE INTO prayer_log (date, prayer, completed) VALUES (?1, ?2, 0)",
                params![key, prayer.as_str()],
            )?;
        }
        Ok(())
    }

    /// Records for every date in `[start, end]` that has at least one row.
    /// Rows that fail to parse are skipped, leaving that slot incomplete.
    pub fn get_date_range(
        conn: &Connection,
        start: NaiveDate,
        end: NaiveDate,
    ) -> rusqlite::Result<RecordMap> {
        let mut stmt = conn.prepare(
            "SELECT date, prayer, completed FROM prayer_log
             WHERE date >= ?1 AND date <= ?2
             ORDER BY date",
        )?;

        let rows = stmt.query_map(params![date_key(start), date_key(end)], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })?;

        let mut records = RecordMap::new();
        for r in rows {
            let (date_str, prayer_str, completed) = r?;
            let date = match NaiveDate::parse_from_str(&date_str, DATE_FORMAT) {
                Ok(d) => d,
                Err(e) => {
                    log::warn!("skipping row with malformed date '{}': {}", date_str, e);
                    continue;
                }
            };
            let record = records.entry(date).or_insert_with(|| DailyRecord::empty(date));
            match Prayer::from_str(&prayer_str) {
                Ok(prayer) => record.set(prayer, completed != 0),
                Err(e) => log::warn!("skipping row for {}: {}", date_str, e),
            }
        }
        Ok(records)
    }

    pub fn set_completion(
        conn: &Connection,
        date: NaiveDate,
        prayer: Prayer,
        completed: bool,
    ) -> rusqlite::Result<()> {
        conn.execute(
            "INSERT INTO prayer_log (date, prayer, completed) VALUES (?1, ?2, ?3)
             ON CONFLICT(date, prayer) DO UPDATE SET completed = ?3, updated_at = datetime('now')",
            params![date_key(date), prayer.as_str(), completed as i32],
        )?;
        Ok(())
    }

    /// Flip one flag in a single statement and return the stored value.
    pub fn toggle(conn: &Connection, date: NaiveDate, prayer: Prayer) -> rusqlite::Result<bool> {
        conn.query_row(
            "INSERT INTO prayer_log (date, prayer, completed) VALUES (?1, ?2, 1)
             ON CONFLICT(date, prayer) DO UPDATE
                SET completed = 1 - completed, updated_at = datetime('now')
             RETURNING completed",
            params![date_key(date), prayer.as_str()],
            |row| row.get::<_, i64>(0),
        )
        .map(|v| v != 0)
    }

    pub fn first_date(conn: &Connection) -> rusqlite::Result<Option<NaiveDate>> {
        let min: Option<String> =
            conn.query_row("SELECT MIN(date) FROM prayer_log", [], |row| row.get(0))?;
        Ok(min.and_then(|s| match NaiveDate::parse_from_str(&s, DATE_FORMAT) {
            Ok(d) => Some(d),
            Err(e) => {
                log::warn!("ignoring malformed first date '{}': {}", s, e);
                None
            }
        }))
    }
}

// ─── App meta ────────────────────────────────────────────────────────────────

pub struct MetaRepo;

impl MetaRepo {
    pub fn get(conn: &Connection, key: &str) -> Result<Option<String>> {
        conn.query_row(
            "SELECT value FROM app_meta WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(anyhow::Error::from)
    }

    pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
        conn.execute(
            "INSERT INTO app_meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, day).unwrap()
    }

    #[test]
    fn ensure_day_creates_five_open_rows() {
        let conn = conn();
        RecordRepo::ensure_day(&conn, d(1)).unwrap();
        RecordRepo::ensure_day(&conn, d(1)).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM prayer_log WHERE date = '2026-05-01'", [], |r| {
                r.get(0)
            })
            .unwrap();
        assert_eq!(count, 5);
        let records = RecordRepo::get_date_range(&conn, d(1), d(1)).unwrap();
        assert_eq!(records[&d(1)].completed_count(), 0);
    }

    #[test]
    fn range_is_inclusive_and_skips_untracked_days() {
        let conn = conn();
        RecordRepo::set_completion(&conn, d(1), Prayer::Fajr, true).unwrap();
        RecordRepo::set_completion(&conn, d(3), Prayer::Isha, true).unwrap();
        RecordRepo::set_completion(&conn, d(4), Prayer::Asr, true).unwrap();

        let records = RecordRepo::get_date_range(&conn, d(1), d(3)).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[&d(1)].is_completed(Prayer::Fajr));
        assert!(records[&d(3)].is_completed(Prayer::Isha));
        assert!(!records.contains_key(&d(2)));
    }

    #[test]
    fn toggle_flips_and_returns_new_value() {
        let conn = conn();
        assert!(RecordRepo::toggle(&conn, d(2), Prayer::Maghrib).unwrap());
        assert!(!RecordRepo::toggle(&conn, d(2), Prayer::Maghrib).unwrap());
        let records = RecordRepo::get_date_range(&conn, d(2), d(2)).unwrap();
        assert!(!records[&d(2)].is_completed(Prayer::Maghrib));
    }

    #[test]
    fn malformed_dates_are_skipped() {
        let conn = conn();
        conn.execute(
            "INSERT INTO prayer_log (date, prayer, completed) VALUES ('2026-05-1x', 'fajr', 1)",
            [],
        )
        .unwrap();
        RecordRepo::set_completion(&conn, d(5), Prayer::Fajr, true).unwrap();
        let records = RecordRepo::get_date_range(&conn, d(1), d(31)).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records.contains_key(&d(5)));
    }

    #[test]
    fn first_date_is_earliest_row() {
        let conn = conn();
        assert_eq!(RecordRepo::first_date(&conn).unwrap(), None);
        RecordRepo::ensure_day(&conn, d(9)).unwrap();
        RecordRepo::ensure_day(&conn, d(3)).unwrap();
        assert_eq!(RecordRepo::first_date(&conn).unwrap(), Some(d(3)));
    }

    #[test]
    fn meta_round_trip() {
        let conn = conn();
        MetaRepo::set(&conn, "k", "v1").unwrap();
        MetaRepo::set(&conn, "k", "v2").unwrap();
        assert_eq!(MetaRepo::get(&conn, "k").unwrap().as_deref(), Some("v2"));
        assert_eq!(MetaRepo::get(&conn, "missing").unwrap(), None);
    }
}
