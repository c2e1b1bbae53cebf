use anyhow::Result;
use rusqlite::Connection;

use crate::db::repository::MetaRepo;

pub const SCHEMA_VERSION: &str = "1";

pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch("
        CREATE TABLE IF NOT EXISTS prayer_log (
            date        TEXT NOT NULL,
            prayer      TEXT NOT NULL
                        CHECK(prayer IN ('fajr','dhuhr','asr','maghrib','isha')),
            completed   INTEGER NOT NULL DEFAULT 0 CHECK(completed IN (0, 1)),
            updated_at  TEXT DEFAULT (datetime('now')),
            PRIMARY KEY (date, prayer)
        );

        CREATE INDEX IF NOT EXISTS idx_prayer_log_date ON prayer_log(date);

        CREATE TABLE IF NOT EXISTS app_meta (
            key   TEXT PRIMARY KEY,
            value TEXT
        );
    ")?;

    MetaRepo::set(conn, "schema_version", SCHEMA_VERSION)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        let version = MetaRepo::get(&conn, "schema_version").unwrap();
        assert_eq!(version.as_deref(), Some(SCHEMA_VERSION));
    }

    #[test]
    fn rejects_unknown_prayer_rows() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let res = conn.execute(
            "INSERT INTO prayer_log (date, prayer, completed) VALUES ('2026-01-01', 'witr', 1)",
            [],
        );
        assert!(res.is_err());
    }
}
