use anyhow::{Context, Result};
use chrono::Weekday;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::models::Prayer;

/// Overrides the database location (handy for scratch databases).
pub const DB_PATH_ENV: &str = "NAMAZ_DB";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    pub fn weekday(self) -> Weekday {
        match self {
            WeekStart::Sunday => Weekday::Sun,
            WeekStart::Monday => Weekday::Mon,
        }
    }
}

/// How an unfinished today affects the current streak.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakPolicy {
    /// Today only counts once all five are done; it never breaks the streak.
    #[default]
    Grace,
    /// Today is part of the walk, so an unfinished today means 0.
    Strict,
}

/// Span of history the qaza counter looks at. Always ends yesterday.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QazaWindow {
    /// Everything since the first tracked date.
    #[default]
    Lifetime,
    /// Only the last N days before today.
    TrailingDays(u32),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub week_start: WeekStart,
    #[serde(default)]
    pub streak: StreakPolicy,
    #[serde(default)]
    pub qaza_window: QazaWindow,
}

/// Static "HH:MM" labels; missing entries use the built-in times.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayTimes {
    pub fajr: Option<String>,
    pub dhuhr: Option<String>,
    pub asr: Option<String>,
    pub maghrib: Option<String>,
    pub isha: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub times: DisplayTimes,
}

impl DisplayConfig {
    pub fn time_for(&self, prayer: Prayer) -> &str {
        let custom = match prayer {
            Prayer::Fajr => &self.times.fajr,
            Prayer::Dhuhr => &self.times.dhuhr,
            Prayer::Asr => &self.times.asr,
            Prayer::Maghrib => &self.times.maghrib,
            Prayer::Isha => &self.times.isha,
        };
        custom.as_deref().unwrap_or_else(|| prayer.default_time())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "namaz").context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn db_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(DB_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }
        Ok(Self::data_dir()?.join("namaz.db"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            log::debug!("no config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(&path).with_context(|| format!("Reading {:?}", path))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Parsing config.toml")
    }

    pub fn ensure_db_dir() -> Result<PathBuf> {
        let path = Self::db_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Creating data directory {:?}", parent))?;
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config.tracker.week_start, WeekStart::Sunday);
        assert_eq!(config.tracker.streak, StreakPolicy::Grace);
        assert_eq!(config.tracker.qaza_window, QazaWindow::Lifetime);
        assert_eq!(config.display.time_for(Prayer::Fajr), "05:30");
    }

    #[test]
    fn parses_tracker_and_display_sections() {
        let config = AppConfig::parse(
            r#"
            [tracker]
            week_start = "monday"
            streak = "strict"
            qaza_window = { trailing_days = 30 }

            [display.times]
            isha = "20:10"
            "#,
        )
        .unwrap();
        assert_eq!(config.tracker.week_start.weekday(), Weekday::Mon);
        assert_eq!(config.tracker.streak, StreakPolicy::Strict);
        assert_eq!(config.tracker.qaza_window, QazaWindow::TrailingDays(30));
        assert_eq!(config.display.time_for(Prayer::Isha), "20:10");
        assert_eq!(config.display.time_for(Prayer::Asr), "15:45");
    }

    #[test]
    fn rejects_unknown_week_start() {
        assert!(AppConfig::parse("[tracker]\nweek_start = \"friday\"\n").is_err());
    }
}
