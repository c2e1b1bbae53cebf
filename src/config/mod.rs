pub mod settings;

pub use settings::{AppConfig, DisplayConfig, QazaWindow, StreakPolicy, TrackerConfig, WeekStart};
