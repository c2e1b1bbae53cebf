use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::StoreError;

/// Number of daily prayers tracked per date.
pub const PRAYERS_PER_DAY: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Prayer {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl Prayer {
    pub const ALL: [Prayer; PRAYERS_PER_DAY] = [
        Prayer::Fajr,
        Prayer::Dhuhr,
        Prayer::Asr,
        Prayer::Maghrib,
        Prayer::Isha,
    ];

    /// Position in the day, used as the slot inside a `DailyRecord`.
    pub fn index(self) -> usize {
        match self {
            Prayer::Fajr => 0,
            Prayer::Dhuhr => 1,
            Prayer::Asr => 2,
            Prayer::Maghrib => 3,
            Prayer::Isha => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Prayer::Fajr => "fajr",
            Prayer::Dhuhr => "dhuhr",
            Prayer::Asr => "asr",
            Prayer::Maghrib => "maghrib",
            Prayer::Isha => "isha",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Prayer::Fajr => "Fajr",
            Prayer::Dhuhr => "Dhuhr",
            Prayer::Asr => "Asr",
            Prayer::Maghrib => "Maghrib",
            Prayer::Isha => "Isha",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            Prayer::Fajr => "Dawn Prayer",
            Prayer::Dhuhr => "Noon Prayer",
            Prayer::Asr => "Afternoon Prayer",
            Prayer::Maghrib => "Sunset Prayer",
            Prayer::Isha => "Night Prayer",
        }
    }

    /// Static time shown next to the prayer when the config has no override.
    pub fn default_time(self) -> &'static str {
        match self {
            Prayer::Fajr => "05:30",
            Prayer::Dhuhr => "12:30",
            Prayer::Asr => "15:45",
            Prayer::Maghrib => "18:15",
            Prayer::Isha => "19:45",
        }
    }
}

impl std::fmt::Display for Prayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Prayer {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fajr" | "fajar" => Ok(Prayer::Fajr),
            "dhuhr" | "zuhr" | "zohr" | "duhr" | "dhuhur" => Ok(Prayer::Dhuhr),
            "asr" => Ok(Prayer::Asr),
            "maghrib" | "magrib" => Ok(Prayer::Maghrib),
            "isha" | "isya" => Ok(Prayer::Isha),
            _ => Err(StoreError::InvalidPrayer(s.to_string())),
        }
    }
}
