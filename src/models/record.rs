use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::prayer::{Prayer, PRAYERS_PER_DAY};

/// Completion state of the five prayers on one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    completed: [bool; PRAYERS_PER_DAY],
}

pub type RecordMap = BTreeMap<NaiveDate, DailyRecord>;

impl DailyRecord {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            completed: [false; PRAYERS_PER_DAY],
        }
    }

    pub fn is_completed(&self, prayer: Prayer) -> bool {
        self.completed[prayer.index()]
    }

    pub fn set(&mut self, prayer: Prayer, completed: bool) {
        self.completed[prayer.index()] = completed;
    }

    /// Flips one prayer and returns the new flag.
    pub fn toggle(&mut self, prayer: Prayer) -> bool {
        let slot = &mut self.completed[prayer.index()];
        *slot = !*slot;
        *slot
    }

    pub fn completed_count(&self) -> u8 {
        self.completed.iter().filter(|c| **c).count() as u8
    }

    pub fn missed_count(&self) -> u8 {
        PRAYERS_PER_DAY as u8 - self.completed_count()
    }

    pub fn is_complete(&self) -> bool {
        self.completed.iter().all(|c| *c)
    }

    pub fn entries(&self) -> impl Iterator<Item = (Prayer, bool)> + '_ {
        Prayer::ALL.iter().map(|p| (*p, self.completed[p.index()]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    #[test]
    fn empty_record_has_five_open_prayers() {
        let r = DailyRecord::empty(day());
        assert_eq!(r.entries().count(), 5);
        assert_eq!(r.completed_count(), 0);
        assert_eq!(r.missed_count(), 5);
    }

    #[test]
    fn toggle_twice_restores_record() {
        let original = DailyRecord::empty(day());
        let mut r = original;
        assert!(r.toggle(Prayer::Asr));
        assert!(!r.toggle(Prayer::Asr));
        assert_eq!(r, original);
    }

    #[test]
    fn complete_when_all_five_set() {
        let mut r = DailyRecord::empty(day());
        for p in Prayer::ALL {
            r.set(p, true);
        }
        assert!(r.is_complete());
        assert_eq!(r.missed_count(), 0);
    }
}
