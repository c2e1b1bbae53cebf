use chrono::NaiveDate;

use crate::config::TrackerConfig;
use crate::db::PrayerStore;
use crate::engine;
use crate::error::StoreError;
use crate::models::{
    DailyRecord, MonthWindow, MonthlyTotals, Prayer, RecordMap, Streak, WeekWindow, WeeklyTotals,
};

/// Hands out load generations and tells stale results from fresh ones.
///
/// Every navigation or write starts a new generation; a snapshot whose
/// generation is not the latest was superseded while it was loading.
#[derive(Debug, Default)]
pub struct LoadGate {
    latest: u64,
}

impl LoadGate {
    pub fn begin(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn latest(&self) -> u64 {
        self.latest
    }

    pub fn accept(&self, snapshot: &Snapshot) -> bool {
        if snapshot.generation != self.latest {
            log::debug!(
                "discarding stale snapshot gen {} (latest {})",
                snapshot.generation,
                self.latest
            );
            return false;
        }
        true
    }
}

/// Everything a view needs, derived from one read of the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub generation: u64,
    pub today: NaiveDate,
    pub reference: NaiveDate,
    pub config: TrackerConfig,
    pub first_tracked: Option<NaiveDate>,
    pub records: RecordMap,

    pub today_record: DailyRecord,
    pub week: WeekWindow,
    pub weekly: WeeklyTotals,
    pub month: MonthWindow,
    pub monthly: MonthlyTotals,
    pub streak: Streak,
    pub qaza: u32,
}

/// A local flip applied before the store confirmed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingToggle {
    pub date: NaiveDate,
    pub prayer: Prayer,
    pub completed: bool,
    had_record: bool,
    first_tracked: Option<NaiveDate>,
}

impl Snapshot {
    pub fn build(
        generation: u64,
        today: NaiveDate,
        reference: NaiveDate,
        config: TrackerConfig,
        first_tracked: Option<NaiveDate>,
        records: RecordMap,
    ) -> Self {
        let mut snapshot = Self {
            generation,
            today,
            reference,
            config,
            first_tracked,
            records,
            today_record: DailyRecord::empty(today),
            week: WeekWindow {
                start: reference,
                cells: Vec::new(),
            },
            weekly: WeeklyTotals::default(),
            month: MonthWindow {
                year: 0,
                month: 0,
                cells: Vec::new(),
            },
            monthly: MonthlyTotals::default(),
            streak: Streak::default(),
            qaza: 0,
        };
        snapshot.recompute();
        snapshot
    }

    fn recompute(&mut self) {
        let first_day = self.config.week_start.weekday();
        self.today_record = self
            .records
            .get(&self.today)
            .copied()
            .unwrap_or_else(|| DailyRecord::empty(self.today));
        self.week = engine::week_window(self.reference, self.today, first_day, &self.records);
        self.weekly = engine::weekly_totals(&self.week);
        self.month = engine::month_window(self.reference, self.today, first_day, &self.records);
        self.monthly = engine::monthly_totals(&self.month);
        self.streak = engine::streak(self.today, &self.records, self.config.streak);
        self.qaza = engine::qaza_count(
            &self.records,
            self.today,
            self.first_tracked,
            self.config.qaza_window,
        );
    }

    /// Flip one prayer locally and recompute every aggregate.
    pub fn apply_speculative(&mut self, date: NaiveDate, prayer: Prayer) -> PendingToggle {
        let had_record = self.records.contains_key(&date);
        let first_tracked = self.first_tracked;
        let completed = self
            .records
            .entry(date)
            .or_insert_with(|| DailyRecord::empty(date))
            .toggle(prayer);
        self.first_tracked = Some(first_tracked.map_or(date, |f| f.min(date)));
        self.recompute();
        PendingToggle {
            date,
            prayer,
            completed,
            had_record,
            first_tracked,
        }
    }

    /// Undo a speculative flip the store refused.
    pub fn rollback(&mut self, pending: PendingToggle) {
        if pending.had_record {
            if let Some(record) = self.records.get_mut(&pending.date) {
                record.set(pending.prayer, !pending.completed);
            }
        } else {
            self.records.remove(&pending.date);
        }
        self.first_tracked = pending.first_tracked;
        self.recompute();
    }
}

/// Reads records from an injected store and turns them into snapshots.
pub struct Tracker<S: PrayerStore> {
    store: S,
    config: TrackerConfig,
}

impl<S: PrayerStore> Tracker<S> {
    pub fn new(store: S, config: TrackerConfig) -> Self {
        Self { store, config }
    }

    /// Today's record is created on first load so it always has five rows.
    pub fn ensure_today(&self, today: NaiveDate) -> Result<(), StoreError> {
        self.store.ensure_day(today)
    }

    /// Dates a snapshot for `reference` must read: from the start of tracked
    /// history (or the grid, if earlier) through the later of grid end and today.
    pub fn load_range(
        &self,
        today: NaiveDate,
        reference: NaiveDate,
        first_tracked: Option<NaiveDate>,
    ) -> (NaiveDate, NaiveDate) {
        let (grid_start, grid_end) =
            engine::month_grid_range(reference, self.config.week_start.weekday());
        let start = first_tracked.map_or(grid_start, |f| f.min(grid_start)).min(today);
        (start, grid_end.max(today))
    }

    pub fn load(
        &self,
        generation: u64,
        today: NaiveDate,
        reference: NaiveDate,
    ) -> Result<Snapshot, StoreError> {
        let first_tracked = self.store.first_tracked_date()?;
        let (start, end) = self.load_range(today, reference, first_tracked);
        let records = self.store.get_records(start, end)?;
        Ok(Snapshot::build(
            generation,
            today,
            reference,
            self.config,
            first_tracked,
            records,
        ))
    }

    pub fn toggle(&self, date: NaiveDate, prayer: Prayer) -> Result<bool, StoreError> {
        self.store.toggle(date, prayer)
    }

    pub fn set_completion(
        &self,
        date: NaiveDate,
        prayer: Prayer,
        completed: bool,
    ) -> Result<(), StoreError> {
        self.store.set_completion(date, prayer, completed)
    }

    /// Persist a speculative flip by writing the speculated value, so
    /// committing the same toggle twice leaves the store unchanged.
    pub fn commit_toggle(&self, pending: &PendingToggle) -> Result<(), StoreError> {
        self.store
            .set_completion(pending.date, pending.prayer, pending.completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{QazaWindow, StreakPolicy, WeekStart};
    use crate::db::MemoryStore;
    use chrono::Duration;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn full(date: NaiveDate) -> DailyRecord {
        let mut r = DailyRecord::empty(date);
        for p in Prayer::ALL {
            r.set(p, true);
        }
        r
    }

    /// Store whose writes always fail, for exercising rollback.
    struct ReadOnlyStore(MemoryStore);

    impl PrayerStore for ReadOnlyStore {
        fn get_records(&self, start: NaiveDate, end: NaiveDate) -> Result<RecordMap, StoreError> {
            self.0.get_records(start, end)
        }
        fn set_completion(&self, _: NaiveDate, _: Prayer, _: bool) -> Result<(), StoreError> {
            Err(StoreError::Write(rusqlite::Error::QueryReturnedNoRows))
        }
        fn toggle(&self, _: NaiveDate, _: Prayer) -> Result<bool, StoreError> {
            Err(StoreError::Write(rusqlite::Error::QueryReturnedNoRows))
        }
        fn ensure_day(&self, date: NaiveDate) -> Result<(), StoreError> {
            self.0.ensure_day(date)
        }
        fn first_tracked_date(&self) -> Result<Option<NaiveDate>, StoreError> {
            self.0.first_tracked_date()
        }
    }

    struct BrokenStore;

    impl PrayerStore for BrokenStore {
        fn get_records(&self, _: NaiveDate, _: NaiveDate) -> Result<RecordMap, StoreError> {
            Err(StoreError::Load(rusqlite::Error::QueryReturnedNoRows))
        }
        fn set_completion(&self, _: NaiveDate, _: Prayer, _: bool) -> Result<(), StoreError> {
            Ok(())
        }
        fn toggle(&self, _: NaiveDate, _: Prayer) -> Result<bool, StoreError> {
            Ok(true)
        }
        fn ensure_day(&self, _: NaiveDate) -> Result<(), StoreError> {
            Ok(())
        }
        fn first_tracked_date(&self) -> Result<Option<NaiveDate>, StoreError> {
            Ok(None)
        }
    }

    fn config() -> TrackerConfig {
        TrackerConfig {
            week_start: WeekStart::Sunday,
            streak: StreakPolicy::Grace,
            qaza_window: QazaWindow::Lifetime,
        }
    }

    #[test]
    fn load_derives_all_aggregates() {
        let today = d(2026, 10, 16);
        let store = MemoryStore::with_records([
            full(today - Duration::days(3)),
            full(today - Duration::days(2)),
            full(today - Duration::days(1)),
        ]);
        let tracker = Tracker::new(store, config());
        tracker.ensure_today(today).unwrap();

        let snap = tracker.load(1, today, today).unwrap();
        assert_eq!(snap.today_record.completed_count(), 0);
        assert_eq!(snap.streak.current, 3);
        assert_eq!(snap.qaza, 0);
        // Sun 11 Oct .. Sat 17 Oct: the 13th, 14th and 15th are full
        assert_eq!(snap.weekly.completed, 15);
        assert_eq!(snap.weekly.percentage, 43);
        assert_eq!(snap.weekly.full_days, 3);
        assert_eq!(snap.month.cells.len(), 42);
        assert_eq!(snap.monthly.possible, 31 * 5);
    }

    #[test]
    fn load_reads_history_before_the_grid() {
        let today = d(2026, 10, 16);
        let store = MemoryStore::with_records([full(d(2026, 8, 1))]);
        let tracker = Tracker::new(store, config());
        let snap = tracker.load(1, today, today).unwrap();
        assert!(snap.records.contains_key(&d(2026, 8, 1)));
        // Aug 2 through Oct 15 are untracked and count as missed
        let days = (d(2026, 10, 15) - d(2026, 8, 2)).num_days() as u32 + 1;
        assert_eq!(snap.qaza, days * 5);
        assert_eq!(snap.streak.best, 1);
    }

    #[test]
    fn stale_snapshots_are_rejected() {
        let today = d(2026, 10, 16);
        let tracker = Tracker::new(MemoryStore::new(), config());
        let mut gate = LoadGate::default();

        let week_gen = gate.begin();
        let month_gen = gate.begin();
        let stale = tracker.load(week_gen, today, today).unwrap();
        let fresh = tracker.load(month_gen, today, today).unwrap();
        assert!(!gate.accept(&stale));
        assert!(gate.accept(&fresh));
        assert_eq!(gate.latest(), month_gen);
    }

    #[test]
    fn speculative_toggle_rolls_back_exactly() {
        let today = d(2026, 10, 16);
        let tracker = Tracker::new(ReadOnlyStore(MemoryStore::new()), config());
        let original = tracker.load(1, today, today).unwrap();

        let mut snap = original.clone();
        let pending = snap.apply_speculative(today, Prayer::Fajr);
        assert!(pending.completed);
        assert_eq!(snap.today_record.completed_count(), 1);
        assert_eq!(snap.weekly.completed, 1);

        let err = tracker.commit_toggle(&pending).unwrap_err();
        assert!(err.is_retryable());
        snap.rollback(pending);
        assert_eq!(snap, original);
    }

    #[test]
    fn committed_toggle_matches_reload() {
        let today = d(2026, 10, 16);
        let tracker = Tracker::new(MemoryStore::new(), config());
        tracker.ensure_today(today).unwrap();
        let mut snap = tracker.load(1, today, today).unwrap();
        for p in Prayer::ALL {
            let pending = snap.apply_speculative(today, p);
            tracker.commit_toggle(&pending).unwrap();
        }
        assert_eq!(snap.streak.current, 1);
        let reloaded = tracker.load(1, today, today).unwrap();
        assert_eq!(reloaded, snap);
    }

    #[test]
    fn load_errors_surface() {
        let tracker = Tracker::new(BrokenStore, config());
        let today = d(2026, 10, 16);
        assert!(matches!(tracker.load(1, today, today), Err(StoreError::Load(_))));
    }

    #[test]
    fn toggle_twice_restores_store() {
        let today = d(2026, 10, 16);
        let tracker = Tracker::new(MemoryStore::new(), config());
        tracker.ensure_today(today).unwrap();
        let before = tracker.load(1, today, today).unwrap();
        assert!(tracker.toggle(today, Prayer::Isha).unwrap());
        assert!(!tracker.toggle(today, Prayer::Isha).unwrap());
        assert_eq!(tracker.load(1, today, today).unwrap(), before);
    }
}
