use anyhow::Result;
use chrono::NaiveDate;
use std::path::Path;
use std::sync::mpsc;
use std::thread;

use crate::config::TrackerConfig;
use crate::db::{PrayerStore, SqliteStore};
use crate::tracker::Tracker;
use crate::tui::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadRequest {
    pub generation: u64,
    pub today: NaiveDate,
    pub reference: NaiveDate,
}

/// Runs snapshot loads off the UI thread on its own connection.
pub struct Loader {
    tx: mpsc::Sender<LoadRequest>,
}

impl Loader {
    pub fn spawn(db_path: &Path, config: TrackerConfig, events: mpsc::Sender<Event>) -> Result<Self> {
        let store = SqliteStore::open(db_path)?;
        Ok(Self::spawn_with(store, config, events))
    }

    pub fn spawn_with<S>(store: S, config: TrackerConfig, events: mpsc::Sender<Event>) -> Self
    where
        S: PrayerStore + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<LoadRequest>();
        let tracker = Tracker::new(store, config);

        thread::spawn(move || {
            while let Ok(mut req) = rx.recv() {
                // Only the newest queued request matters
                while let Ok(newer) = rx.try_recv() {
                    log::debug!("skipping superseded load gen {}", req.generation);
                    req = newer;
                }
                let result = tracker.load(req.generation, req.today, req.reference);
                let event = Event::Loaded {
                    generation: req.generation,
                    result,
                };
                if events.send(event).is_err() {
                    break;
                }
            }
        });

        Self { tx }
    }

    /// Queue a load; false when the loader thread is gone.
    pub fn request(&self, req: LoadRequest) -> bool {
        self.tx.send(req).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::Prayer;
    use std::time::Duration;

    #[test]
    fn answers_requests_with_matching_generation() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let store = MemoryStore::new();
        store.set_completion(today, Prayer::Fajr, true).unwrap();

        let (tx, rx) = mpsc::channel();
        let loader = Loader::spawn_with(store, TrackerConfig::default(), tx);
        assert!(loader.request(LoadRequest {
            generation: 7,
            today,
            reference: today,
        }));

        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            Event::Loaded { generation, result } => {
                assert_eq!(generation, 7);
                let snap = result.unwrap();
                assert_eq!(snap.generation, 7);
                assert_eq!(snap.today_record.completed_count(), 1);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }
}
