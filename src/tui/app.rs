use anyhow::Result;
use chrono::{Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    DefaultTerminal, Frame,
};
use std::path::Path;
use std::sync::mpsc;

use crate::config::AppConfig;
use crate::db::SqliteStore;
use crate::engine;
use crate::error::StoreError;
use crate::models::{Prayer, PRAYERS_PER_DAY};
use crate::tracker::{LoadGate, Snapshot, Tracker};
use crate::tui::events::{Event, EventHandler};
use crate::tui::loader::{LoadRequest, Loader};
use crate::tui::theme;
use crate::tui::widgets::{calendar, header, overview, prayers, progress, quick_stats, statusbar};
use crate::utils::format::{band_icon, Band};

const TICK_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Calendar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarMode {
    Month,
    Week,
}

pub struct App {
    pub view: View,
    pub mode: CalendarMode,
    pub config: AppConfig,
    pub focus_idx: usize,
    pub show_help: bool,
    pub should_quit: bool,
    pub status: Option<String>,

    pub today: NaiveDate,
    /// Date the calendar is centred on; the dashboard always uses today.
    pub reference: NaiveDate,
    pub snapshot: Option<Snapshot>,
    pub loading: bool,

    tracker: Tracker<SqliteStore>,
    loader: Loader,
    gate: LoadGate,
}

impl App {
    pub fn new(
        config: AppConfig,
        db_path: &Path,
        events: mpsc::Sender<Event>,
        today: NaiveDate,
    ) -> Result<Self> {
        let tracker = Tracker::new(SqliteStore::open(db_path)?, config.tracker);
        tracker.ensure_today(today)?;
        let loader = Loader::spawn(db_path, config.tracker, events)?;

        let mut app = App {
            view: View::Dashboard,
            mode: CalendarMode::Month,
            config,
            focus_idx: 0,
            show_help: false,
            should_quit: false,
            status: None,
            today,
            reference: today,
            snapshot: None,
            loading: false,
            tracker,
            loader,
            gate: LoadGate::default(),
        };
        app.request_load();
        Ok(app)
    }

    // ─── Loading ─────────────────────────────────────────────────────────────

    /// Start a new load generation; anything still in flight becomes stale.
    pub fn request_load(&mut self) {
        let generation = self.gate.begin();
        self.loading = true;
        let sent = self.loader.request(LoadRequest {
            generation,
            today: self.today,
            reference: self.reference,
        });
        if !sent {
            log::error!("record loader stopped");
            self.loading = false;
            self.status = Some("Record loader stopped; restart namaz".to_string());
        }
    }

    pub fn on_loaded(&mut self, generation: u64, result: Result<Snapshot, StoreError>) {
        if generation != self.gate.latest() {
            log::debug!("ignoring load gen {} (latest {})", generation, self.gate.latest());
            return;
        }
        self.loading = false;
        match result {
            Ok(snapshot) => {
                if self.gate.accept(&snapshot) {
                    self.snapshot = Some(snapshot);
                    self.status = None;
                }
            }
            Err(e) => {
                log::error!("loading records failed: {}", e);
                self.status = Some(if e.is_retryable() {
                    format!("✗ {}  ·  [r] retry", e)
                } else {
                    format!("✗ {}", e)
                });
            }
        }
    }

    /// Day rollover: move today forward and reload.
    pub fn tick(&mut self, now: NaiveDate) {
        if now == self.today {
            return;
        }
        log::info!("day changed {} -> {}", self.today, now);
        if self.reference == self.today {
            self.reference = now;
        }
        self.today = now;
        if let Err(e) = self.tracker.ensure_today(now) {
            log::warn!("could not create rows for {}: {}", now, e);
        }
        self.request_load();
    }

    // ─── Input ───────────────────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.show_help {
            self.show_help = false;
            return;
        }

        match key.code {
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('r') => self.request_load(),
            _ => match self.view {
                View::Dashboard => self.handle_dashboard_key(key),
                View::Calendar => self.handle_calendar_key(key),
            },
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => {
                self.focus_idx = self.focus_idx.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.focus_idx + 1 < PRAYERS_PER_DAY {
                    self.focus_idx += 1;
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Char('m') => {
                self.toggle_focused();
            }
            KeyCode::Char('c') => self.view = View::Calendar,
            _ => {}
        }
    }

    fn handle_calendar_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('c') => self.back_to_dashboard(),
            KeyCode::Left | KeyCode::Char('h') => self.navigate(-1),
            KeyCode::Right | KeyCode::Char('l') => self.navigate(1),
            KeyCode::Char('w') => {
                self.mode = match self.mode {
                    CalendarMode::Month => CalendarMode::Week,
                    CalendarMode::Week => CalendarMode::Month,
                };
            }
            KeyCode::Char('t') => {
                if self.reference != self.today {
                    self.reference = self.today;
                    self.request_load();
                }
            }
            _ => {}
        }
    }

    fn navigate(&mut self, step: i32) {
        self.reference = match self.mode {
            CalendarMode::Month => engine::shift_month(self.reference, step),
            CalendarMode::Week => engine::shift_week(self.reference, step as i64),
        };
        self.request_load();
    }

    fn back_to_dashboard(&mut self) {
        self.view = View::Dashboard;
        if self.reference != self.today {
            self.reference = self.today;
            self.request_load();
        }
    }

    /// Flip the focused prayer locally, persist it, and roll back on failure.
    fn toggle_focused(&mut self) {
        let Some(snapshot) = self.snapshot.as_mut() else {
            self.status = Some("Still loading records…".to_string());
            return;
        };
        if snapshot.today != self.today {
            // Day rolled over; wait for the new day's snapshot
            self.status = Some("New day, reloading records…".to_string());
            return;
        }
        let prayer = Prayer::ALL[self.focus_idx.min(PRAYERS_PER_DAY - 1)];
        let pending = snapshot.apply_speculative(self.today, prayer);

        match self.tracker.commit_toggle(&pending) {
            Ok(()) => {
                log::debug!("{} on {} -> {}", prayer, pending.date, pending.completed);
                // Reload so in-flight reads from before the write are discarded
                self.request_load();
            }
            Err(e) => {
                log::error!("toggling {} failed: {}", prayer, e);
                snapshot.rollback(pending);
                self.status = Some(format!("✗ Could not save {}: {}", prayer.display_name(), e));
            }
        }
    }

    // ─── Drawing ─────────────────────────────────────────────────────────────

    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(theme::base()), area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // header
                Constraint::Min(0),    // body
                Constraint::Length(1), // status bar
            ])
            .split(area);

        let subtitle = match (self.view, self.loading) {
            (View::Dashboard, false) => "Daily Prayer Tracker",
            (View::Calendar, false) => "Calendar",
            (_, true) => "Loading…",
        };
        header::render(frame, chunks[0], self.today, subtitle);

        let hints = match self.view {
            View::Dashboard => statusbar::DASHBOARD_HINTS,
            View::Calendar => statusbar::CALENDAR_HINTS,
        };
        statusbar::render(frame, chunks[2], hints, self.status.as_deref());

        match &self.snapshot {
            None => self.draw_placeholder(frame, chunks[1]),
            Some(snap) => match self.view {
                View::Dashboard => self.draw_dashboard(frame, chunks[1], snap),
                View::Calendar => self.draw_calendar(frame, chunks[1], snap),
            },
        }

        if self.show_help {
            self.draw_help_overlay(frame);
        }
    }

    fn draw_placeholder(&self, frame: &mut Frame, area: Rect) {
        let text = if self.loading {
            "Loading records…"
        } else {
            "No records loaded. Press [r] to retry."
        };
        let paragraph = Paragraph::new(vec![Line::from(""), Line::from(Span::styled(text, theme::dim()))])
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }

    fn draw_dashboard(&self, frame: &mut Frame, area: Rect, snap: &Snapshot) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(9), // prayers
                Constraint::Length(6), // week strip
                Constraint::Min(0),
            ])
            .split(columns[0]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(10), // quick stats
                Constraint::Length(5),  // weekly gauge
                Constraint::Min(0),
            ])
            .split(columns[1]);

        prayers::render(
            frame,
            left[0],
            &snap.today_record,
            &self.config.display,
            self.focus_idx,
            true,
        );
        overview::render(frame, left[1], &snap.week);
        quick_stats::render(frame, right[0], snap);
        progress::render(frame, right[1], &snap.weekly);
    }

    fn draw_calendar(&self, frame: &mut Frame, area: Rect, snap: &Snapshot) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);

        let first = snap.config.week_start.weekday();
        match self.mode {
            CalendarMode::Month => {
                calendar::render_month(frame, chunks[0], &snap.month, &snap.monthly, first)
            }
            CalendarMode::Week => {
                calendar::render_week(frame, chunks[0], &snap.week, &snap.weekly, first)
            }
        }

        let mut legend = Vec::new();
        for (b, label) in [
            (Band::Full, "all five   "),
            (Band::High, "80%+   "),
            (Band::Half, "50%+   "),
            (Band::Low, "some   "),
            (Band::Empty, "none"),
        ] {
            legend.push(Span::styled(format!("{} ", band_icon(b)), theme::band(b)));
            legend.push(Span::styled(label, theme::dim()));
        }
        frame.render_widget(
            Paragraph::new(Line::from(legend)).alignment(Alignment::Center),
            chunks[1],
        );
    }

    fn draw_help_overlay(&self, frame: &mut Frame) {
        let area = frame.area();
        let popup_area = Rect {
            x: area.width / 4,
            y: area.height / 6,
            width: area.width / 2,
            height: (area.height * 2 / 3).min(18),
        };

        frame.render_widget(Clear, popup_area);

        let key = |k: &'static str, what: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {:<14}", k), theme::accent()),
                Span::styled(what, theme::dim()),
            ])
        };

        let help_text = vec![
            Line::from(Span::styled(
                "  Keybindings",
                theme::accent().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            key("[↑ ↓] / j k", "Select prayer"),
            key("Space / Enter", "Toggle prayer done"),
            key("[c]", "Calendar / dashboard"),
            key("[← →] / h l", "Previous / next period"),
            key("[w]", "Month or week view"),
            key("[t]", "Jump to today"),
            key("[r]", "Reload records"),
            key("[?]", "Toggle help"),
            key("[Esc] / q", "Back / quit"),
            Line::from(""),
            Line::from(Span::styled("  [any key] close", theme::dim())),
        ];

        let block = Block::default()
            .title(Span::styled(" Help ", theme::accent()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::accent())
            .style(theme::surface());

        frame.render_widget(Paragraph::new(help_text).block(block), popup_area);
    }
}

fn event_loop(terminal: &mut DefaultTerminal, app: &mut App, events: &EventHandler) -> Result<()> {
    loop {
        terminal.draw(|frame| app.draw(frame))?;

        match events.next()? {
            Event::Key(key) => app.handle_key(key),
            Event::Tick => app.tick(Local::now().date_naive()),
            Event::Loaded { generation, result } => app.on_loaded(generation, result),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Run the TUI event loop.
pub fn run(config: AppConfig, db_path: &Path) -> Result<()> {
    let events = EventHandler::new(TICK_MS);
    let mut app = App::new(config, db_path, events.sender(), Local::now().date_naive())?;

    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut app, &events);
    ratatui::restore();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::PrayerStore;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Duration;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn setup() -> (TempDir, App, mpsc::Receiver<Event>) {
        let dir = TempDir::new().unwrap();
        let (tx, rx) = mpsc::channel();
        let app = App::new(AppConfig::default(), &dir.path().join("namaz.db"), tx, today()).unwrap();
        (dir, app, rx)
    }

    /// Feed loader results back until the latest generation has landed.
    fn settle(app: &mut App, rx: &mpsc::Receiver<Event>) {
        while app.loading {
            match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
                Event::Loaded { generation, result } => app.on_loaded(generation, result),
                other => panic!("unexpected event {:?}", other),
            }
        }
    }

    #[test]
    fn initial_load_populates_snapshot() {
        let (_dir, mut app, rx) = setup();
        settle(&mut app, &rx);

        let snap = app.snapshot.as_ref().unwrap();
        assert_eq!(snap.today, today());
        assert_eq!(snap.today_record.completed_count(), 0);
        assert_eq!(snap.week.cells.len(), 7);
    }

    #[test]
    fn toggle_updates_snapshot_and_store() {
        let (dir, mut app, rx) = setup();
        settle(&mut app, &rx);

        app.handle_key(press(KeyCode::Down));
        app.handle_key(press(KeyCode::Char(' ')));
        assert!(app.snapshot.as_ref().unwrap().today_record.is_completed(Prayer::Dhuhr));

        settle(&mut app, &rx);
        assert!(app.snapshot.as_ref().unwrap().today_record.is_completed(Prayer::Dhuhr));

        let store = SqliteStore::open(&dir.path().join("namaz.db")).unwrap();
        let records = store.get_records(today(), today()).unwrap();
        assert!(records[&today()].is_completed(Prayer::Dhuhr));
        assert!(!records[&today()].is_completed(Prayer::Fajr));
    }

    #[test]
    fn stale_results_are_ignored() {
        let (_dir, mut app, rx) = setup();
        settle(&mut app, &rx);
        let before = app.snapshot.clone();

        app.request_load();
        app.request_load();
        let old = app.gate.latest() - 1;
        let stale = Snapshot::build(old, today(), today(), app.config.tracker, None, Default::default());
        app.on_loaded(old, Ok(stale));

        assert!(app.loading);
        assert_eq!(app.snapshot, before);
        settle(&mut app, &rx);
    }

    #[test]
    fn failed_load_keeps_previous_snapshot() {
        let (_dir, mut app, rx) = setup();
        settle(&mut app, &rx);
        let before = app.snapshot.clone();

        app.request_load();
        let latest = app.gate.latest();
        app.on_loaded(
            latest,
            Err(StoreError::Load(rusqlite::Error::QueryReturnedNoRows)),
        );

        assert!(!app.loading);
        assert_eq!(app.snapshot, before);
        assert!(app.status.as_deref().unwrap().contains("retry"));
    }

    #[test]
    fn calendar_navigation_moves_reference() {
        let (_dir, mut app, rx) = setup();
        settle(&mut app, &rx);

        app.handle_key(press(KeyCode::Char('c')));
        assert_eq!(app.view, View::Calendar);

        app.handle_key(press(KeyCode::Right));
        assert_eq!(app.reference, NaiveDate::from_ymd_opt(2026, 11, 1).unwrap());
        settle(&mut app, &rx);
        assert_eq!(app.snapshot.as_ref().unwrap().month.month, 11);

        app.handle_key(press(KeyCode::Char('t')));
        assert_eq!(app.reference, today());

        app.handle_key(press(KeyCode::Char('w')));
        app.handle_key(press(KeyCode::Left));
        assert_eq!(app.reference, NaiveDate::from_ymd_opt(2026, 10, 9).unwrap());

        app.handle_key(press(KeyCode::Esc));
        assert_eq!(app.view, View::Dashboard);
        assert_eq!(app.reference, today());
        assert!(!app.should_quit);
        settle(&mut app, &rx);
    }

    #[test]
    fn day_rollover_reloads_for_new_day() {
        let (_dir, mut app, rx) = setup();
        settle(&mut app, &rx);

        let tomorrow = today().succ_opt().unwrap();
        app.tick(tomorrow);
        assert_eq!(app.today, tomorrow);
        assert_eq!(app.reference, tomorrow);
        settle(&mut app, &rx);
        assert_eq!(app.snapshot.as_ref().unwrap().today, tomorrow);
    }

    #[test]
    fn toggle_waits_for_snapshot_of_new_day() {
        let (dir, mut app, rx) = setup();
        settle(&mut app, &rx);

        let tomorrow = today().succ_opt().unwrap();
        app.tick(tomorrow);
        app.handle_key(press(KeyCode::Char(' ')));
        let snap = app.snapshot.as_ref().unwrap();
        assert_eq!(snap.today, today());
        assert_eq!(snap.today_record.completed_count(), 0);
        assert!(app.status.is_some());

        let store = SqliteStore::open(&dir.path().join("namaz.db")).unwrap();
        let records = store.get_records(tomorrow, tomorrow).unwrap();
        assert!(!records[&tomorrow].is_completed(Prayer::Fajr));

        settle(&mut app, &rx);
        app.handle_key(press(KeyCode::Char(' ')));
        assert!(app.snapshot.as_ref().unwrap().today_record.is_completed(Prayer::Fajr));
        settle(&mut app, &rx);
    }

    #[test]
    fn help_overlay_swallows_next_key() {
        let (_dir, mut app, rx) = setup();
        settle(&mut app, &rx);

        app.handle_key(press(KeyCode::Char('?')));
        assert!(app.show_help);
        app.handle_key(press(KeyCode::Esc));
        assert!(!app.show_help);
        assert!(!app.should_quit);

        app.handle_key(press(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[test]
    fn dashboard_renders_prayer_names() {
        let (_dir, mut app, rx) = setup();
        settle(&mut app, &rx);

        let mut terminal = Terminal::new(TestBackend::new(110, 36)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();

        for prayer in Prayer::ALL {
            assert!(text.contains(prayer.display_name()));
        }
        assert!(text.contains("Quick Stats"));
    }
}
