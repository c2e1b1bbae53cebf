use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::str::FromStr;

use crate::config::{AppConfig, QazaWindow};
use crate::db::PrayerStore;
use crate::engine;
use crate::models::{CalendarCell, MonthWindow, Prayer, Streak, WeeklyTotals};
use crate::tracker::{Snapshot, Tracker};
use crate::utils::date::{month_name, parse_date, week_header};
use crate::utils::format::{band, band_icon, plural, progress_bar, Band};

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;196;160;68m";

fn band_color(b: Band) -> &'static str {
    match b {
        Band::Full => GREEN,
        Band::High | Band::Half => AMBER,
        Band::Low => RED,
        Band::Empty => DIM,
    }
}

fn load<S: PrayerStore>(
    tracker: &Tracker<S>,
    today: NaiveDate,
    reference: NaiveDate,
) -> Result<Snapshot> {
    tracker.ensure_today(today)?;
    tracker
        .load(0, today, reference)
        .context("Loading prayer records")
}

// ─── Today ───────────────────────────────────────────────────────────────────

pub fn handle_today<S: PrayerStore>(
    tracker: &Tracker<S>,
    config: &AppConfig,
    today: NaiveDate,
) -> Result<()> {
    let snap = load(tracker, today, today)?;

    println!();
    println_colored!(GOLD, "  Today's Prayers — {}", today.format("%A, %b %d, %Y"));
    println!();
    for (prayer, done) in snap.today_record.entries() {
        let line = format!(
            "  {} {:<8} {:<17} {}",
            if done { "[x]" } else { "[ ]" },
            prayer.display_name(),
            prayer.subtitle(),
            config.display.time_for(prayer)
        );
        if done {
            println_colored!(GREEN, "{}", line);
        } else {
            println!("{}", line);
        }
    }
    println!();
    print_quick_stats(&snap);
    println!();
    Ok(())
}

fn print_quick_stats(snap: &Snapshot) {
    println_colored!(
        BOLD,
        "  Today:    {}/5  ({} left)",
        snap.today_record.completed_count(),
        snap.today_record.missed_count()
    );
    println_colored!(
        BOLD,
        "  Streak:   {}  (best {})",
        plural(snap.streak.current, "day", "days"),
        snap.streak.best
    );
    if snap.qaza == 0 {
        println_colored!(GREEN, "  Qaza:     0 prayers ✓");
    } else {
        println_colored!(RED, "  Qaza:     {}", plural(snap.qaza, "prayer", "prayers"));
    }
    println!(
        "  Week:     {}%  ({} of {} prayers)",
        snap.weekly.percentage, snap.weekly.completed, snap.weekly.possible
    );
}

// ─── Toggle / mark ───────────────────────────────────────────────────────────

pub fn handle_toggle<S: PrayerStore>(
    tracker: &Tracker<S>,
    prayer_str: &str,
    date_str: &str,
    today: NaiveDate,
) -> Result<()> {
    let prayer = Prayer::from_str(prayer_str)?;
    let date = parse_date(date_str, today)?;

    let done = tracker.toggle(date, prayer)?;
    if done {
        println_colored!(GREEN, "  ✓ {} on {} marked as done", prayer, date);
    } else {
        println_colored!(DIM, "  ○ {} on {} unmarked", prayer, date);
    }
    Ok(())
}

pub fn handle_mark<S: PrayerStore>(
    tracker: &Tracker<S>,
    prayer_str: &str,
    date_str: &str,
    undo: bool,
    today: NaiveDate,
) -> Result<()> {
    let prayer = Prayer::from_str(prayer_str)?;
    let date = parse_date(date_str, today)?;

    tracker.set_completion(date, prayer, !undo)?;
    if undo {
        println_colored!(DIM, "  ○ {} on {} marked as not done", prayer, date);
    } else {
        println_colored!(GREEN, "  ✓ {} on {} marked as done", prayer, date);
    }
    Ok(())
}

// ─── Week / month ────────────────────────────────────────────────────────────

pub fn handle_week<S: PrayerStore>(
    tracker: &Tracker<S>,
    date_str: &str,
    offset: i64,
    today: NaiveDate,
) -> Result<()> {
    let reference = engine::shift_week(parse_date(date_str, today)?, offset);
    let snap = load(tracker, today, reference)?;

    println!();
    println_colored!(
        GOLD,
        "  Week of {} – {}",
        snap.week.start.format("%b %d"),
        snap.week.end().format("%b %d, %Y")
    );
    println!();
    for cell in &snap.week.cells {
        let marker = if cell.is_today { "›" } else { " " };
        let b = band(cell.completion_percentage);
        println_colored!(
            band_color(b),
            " {} {} {:>2}  {}  {}/5  {:>3}%",
            marker,
            cell.day_name,
            cell.day_number,
            band_icon(b),
            cell.completed,
            cell.completion_percentage
        );
    }
    println!();
    print_totals("Week", &snap.weekly);
    println!();
    Ok(())
}

pub fn handle_month<S: PrayerStore>(
    tracker: &Tracker<S>,
    config: &AppConfig,
    date_str: &str,
    offset: i32,
    today: NaiveDate,
) -> Result<()> {
    let reference = engine::shift_month(parse_date(date_str, today)?, offset);
    let snap = load(tracker, today, reference)?;

    println!();
    println_colored!(GOLD, "  {} {}", month_name(snap.month.month), snap.month.year);
    println!();
    print!(" ");
    for name in week_header(config.tracker.week_start.weekday()) {
        print!(" {:>4}", name);
    }
    println!();
    for row in render_month_rows(&snap.month) {
        println!(" {}", row);
    }
    println!();
    print_totals("Month", &snap.monthly);
    println!();
    Ok(())
}

fn month_cell(cell: &CalendarCell) -> String {
    if !cell.is_current_month {
        return format!("{}{:>4}\x1b[0m", DIM, cell.day_number);
    }
    let color = band_color(band(cell.completion_percentage));
    if cell.is_today {
        format!("{}{}[{:>2}]\x1b[0m", BOLD, color, cell.day_number)
    } else {
        format!("{}{:>4}\x1b[0m", color, cell.day_number)
    }
}

fn render_month_rows(month: &MonthWindow) -> Vec<String> {
    month
        .rows()
        .map(|row| {
            row.iter()
                .map(|c| format!(" {}", month_cell(c)))
                .collect::<String>()
        })
        .collect()
}

fn print_totals(label: &str, totals: &WeeklyTotals) {
    println_colored!(
        BOLD,
        "  {}: {}%  {}  {} of {} prayers, {} missed, {} full",
        label,
        totals.percentage,
        progress_bar(totals.completed, totals.possible, 12),
        totals.completed,
        totals.possible,
        totals.missed(),
        plural(totals.full_days, "day", "days")
    );
}

// ─── Stats ───────────────────────────────────────────────────────────────────

fn describe_window(window: QazaWindow) -> String {
    match window {
        QazaWindow::Lifetime => "since tracking began".to_string(),
        QazaWindow::TrailingDays(n) => format!("last {}", plural(n, "day", "days")),
    }
}

pub fn handle_stats<S: PrayerStore>(
    tracker: &Tracker<S>,
    config: &AppConfig,
    today: NaiveDate,
) -> Result<()> {
    let snap = load(tracker, today, today)?;

    println!();
    println_colored!(GOLD, "  Statistics");
    println!();
    println_colored!(
        BOLD,
        "  Streak:      {} current  |  {} best",
        plural(snap.streak.current, "day", "days"),
        plural(snap.streak.best, "day", "days")
    );
    println!(
        "  This week:   {}%  ({} of {})",
        snap.weekly.percentage, snap.weekly.completed, snap.weekly.possible
    );
    println!(
        "  This month:  {}%  ({} of {})",
        snap.monthly.percentage, snap.monthly.completed, snap.monthly.possible
    );

    let window = config.tracker.qaza_window;
    let span = engine::qaza_range(today, snap.first_tracked, window)
        .map(|(s, e)| format!("{} → {}", s, e))
        .unwrap_or_else(|| "no history yet".to_string());
    if snap.qaza == 0 {
        println_colored!(GREEN, "  Qaza:        0 prayers ✓  ({})", describe_window(window));
    } else {
        println_colored!(
            AMBER,
            "  Qaza:        {}  ({}, {})",
            plural(snap.qaza, "prayer", "prayers"),
            describe_window(window),
            span
        );
    }
    println!();
    Ok(())
}

// ─── Export ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ExportSummary {
    pub date: NaiveDate,
    pub days: Vec<CalendarCell>,
    pub weekly: WeeklyTotals,
    pub streak: Streak,
    pub qaza: u32,
}

pub fn export_summary(snap: &Snapshot) -> ExportSummary {
    ExportSummary {
        date: snap.today,
        days: snap.week.cells.clone(),
        weekly: snap.weekly,
        streak: snap.streak,
        qaza: snap.qaza,
    }
}

fn day_bar(completed: u8) -> &'static str {
    match completed {
        5 => "█████",
        4 => "████░",
        3 => "███░░",
        2 => "██░░░",
        1 => "█░░░░",
        _ => "░░░░░",
    }
}

pub fn handle_export<S: PrayerStore>(
    tracker: &Tracker<S>,
    json: bool,
    today: NaiveDate,
) -> Result<()> {
    let snap = load(tracker, today, today)?;
    let summary = export_summary(&snap);

    if json {
        let out = serde_json::to_string_pretty(&summary).context("Serializing summary")?;
        println!("{}", out);
        return Ok(());
    }

    println!("# namaz — Weekly Summary");
    println!("# {}", summary.date);
    println!();
    println!("## Prayer Completion ({} – {})", snap.week.start, snap.week.end());
    for day in &summary.days {
        println!(
            "  {} {}  {}/5  {}",
            day.date,
            day.day_name,
            day.completed,
            day_bar(day.completed)
        );
    }
    println!();
    println!("## Summary");
    println!(
        "  Week:       {}% ({} of {})",
        summary.weekly.percentage, summary.weekly.completed, summary.weekly.possible
    );
    println!("  Streak:     {} days (best: {})", summary.streak.current, summary.streak.best);
    println!("  Qaza owed:  {}", summary.qaza);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackerConfig;
    use crate::db::MemoryStore;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, day).unwrap()
    }

    #[test]
    fn export_json_has_week_and_totals() {
        let today = d(16);
        let tracker = Tracker::new(MemoryStore::new(), TrackerConfig::default());
        for p in Prayer::ALL {
            tracker.set_completion(d(12), p, true).unwrap();
        }
        tracker.set_completion(today, Prayer::Fajr, true).unwrap();

        let snap = tracker.load(0, today, today).unwrap();
        let value = serde_json::to_value(export_summary(&snap)).unwrap();
        assert_eq!(value["days"].as_array().unwrap().len(), 7);
        assert_eq!(value["days"][0]["date"], "2026-10-11");
        assert_eq!(value["days"][1]["completion_percentage"], 100);
        assert_eq!(value["days"][5]["is_today"], true);
        assert_eq!(value["weekly"]["completed"], 6);
        assert_eq!(value["weekly"]["percentage"], 17);
        // 13th-15th untracked (15) plus the 12th (0)
        assert_eq!(value["qaza"], 15);
    }

    #[test]
    fn month_rows_are_six_weeks() {
        let today = d(16);
        let tracker = Tracker::new(MemoryStore::new(), TrackerConfig::default());
        let snap = tracker.load(0, today, today).unwrap();
        let rows = render_month_rows(&snap.month);
        assert_eq!(rows.len(), 6);
        assert!(rows.iter().any(|r| r.contains("[16]")));
    }

    #[test]
    fn bad_input_is_reported() {
        let tracker = Tracker::new(MemoryStore::new(), TrackerConfig::default());
        assert!(handle_toggle(&tracker, "witr", "today", d(16)).is_err());
        assert!(handle_mark(&tracker, "fajr", "2026-13-01", false, d(16)).is_err());
    }
}
