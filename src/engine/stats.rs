use chrono::{Days, Duration, NaiveDate};

use crate::config::{QazaWindow, StreakPolicy};
use crate::models::{
    CalendarCell, DailyRecord, MonthWindow, RecordMap, Streak, Totals, WeekWindow,
    PRAYERS_PER_DAY,
};

/// Integer percentage rounded half up; 0 when nothing was possible.
pub fn percent(done: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let done = done.min(total) as u64;
    let total = total as u64;
    ((done * 200 + total) / (total * 2)) as u8
}

pub fn daily_percentage(record: Option<&DailyRecord>) -> u8 {
    record
        .map(|r| percent(r.completed_count() as u32, PRAYERS_PER_DAY as u32))
        .unwrap_or(0)
}

fn is_full(records: &RecordMap, date: NaiveDate) -> bool {
    daily_percentage(records.get(&date)) == 100
}

/// Consecutive fully-completed days walking back from `today`.
pub fn compute_streak(today: NaiveDate, records: &RecordMap, policy: StreakPolicy) -> u32 {
    // Nothing before the first record can be complete
    let Some(first) = records.keys().next().copied() else {
        return 0;
    };

    let mut day = today;
    if policy == StreakPolicy::Grace && !is_full(records, today) {
        day = today - Duration::days(1);
    }

    let mut streak = 0;
    while day >= first && is_full(records, day) {
        streak += 1;
        day -= Duration::days(1);
    }
    streak
}

/// Longest run of consecutive fully-completed days anywhere in `records`.
pub fn best_streak(records: &RecordMap) -> u32 {
    let mut best = 0u32;
    let mut run = 0u32;
    let mut prev: Option<NaiveDate> = None;

    for (date, record) in records {
        if !record.is_complete() {
            run = 0;
            prev = None;
            continue;
        }
        run = match prev {
            Some(p) if p + Duration::days(1) == *date => run + 1,
            _ => 1,
        };
        best = best.max(run);
        prev = Some(*date);
    }
    best
}

pub fn streak(today: NaiveDate, records: &RecordMap, policy: StreakPolicy) -> Streak {
    let current = compute_streak(today, records, policy);
    Streak {
        current,
        best: best_streak(records).max(current),
    }
}

fn totals<'a>(cells: impl Iterator<Item = &'a CalendarCell>) -> Totals {
    let mut t = Totals::default();
    for cell in cells {
        t.completed += cell.completed as u32;
        t.possible += PRAYERS_PER_DAY as u32;
        if cell.completion_percentage == 100 {
            t.full_days += 1;
        }
    }
    t.percentage = percent(t.completed, t.possible);
    t
}

pub fn weekly_totals(week: &WeekWindow) -> Totals {
    totals(week.cells.iter())
}

/// Totals over the days that belong to the displayed month.
pub fn monthly_totals(month: &MonthWindow) -> Totals {
    totals(month.in_month())
}

/// First and last day the qaza counter covers, or `None` when nothing
/// has been tracked before today.
pub fn qaza_range(
    today: NaiveDate,
    first_tracked: Option<NaiveDate>,
    window: QazaWindow,
) -> Option<(NaiveDate, NaiveDate)> {
    let first = first_tracked?;
    let end = today - Duration::days(1);
    let start = match window {
        QazaWindow::Lifetime => first,
        QazaWindow::TrailingDays(n) => today
            .checked_sub_days(Days::new(n as u64))
            .map_or(first, |s| s.max(first)),
    };
    (start <= end).then_some((start, end))
}

/// Prayers not completed in the qaza window. Untracked days inside the
/// window count as five missed prayers.
pub fn qaza_count(
    records: &RecordMap,
    today: NaiveDate,
    first_tracked: Option<NaiveDate>,
    window: QazaWindow,
) -> u32 {
    let Some((start, end)) = qaza_range(today, first_tracked, window) else {
        return 0;
    };
    let days = (end - start).num_days() as u32 + 1;
    let completed: u32 = records
        .range(start..=end)
        .map(|(_, r)| r.completed_count() as u32)
        .sum();
    days * PRAYERS_PER_DAY as u32 - completed
}
