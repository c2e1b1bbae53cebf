use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};

use crate::engine::stats::daily_percentage;
use crate::models::{CalendarCell, MonthWindow, RecordMap, WeekWindow};
use crate::utils::date::{first_of_month, short_day_name};

pub const DAYS_PER_WEEK: usize = 7;
pub const MONTH_GRID_CELLS: usize = 6 * DAYS_PER_WEEK;

/// The `first`-weekday on or before `date`.
pub fn start_of_week(date: NaiveDate, first: Weekday) -> NaiveDate {
    let offset = (7 + date.weekday().num_days_from_monday() - first.num_days_from_monday()) % 7;
    date - Duration::days(offset as i64)
}

fn cell(date: NaiveDate, today: NaiveDate, in_month: bool, records: &RecordMap) -> CalendarCell {
    let record = records.get(&date);
    CalendarCell {
        date,
        day_name: short_day_name(date.weekday()),
        day_number: date.day(),
        is_today: in_month && date == today,
        is_current_month: in_month,
        completed: record.map(|r| r.completed_count()).unwrap_or(0),
        completion_percentage: daily_percentage(record),
    }
}

pub fn week_window(
    reference: NaiveDate,
    today: NaiveDate,
    first: Weekday,
    records: &RecordMap,
) -> WeekWindow {
    let start = start_of_week(reference, first);
    let cells = (0..DAYS_PER_WEEK as i64)
        .map(|i| cell(start + Duration::days(i), today, true, records))
        .collect();
    WeekWindow { start, cells }
}

/// Six full weeks covering the month of `reference`, padded with the
/// neighbouring months' days.
pub fn month_window(
    reference: NaiveDate,
    today: NaiveDate,
    first: Weekday,
    records: &RecordMap,
) -> MonthWindow {
    let month_start = first_of_month(reference);
    let grid_start = start_of_week(month_start, first);
    let cells = (0..MONTH_GRID_CELLS as i64)
        .map(|i| {
            let date = grid_start + Duration::days(i);
            let in_month = date.year() == month_start.year() && date.month() == month_start.month();
            cell(date, today, in_month, records)
        })
        .collect();
    MonthWindow {
        year: month_start.year(),
        month: month_start.month(),
        cells,
    }
}

/// First and last date a month grid shows, without building it.
pub fn month_grid_range(reference: NaiveDate, first: Weekday) -> (NaiveDate, NaiveDate) {
    let start = start_of_week(first_of_month(reference), first);
    (start, start + Duration::days(MONTH_GRID_CELLS as i64 - 1))
}


/// Move by whole weeks; stays on `reference` when the target is out of range.
pub fn shift_week(reference: NaiveDate, weeks: i64) -> NaiveDate {
    Duration::try_weeks(weeks)
        .and_then(|delta| reference.checked_add_signed(delta))
        .unwrap_or(reference)
}

/// Move by whole months; the result is always the first of a month.
pub fn shift_month(reference: NaiveDate, months: i32) -> NaiveDate {
    let first = first_of_month(reference);
    let shifted = if months >= 0 {
        first.checked_add_months(Months::new(months as u32))
    } else {
        first.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.unwrap_or(first)
}
