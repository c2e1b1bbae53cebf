use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::error::StoreError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Storage key for a date, e.g. "2026-03-14".
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse user input: "YYYY-MM-DD", "today" or "yesterday".
pub fn parse_date(input: &str, today: NaiveDate) -> Result<NaiveDate, StoreError> {
    match input.trim().to_lowercase().as_str() {
        "today" | "tod" => Ok(today),
        "yesterday" | "yest" => Ok(today - Duration::days(1)),
        other => NaiveDate::parse_from_str(other, DATE_FORMAT)
            .map_err(|e| StoreError::InvalidDate(format!("'{}': {}", input, e))),
    }
}

pub fn short_day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

/// Seven short day names in display order for a week starting on `first`.
pub fn week_header(first: Weekday) -> [&'static str; 7] {
    let mut names = [""; 7];
    let mut day = first;
    for slot in names.iter_mut() {
        *slot = short_day_name(day);
        day = day.succ();
    }
    names
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    #[test]
    fn parses_iso_and_relative_dates() {
        assert_eq!(
            parse_date("2026-02-28", today()).unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()
        );
        assert_eq!(parse_date("today", today()).unwrap(), today());
        assert_eq!(
            parse_date("Yesterday", today()).unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
        );
    }

    #[test]
    fn malformed_date_is_invalid() {
        for bad in ["2026-02-30", "16/10/2026", "", "soon"] {
            assert!(matches!(parse_date(bad, today()), Err(StoreError::InvalidDate(_))));
        }
    }

    #[test]
    fn week_header_starts_on_requested_day() {
        assert_eq!(week_header(Weekday::Sun)[0], "Sun");
        assert_eq!(week_header(Weekday::Mon), ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]);
    }
}
