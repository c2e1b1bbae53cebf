use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub day_name: &'static str,
    pub day_number: u32,
    pub is_today: bool,
    /// Always true in a week window.
    pub is_current_month: bool,
    pub completed: u8,
    pub completion_percentage: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekWindow {
    pub start: NaiveDate,
    pub cells: Vec<CalendarCell>,
}

impl WeekWindow {
    pub fn end(&self) -> NaiveDate {
        self.cells.last().map(|c| c.date).unwrap_or(self.start)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthWindow {
    pub year: i32,
    pub month: u32,
    pub cells: Vec<CalendarCell>,
}

impl MonthWindow {
    pub fn rows(&self) -> impl Iterator<Item = &[CalendarCell]> {
        self.cells.chunks(7)
    }

    pub fn in_month(&self) -> impl Iterator<Item = &CalendarCell> {
        self.cells.iter().filter(|c| c.is_current_month)
    }
}
