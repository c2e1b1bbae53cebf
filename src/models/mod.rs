pub mod calendar;
pub mod prayer;
pub mod record;
pub mod stats;

pub use calendar::{CalendarCell, MonthWindow, WeekWindow};
pub use prayer::{Prayer, PRAYERS_PER_DAY};
pub use record::{DailyRecord, RecordMap};
pub use stats::{MonthlyTotals, Streak, Totals, WeeklyTotals};
