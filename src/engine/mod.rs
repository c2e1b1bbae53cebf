//! Pure aggregation over per-day prayer records: percentages, streaks,
//! qaza and the week/month calendar projections. Nothing in here touches
//! storage; callers pass the records they loaded.

pub mod calendar;
pub mod stats;

pub use calendar::{month_grid_range, month_window, shift_month, shift_week, week_window};
pub use stats::{monthly_totals, qaza_count, qaza_range, streak, weekly_totals};
