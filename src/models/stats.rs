use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub current: u32,
    pub best: u32,
}

/// Completed prayers over a span of days against what was possible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub completed: u32,
    pub possible: u32,
    pub percentage: u8,
    /// Days in the span with all five prayers done.
    pub full_days: u32,
}

pub type WeeklyTotals = Totals;
pub type MonthlyTotals = Totals;

impl Totals {
    pub fn missed(&self) -> u32 {
        self.possible.saturating_sub(self.completed)
    }
}
