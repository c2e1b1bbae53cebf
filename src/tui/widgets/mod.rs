pub mod calendar;
pub mod header;
pub mod overview;
pub mod prayers;
pub mod progress;
pub mod quick_stats;
pub mod statusbar;
