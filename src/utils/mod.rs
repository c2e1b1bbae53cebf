pub mod date;
pub mod format;
