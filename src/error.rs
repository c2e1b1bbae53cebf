use thiserror::Error;

/// Failures reported by a prayer record store.
///
/// Missing data is never an error: a date without a record reads as an
/// empty record. Only bad input and storage I/O surface here.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown prayer '{0}' (expected fajr, dhuhr, asr, maghrib or isha)")]
    InvalidPrayer(String),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("failed to load prayer records")]
    Load(#[source] rusqlite::Error),

    #[error("failed to save prayer record")]
    Write(#[source] rusqlite::Error),
}

impl StoreError {
    /// Load failures can be retried; input errors cannot.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Load(_) | StoreError::Write(_))
    }
}
