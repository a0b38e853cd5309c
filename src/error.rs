use thiserror::Error;

/// Errors surfaced by the pairing registry and scoring engine
///
/// Every failure is typed so callers can distinguish retryable conflicts
/// from bad input and from pairs that simply do not have enough data yet.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed or out-of-range input, rejected before any aggregation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Unknown or expired code/pair
    #[error("Not found: {0}")]
    NotFound(String),

    /// Already joined, self join, lost compare-and-set race, or an
    /// exhausted code-generation budget. Expected under concurrency;
    /// the caller may retry with a fresh code.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Zero questions were scored across the entire catalog
    #[error("Insufficient data: {0}")]
    DataIncomplete(String),
}

impl CoreError {
    /// True for errors a caller can reasonably retry
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::Conflict(_))
    }
}
