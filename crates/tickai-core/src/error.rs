//! Error types for tickai operations.
//!
//! This module defines [`TickaiError`] which covers every failure that can occur
//! while normalizing scraped values, merging period records, or driving the
//! external statement and price sources.

use thiserror::Error;

/// Errors that can occur while collecting and merging fundamentals.
#[derive(Error, Debug)]
pub enum TickaiError {
    /// A negative or otherwise nonsensical argument was supplied.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An operation was attempted in a state that does not allow it.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A label was inserted twice for the same period while in strict mode.
    #[error("Duplicate label {label:?} for record {index}")]
    DuplicateLabel {
        /// Record index the duplicate was written to.
        index: usize,
        /// The repeated label.
        label: String,
    },

    /// Error parsing scraped text.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A transient failure reported by an external source.
    #[error("Source error: {0}")]
    Source(String),

    /// Rate limit exceeded by a source.
    #[error("Rate limited by {source_name}: retry after {retry_after:?}")]
    RateLimited {
        /// The source that rate limited the request.
        source_name: String,
        /// Suggested time to wait before retrying.
        retry_after: Option<std::time::Duration>,
    },

    /// The requested symbol was not found.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// Data is not available for the requested symbol and date range.
    #[error("Data not available for {symbol} in range {start} to {end}")]
    DataNotAvailable {
        /// The symbol that was requested.
        symbol: String,
        /// Start of the requested date range.
        start: String,
        /// End of the requested date range.
        end: String,
    },

    /// A retried operation kept failing until the attempt ceiling was hit.
    #[error("{operation} failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// Name of the operation that was retried.
        operation: String,
        /// Number of attempts made.
        attempts: u32,
        /// The error returned by the final attempt.
        last_error: Box<TickaiError>,
    },

    /// Error building a tabular view of the records.
    #[error("Table error: {0}")]
    Table(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

impl TickaiError {
    /// Returns true if retrying the failed operation may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Source(_) | Self::RateLimited { .. })
    }
}

/// Result type alias using [`TickaiError`].
pub type Result<T> = std::result::Result<T, TickaiError>;
