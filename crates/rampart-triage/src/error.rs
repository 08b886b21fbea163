//! Error types for the triage core

use thiserror::Error;

/// Triage core error type
#[derive(Error, Debug)]
pub enum TriageError {
    /// Timestamp string did not parse
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Pcap time range inverted
    #[error("start time {start} is after end time {end}")]
    TimeRangeOrder { start: i64, end: i64 },

    /// Search backend failure
    #[error("search failed: {0}")]
    SearchFailed(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the triage core
pub type TriageResult<T> = Result<T, TriageError>;
