//! Engine error types
//!
//! Only building a snapshot can fail. Normalization and query-time
//! strategies are total and never return these.

use thiserror::Error;

/// Errors raised by a record source while it is being consumed.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Underlying reader failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be decoded
    #[error("parse error at {location}: {message}")]
    Parse { location: String, message: String },

    /// Storage backend error (database, remote service, etc.)
    #[error("record source backend error: {0}")]
    Backend(String),
}

/// Result type for record sources
pub type SourceResult<T> = Result<T, SourceError>;

/// Errors that abort a snapshot build.
///
/// A failed build never touches the published snapshot.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The record stream failed
    #[error("record source failed: {0}")]
    Source(#[from] SourceError),

    /// A retained record cannot be indexed
    #[error("invalid record at {position}: {reason}")]
    InvalidRecord { position: usize, reason: String },
}

/// Failure reported by an external similarity provider.
#[derive(Debug, Clone, Error)]
#[error("similarity provider '{provider}' failed: {message}")]
pub struct FuzzyError {
    pub provider: String,
    pub message: String,
}

impl FuzzyError {
    pub fn new(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            message: message.into(),
        }
    }
}
