//! Common error types for tagfix binaries.

use thiserror::Error;

/// Common error type for tagfix operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Snapshot build failed
    #[error("catalogue build failed: {0}")]
    Build(#[from] tagfix_core::BuildError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("{0}")]
    Internal(String),
}

/// Result type alias using tagfix Error.
pub type Result<T> = std::result::Result<T, Error>;
