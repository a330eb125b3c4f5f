//! Error types for catalogue parsing

use thiserror::Error;

/// A single line that could not be turned into a record.
///
/// Line errors are logged and the line is skipped; they never abort a build.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected at least 3 fields, found {0}")]
    MissingFields(usize),

    #[error("invalid {field} '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("empty tag name")]
    EmptyTag,
}
