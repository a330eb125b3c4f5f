//! # tagfix Shared Rust Library
//!
//! Shared infrastructure for tagfix binaries:
//! - **error**: Common error type wrapping engine and I/O failures
//! - **tracing**: Logging setup that keeps stdout free for protocol output
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tagfix::error::{Error, Result};
//!
//! tagfix::tracing::init();
//! ```

pub mod error;
pub mod tracing;

pub use error::{Error, Result};
