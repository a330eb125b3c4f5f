//! tagfix lookup service
//!
//! Wraps a [`TagEngine`](tagfix_core::TagEngine) loaded from catalogue files
//! and answers requests read one JSON object per line:
//!
//! ```text
//! {"op":"search","query":"blond_hair","limit":5}
//! {"op":"stats"}
//! {"op":"health"}
//! {"op":"reload"}
//! ```

pub mod config;
pub mod handlers;
pub mod server;
pub mod service;

pub use config::Args;
pub use handlers::{handle_line, Request, Response};
pub use server::serve;
pub use service::LookupService;
