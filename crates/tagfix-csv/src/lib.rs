//! Catalogue file ingestion for tagfix
//!
//! Parses tag exports (one tag per line, comma or space separated) into
//! [`TagRecord`](tagfix_core::TagRecord)s and exposes them as a
//! [`RecordSource`](tagfix_core::RecordSource).
//!
//! ```no_run
//! use tagfix_core::TagEngine;
//! use tagfix_csv::CsvSource;
//!
//! let engine = TagEngine::default();
//! let mut source = CsvSource::new(["danbooru.csv", "extra.csv"]);
//! let summary = engine.reload(&mut source)?;
//! println!("{} tags, {} lines skipped", summary.total_tags, source.stats().skipped);
//! # Ok::<(), tagfix_core::BuildError>(())
//! ```

pub mod error;
pub mod parse;
pub mod source;

pub use error::ParseError;
pub use parse::{clean_name, parse_line, CsvOptions};
pub use source::{CsvSource, CsvStats};
