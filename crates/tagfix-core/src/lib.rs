//! tagfix Core Engine
//!
//! Resolves a free-form, possibly misspelled label against a catalogue of
//! canonical tags and returns ranked correction candidates.
//!
//! # Features
//!
//! - `parallel` - Parallel fuzzy scan via rayon for large catalogues
//!
//! # Example
//!
//! ```rust
//! use tagfix_core::{Category, SearchOptions, TagEngine, TagRecord};
//!
//! let engine = TagEngine::default();
//! engine
//!     .load(vec![
//!         TagRecord::new("blonde hair", Category::General, 100).with_aliases(["blond hair"]),
//!         TagRecord::new("blonde eyes", Category::General, 50),
//!     ])
//!     .unwrap();
//!
//! let opts = SearchOptions::default();
//! assert_eq!(engine.search("blond_hair", 5, &opts), vec!["blonde hair"]);
//! assert_eq!(engine.search("blonde", 5, &opts), vec!["blonde hair", "blonde eyes"]);
//! ```

pub mod builder;
pub mod config;
pub mod engine;
pub mod error;
pub mod fuzzy;
pub mod index;
pub mod normalize;
pub mod pipeline;
pub mod record;
pub mod snapshot;
pub mod source;

// Re-export main types at crate root
pub use builder::IndexBuilder;
pub use config::{EngineConfig, FuzzyConfig, Metric};
pub use engine::{EngineStats, RankedCandidate, ReloadSummary, SearchOptions, TagEngine};
pub use error::{BuildError, FuzzyError, SourceError, SourceResult};
pub use fuzzy::{ScanSimilarity, ScoredName, SimilaritySource};
pub use normalize::normalize;
pub use pipeline::Strategy;
pub use record::{Category, CategorySet, TagRecord};
pub use snapshot::{Snapshot, SnapshotMeta};
pub use source::{MemorySource, RecordSource, RecordStream};
