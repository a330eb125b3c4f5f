//! Fuzzy fallback
//!
//! The last pipeline strategy, run only when the caller asks for it and the
//! engine was given a [`SimilaritySource`]. Two kinds of source fit:
//!
//! - **Scan**: score every indexed name in memory ([`ScanSimilarity`])
//! - **External**: a remote similarity search returning scored names
//!
//! Sources may return names the snapshot does not know; the pipeline keeps
//! only indexed tags, applies the score threshold and ranks by score, then
//! popularity.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use tagfix_core::{Category, EngineConfig, ScanSimilarity, SearchOptions, TagEngine, TagRecord};
//!
//! let config = EngineConfig::default();
//! let engine = TagEngine::new(config.clone())
//!     .with_similarity(Arc::new(ScanSimilarity::from_config(&config.fuzzy)));
//! engine
//!     .load(vec![TagRecord::new("blonde hair", Category::General, 100)])
//!     .unwrap();
//!
//! let fuzzy = SearchOptions { use_fuzzy_fallback: true };
//! assert_eq!(engine.search("blnode hair", 5, &fuzzy), vec!["blonde hair"]);
//! ```

mod scan;
mod strategies;

pub use scan::ScanSimilarity;
pub use strategies::{dice_similarity, jaro_winkler_similarity, levenshtein_similarity, score};

use serde::{Deserialize, Serialize};

use crate::error::FuzzyError;
use crate::snapshot::Snapshot;

/// A name proposed by a similarity source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredName {
    pub name: String,
    /// Similarity in `0.0..=1.0`
    pub score: f64,
}

impl ScoredName {
    pub fn new(name: impl Into<String>, score: f64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// Approximate string matching collaborator.
///
/// Called with the normalized query and the snapshot the current search is
/// pinned to. May be slow or fail; a failure only drops the fuzzy
/// contribution from the result.
pub trait SimilaritySource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Up to `limit` candidates scoring at least `min_score`.
    fn candidates(
        &self,
        query: &str,
        snapshot: &Snapshot,
        limit: usize,
        min_score: f64,
    ) -> Result<Vec<ScoredName>, FuzzyError>;
}
