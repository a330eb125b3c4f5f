//! Engine configuration

use serde::{Deserialize, Serialize};

use crate::record::CategorySet;

/// Configuration for the tag engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Categories skipped by the builder
    pub excluded_categories: CategorySet,
    /// Shortest token kept in the word index
    pub min_token_len: usize,
    /// Limit used when the caller does not pass one
    pub default_limit: usize,
    /// Upper bound applied to every requested limit
    pub max_limit: usize,
    /// Fuzzy fallback tuning
    pub fuzzy: FuzzyConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            excluded_categories: CategorySet::default(),
            min_token_len: 3,
            default_limit: 5,
            max_limit: 20,
            fuzzy: FuzzyConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Clamp a requested limit into `1..=max_limit`.
    ///
    /// A zero limit is treated as 1 rather than rejected.
    pub fn clamp_limit(&self, requested: usize) -> usize {
        requested.clamp(1, self.max_limit.max(1))
    }
}

/// Similarity measure used by the in-memory fuzzy scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Normalized Levenshtein similarity
    #[default]
    Levenshtein,
    /// Jaro-Winkler similarity
    JaroWinkler,
    /// Sørensen-Dice coefficient over character bigrams
    Dice,
    /// Indel ratio `2 * lcs / (len_a + len_b)`, the score behind rapidfuzz `fuzz.ratio`
    Indel,
}

/// Configuration for the fuzzy fallback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzzyConfig {
    /// Minimum similarity (0.0-1.0) for a candidate to be kept
    pub min_score: f64,
    /// Metric for the in-memory scan
    pub metric: Metric,
    /// Catalogue size at which the scan goes parallel (`parallel` feature)
    pub parallel_threshold: usize,
}

impl Default for FuzzyConfig {
    fn default() -> Self {
        Self {
            min_score: 0.6,
            metric: Metric::Levenshtein,
            parallel_threshold: 1000,
        }
    }
}
