//! In-memory similarity scan over every indexed name

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::strategies;
use super::{ScoredName, SimilaritySource};
use crate::config::{FuzzyConfig, Metric};
use crate::error::FuzzyError;
use crate::index::TagId;
use crate::snapshot::Snapshot;

/// Scores the query against every normalized name of the pinned snapshot.
///
/// With the `parallel` feature, catalogues of at least `parallel_threshold`
/// names are scanned with rayon.
#[derive(Debug, Clone)]
pub struct ScanSimilarity {
    metric: Metric,
    parallel_threshold: usize,
}

impl Default for ScanSimilarity {
    fn default() -> Self {
        Self::from_config(&FuzzyConfig::default())
    }
}

impl ScanSimilarity {
    pub fn new(metric: Metric) -> Self {
        Self {
            metric,
            ..Self::default()
        }
    }

    pub fn from_config(config: &FuzzyConfig) -> Self {
        Self {
            metric: config.metric,
            parallel_threshold: config.parallel_threshold,
        }
    }

    /// Parallel on native with the `parallel` feature, sequential otherwise
    #[cfg(feature = "parallel")]
    fn scan(&self, query: &str, snapshot: &Snapshot, min_score: f64) -> Vec<(TagId, f64)> {
        if snapshot.total_tags() >= self.parallel_threshold {
            let names: Vec<(TagId, &str)> = snapshot.iter_normalized().collect();
            names
                .par_iter()
                .filter_map(|&(id, name)| self.score_single(query, id, name, min_score))
                .collect()
        } else {
            self.scan_sequential(query, snapshot, min_score)
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn scan(&self, query: &str, snapshot: &Snapshot, min_score: f64) -> Vec<(TagId, f64)> {
        self.scan_sequential(query, snapshot, min_score)
    }

    fn scan_sequential(
        &self,
        query: &str,
        snapshot: &Snapshot,
        min_score: f64,
    ) -> Vec<(TagId, f64)> {
        snapshot
            .iter_normalized()
            .filter_map(|(id, name)| self.score_single(query, id, name, min_score))
            .collect()
    }

    #[inline]
    fn score_single(&self, query: &str, id: TagId, name: &str, min_score: f64) -> Option<(TagId, f64)> {
        let score = strategies::score(self.metric, query, name);
        (score >= min_score).then_some((id, score))
    }
}

impl SimilaritySource for ScanSimilarity {
    fn name(&self) -> &str {
        "scan"
    }

    fn candidates(
        &self,
        query: &str,
        snapshot: &Snapshot,
        limit: usize,
        min_score: f64,
    ) -> Result<Vec<ScoredName>, FuzzyError> {
        if query.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let mut hits = self.scan(query, snapshot, min_score);

        // Score descending, then popularity
        let popularity = snapshot.popularity();
        hits.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| popularity.position(a.0).cmp(&popularity.position(b.0)))
        });
        hits.truncate(limit);

        Ok(hits
            .into_iter()
            .map(|(id, score)| ScoredName::new(snapshot.name(id), score))
            .collect())
    }
}
