//! Strategy pipeline and combiner
//!
//! Strategies run in a fixed priority order against one pinned snapshot:
//!
//! 1. Exact (short-circuits: the result is that single tag)
//! 2. Alias (at most one candidate)
//! 3. Prefix, popularity-ranked
//! 4. Word intersection, popularity-ranked
//! 5. Fuzzy fallback, when enabled and a similarity source is present
//!
//! The combiner concatenates strategy outputs in that order, drops any tag
//! already accumulated, and stops as soon as `limit` tags are held. Order
//! across strategies is priority order; order within one strategy is the
//! strategy's own ranking. Once the list is full, later strategies are not
//! run at all.

use ahash::AHashSet;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::config::FuzzyConfig;
use crate::fuzzy::SimilaritySource;
use crate::index::TagId;
use crate::normalize::normalize;
use crate::snapshot::Snapshot;

/// Lookup method that produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Exact,
    Alias,
    Prefix,
    Word,
    Fuzzy,
}

/// A combined result entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub id: TagId,
    pub strategy: Strategy,
}

/// Fuzzy stage inputs, present only when the caller enabled the fallback.
pub struct FuzzyStage<'a> {
    pub source: &'a dyn SimilaritySource,
    pub config: &'a FuzzyConfig,
}

/// Accumulates strategy outputs with global dedup and a hard length bound.
#[derive(Debug)]
pub struct Combiner {
    limit: usize,
    seen: AHashSet<TagId>,
    out: Vec<Candidate>,
}

impl Combiner {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            seen: AHashSet::with_capacity(limit),
            out: Vec::with_capacity(limit),
        }
    }

    /// Append one strategy's ranked output. Returns how many were taken.
    pub fn extend<I>(&mut self, strategy: Strategy, ranked: I) -> usize
    where
        I: IntoIterator<Item = TagId>,
    {
        let before = self.out.len();
        for id in ranked {
            if self.is_full() {
                break;
            }
            if self.seen.insert(id) {
                self.out.push(Candidate { id, strategy });
            }
        }
        self.out.len() - before
    }

    pub fn is_full(&self) -> bool {
        self.out.len() >= self.limit
    }

    /// Room left before the limit.
    pub fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.out.len())
    }

    pub fn finish(self) -> Vec<Candidate> {
        self.out
    }
}

/// Run every strategy for an already normalized, non-empty query.
pub fn run(
    snapshot: &Snapshot,
    normalized: &str,
    limit: usize,
    fuzzy: Option<FuzzyStage<'_>>,
) -> Vec<Candidate> {
    if normalized.is_empty() || limit == 0 {
        return Vec::new();
    }

    if let Some(id) = snapshot.lookup_exact(normalized) {
        trace!(query = normalized, "Exact hit");
        return vec![Candidate {
            id,
            strategy: Strategy::Exact,
        }];
    }

    let mut combiner = Combiner::new(limit);

    if let Some(id) = snapshot.lookup_alias(normalized) {
        trace!(query = normalized, tag = snapshot.name(id), "Alias hit");
        combiner.extend(Strategy::Alias, [id]);
    }

    if !combiner.is_full() {
        let ranked = snapshot.rank(snapshot.prefix_matches(normalized), limit);
        let taken = combiner.extend(Strategy::Prefix, ranked);
        debug!(query = normalized, taken, "Prefix strategy");
    }

    if !combiner.is_full() {
        let ranked = snapshot.rank(snapshot.word_matches(normalized), limit);
        let taken = combiner.extend(Strategy::Word, ranked);
        debug!(query = normalized, taken, "Word strategy");
    }

    if let Some(stage) = fuzzy {
        if !combiner.is_full() {
            let ranked = fuzzy_candidates(snapshot, normalized, limit, &stage);
            let taken = combiner.extend(Strategy::Fuzzy, ranked);
            debug!(query = normalized, provider = stage.source.name(), taken, "Fuzzy strategy");
        }
    }

    combiner.finish()
}

/// Resolve, filter and rank what a similarity source proposes.
fn fuzzy_candidates(
    snapshot: &Snapshot,
    normalized: &str,
    limit: usize,
    stage: &FuzzyStage<'_>,
) -> Vec<TagId> {
    let min_score = stage.config.min_score;
    let proposed = match stage.source.candidates(normalized, snapshot, limit, min_score) {
        Ok(proposed) => proposed,
        Err(e) => {
            warn!(query = normalized, error = %e, "Fuzzy fallback failed");
            return Vec::new();
        }
    };

    // Best score per indexed tag; unknown names are dropped.
    let mut scored: Vec<(TagId, f64)> = Vec::with_capacity(proposed.len());
    for hit in proposed {
        if hit.score.is_nan() || hit.score < min_score {
            continue;
        }
        let Some(id) = snapshot.lookup_exact(&normalize(&hit.name)) else {
            trace!(name = %hit.name, "Fuzzy candidate not in snapshot");
            continue;
        };
        match scored.iter_mut().find(|(existing, _)| *existing == id) {
            Some(entry) => entry.1 = entry.1.max(hit.score),
            None => scored.push((id, hit.score)),
        }
    }

    let popularity = snapshot.popularity();
    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| popularity.position(a.0).cmp(&popularity.position(b.0)))
    });
    scored.truncate(limit);
    scored.into_iter().map(|(id, _)| id).collect()
}
