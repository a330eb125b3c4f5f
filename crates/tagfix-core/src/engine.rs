//! TagEngine - query entry point and snapshot publication
//!
//! The engine owns exactly one published snapshot reference. Every search
//! pins the snapshot current at its start and runs against it to completion;
//! a reload builds its replacement off to the side and publishes it with a
//! single atomic swap. Readers never take a lock. Superseded snapshots are
//! freed when the last search holding them finishes.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::builder::IndexBuilder;
use crate::config::EngineConfig;
use crate::error::BuildError;
use crate::fuzzy::SimilaritySource;
use crate::normalize::normalize;
use crate::pipeline::{self, FuzzyStage, Strategy};
use crate::record::TagRecord;
use crate::snapshot::Snapshot;
use crate::source::{MemorySource, RecordSource};

/// Per-query switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Run the fuzzy fallback when the engine has a similarity source
    #[serde(default)]
    pub use_fuzzy_fallback: bool,
}

/// A result entry with the strategy that contributed it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedCandidate {
    pub name: String,
    pub strategy: Strategy,
}

/// Outcome of a successful reload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReloadSummary {
    pub total_tags: usize,
    pub total_aliases: usize,
    pub generation: u64,
    pub fingerprint: String,
    pub build_time_ms: u64,
}

/// Engine statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    pub loaded: bool,
    pub total_tags: usize,
    pub total_aliases: usize,
    pub trie_size: usize,
    pub word_index_size: usize,
    pub generation: u64,
    pub fingerprint: String,
    pub build_time_ms: u64,
}

/// Thread-safe tag correction engine.
///
/// Share it behind an `Arc`; `search`, `reload` and `stats` all take `&self`.
pub struct TagEngine {
    current: ArcSwapOption<Snapshot>,
    config: EngineConfig,
    builder: IndexBuilder,
    similarity: Option<Arc<dyn SimilaritySource>>,
    // Serializes reloads; holds the last published generation.
    publish: Mutex<u64>,
}

impl Default for TagEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl TagEngine {
    /// Create an unloaded engine.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            current: ArcSwapOption::empty(),
            builder: IndexBuilder::from_config(&config),
            config,
            similarity: None,
            publish: Mutex::new(0),
        }
    }

    /// Attach the similarity source used by the fuzzy fallback.
    pub fn with_similarity(mut self, source: Arc<dyn SimilaritySource>) -> Self {
        self.similarity = Some(source);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Ranked canonical names for a raw query.
    ///
    /// `limit` is clamped into `1..=max_limit`. Returns an empty list for a
    /// query that normalizes to nothing or when no snapshot is loaded yet.
    pub fn search(&self, raw_query: &str, limit: usize, options: &SearchOptions) -> Vec<String> {
        self.search_ranked(raw_query, limit, options)
            .into_iter()
            .map(|c| c.name)
            .collect()
    }

    /// Like [`TagEngine::search`], reporting which strategy produced each name.
    pub fn search_ranked(
        &self,
        raw_query: &str,
        limit: usize,
        options: &SearchOptions,
    ) -> Vec<RankedCandidate> {
        let Some(snapshot) = self.current.load_full() else {
            warn!("Search engine not loaded");
            return Vec::new();
        };

        let normalized = normalize(raw_query);
        if normalized.is_empty() {
            return Vec::new();
        }
        let limit = self.config.clamp_limit(limit);

        let fuzzy = match (&self.similarity, options.use_fuzzy_fallback) {
            (Some(source), true) => Some(FuzzyStage {
                source: source.as_ref(),
                config: &self.config.fuzzy,
            }),
            _ => None,
        };

        pipeline::run(&snapshot, &normalized, limit, fuzzy)
            .into_iter()
            .map(|c| RankedCandidate {
                name: snapshot.name(c.id).to_string(),
                strategy: c.strategy,
            })
            .collect()
    }

    /// Rebuild from `source` and publish the result.
    ///
    /// On failure the published snapshot is left untouched and keeps serving.
    pub fn reload<S>(&self, source: &mut S) -> Result<ReloadSummary, BuildError>
    where
        S: RecordSource + ?Sized,
    {
        let mut last_generation = self.publish.lock();

        let mut snapshot = match self.builder.build_from_source(source) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, generation = *last_generation, "Reload failed, keeping current snapshot");
                return Err(e);
            }
        };

        let generation = *last_generation + 1;
        snapshot.set_generation(generation);

        let summary = ReloadSummary {
            total_tags: snapshot.total_tags(),
            total_aliases: snapshot.total_aliases(),
            generation,
            fingerprint: snapshot.meta().fingerprint.clone(),
            build_time_ms: snapshot.meta().build_time_ms,
        };

        self.current.store(Some(Arc::new(snapshot)));
        *last_generation = generation;

        info!(
            generation,
            total_tags = summary.total_tags,
            total_aliases = summary.total_aliases,
            fingerprint = %summary.fingerprint,
            "Snapshot published"
        );

        Ok(summary)
    }

    /// Reload from records already in memory.
    pub fn load(&self, records: Vec<TagRecord>) -> Result<ReloadSummary, BuildError> {
        self.reload(&mut MemorySource::new(records))
    }

    /// Pin the current snapshot, if any.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.current.load_full()
    }

    pub fn is_loaded(&self) -> bool {
        self.current.load().is_some()
    }

    pub fn stats(&self) -> EngineStats {
        match self.current.load_full() {
            Some(snapshot) => EngineStats {
                loaded: true,
                total_tags: snapshot.total_tags(),
                total_aliases: snapshot.total_aliases(),
                trie_size: snapshot.trie_size(),
                word_index_size: snapshot.word_index_size(),
                generation: snapshot.meta().generation,
                fingerprint: snapshot.meta().fingerprint.clone(),
                build_time_ms: snapshot.meta().build_time_ms,
            },
            None => EngineStats::default(),
        }
    }
}
