//! Snapshot builder
//!
//! Streams through a record source once. Excluded categories are dropped
//! before anything is indexed; every retained record goes into the exact,
//! alias, prefix and word indexes and the popularity accumulator, which is
//! sorted once at the end.
//!
//! A record whose normalized name is already indexed replaces the earlier
//! record: it takes over its id, count and category, and the aliases the
//! earlier record still owned are dropped. Catalogues loaded from several
//! files therefore merge, later files winning.

use std::hash::{Hash, Hasher};
use std::time::Instant;

use ahash::AHasher;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::{BuildError, SourceResult};
use crate::index::{AliasIndex, ExactIndex, PopularityOrder, PrefixTrie, TagId, WordIndex};
use crate::normalize::normalize;
use crate::record::{CategorySet, TagRecord};
use crate::snapshot::{Snapshot, SnapshotMeta};
use crate::source::RecordSource;

/// Builds [`Snapshot`]s with a fixed category filter and token threshold.
#[derive(Debug, Clone)]
pub struct IndexBuilder {
    excluded: CategorySet,
    min_token_len: usize,
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl IndexBuilder {
    pub fn new(excluded: CategorySet, min_token_len: usize) -> Self {
        Self {
            excluded,
            min_token_len,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.excluded_categories.clone(), config.min_token_len)
    }

    /// Open `source` and build from its stream.
    pub fn build_from_source<S>(&self, source: &mut S) -> Result<Snapshot, BuildError>
    where
        S: RecordSource + ?Sized,
    {
        let stream = source.records()?;
        self.build(stream)
    }

    /// Build a snapshot from a record stream.
    ///
    /// The first failing item aborts the build and is returned as
    /// [`BuildError::Source`].
    pub fn build<I>(&self, records: I) -> Result<Snapshot, BuildError>
    where
        I: IntoIterator<Item = SourceResult<TagRecord>>,
    {
        let start = Instant::now();

        let mut kept: Vec<TagRecord> = Vec::new();
        let mut normalized: Vec<String> = Vec::new();
        let mut counts: Vec<u64> = Vec::new();
        let mut exact = ExactIndex::new();
        let mut aliases = AliasIndex::new();
        let mut prefix = PrefixTrie::new();
        let mut words = WordIndex::new(self.min_token_len);
        let mut hasher = AHasher::default();
        let mut skipped = 0usize;
        let mut collisions = 0usize;
        let mut redefined = 0usize;

        for (position, record) in records.into_iter().enumerate() {
            let record = record?;

            if self.excluded.contains(record.category) {
                skipped += 1;
                continue;
            }

            let key = normalize(&record.canonical_name);
            if key.is_empty() {
                return Err(BuildError::InvalidRecord {
                    position,
                    reason: format!("empty canonical name {:?}", record.canonical_name),
                });
            }

            let existing = exact.lookup(&key);
            let id = match existing {
                Some(id) => {
                    redefined += 1;
                    debug!(
                        tag = %key,
                        previous = %kept[id as usize].canonical_name,
                        position,
                        "Tag redefined by later record"
                    );
                    for alias in &kept[id as usize].aliases {
                        aliases.remove_if_owned(&normalize(alias), id);
                    }
                    id
                }
                None => {
                    let id = TagId::try_from(kept.len()).map_err(|_| BuildError::InvalidRecord {
                        position,
                        reason: "catalogue exceeds tag id space".to_string(),
                    })?;
                    exact.insert(key.clone(), id);
                    prefix.insert(&key, id);
                    words.insert(&key, id);
                    id
                }
            };

            for alias in &record.aliases {
                let alias_key = normalize(alias);
                if alias_key.is_empty() {
                    continue;
                }
                if let Some(previous) = aliases.insert(alias_key, id) {
                    if previous != id {
                        collisions += 1;
                        debug!(
                            alias = %alias,
                            previous = %kept[previous as usize].canonical_name,
                            winner = %record.canonical_name,
                            "Alias reassigned to later tag"
                        );
                    }
                }
            }

            key.hash(&mut hasher);
            record.usage_count.hash(&mut hasher);
            record.aliases.hash(&mut hasher);

            if existing.is_some() {
                counts[id as usize] = record.usage_count;
                kept[id as usize] = record;
            } else {
                counts.push(record.usage_count);
                normalized.push(key);
                kept.push(record);
            }
        }

        let popularity = PopularityOrder::from_counts(&counts);
        let build_time_ms = start.elapsed().as_millis() as u64;

        let snapshot = Snapshot {
            records: kept,
            normalized,
            exact,
            aliases,
            prefix,
            words,
            popularity,
            meta: SnapshotMeta {
                generation: 0,
                fingerprint: format!("{:016x}", hasher.finish()),
                build_time_ms,
            },
        };

        info!(
            total_tags = snapshot.total_tags(),
            total_aliases = snapshot.total_aliases(),
            excluded = skipped,
            alias_collisions = collisions,
            redefined,
            build_time_ms,
            "Snapshot built"
        );

        Ok(snapshot)
    }
}
