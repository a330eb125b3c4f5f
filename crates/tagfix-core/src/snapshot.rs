//! Immutable index snapshot
//!
//! A snapshot bundles every index built from one pass over a record stream.
//! It is never mutated after publication; a reload builds a new one.

use serde::Serialize;

use crate::index::{AliasIndex, ExactIndex, PopularityOrder, PrefixTrie, TagId, WordIndex};
use crate::normalize::tokens;
use crate::record::TagRecord;

/// One generation of the catalogue, fully indexed.
#[derive(Debug)]
pub struct Snapshot {
    pub(crate) records: Vec<TagRecord>,
    /// Normalized canonical names, indexed by [`TagId`].
    pub(crate) normalized: Vec<String>,
    pub(crate) exact: ExactIndex,
    pub(crate) aliases: AliasIndex,
    pub(crate) prefix: PrefixTrie,
    pub(crate) words: WordIndex,
    pub(crate) popularity: PopularityOrder,
    pub(crate) meta: SnapshotMeta,
}

/// Build metadata attached to a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SnapshotMeta {
    /// Publication number within the owning engine, starting at 1
    pub generation: u64,
    /// Hash of names, counts and aliases in build order
    pub fingerprint: String,
    pub build_time_ms: u64,
}

impl Snapshot {
    /// Canonical name of a tag.
    #[inline]
    pub fn name(&self, id: TagId) -> &str {
        &self.records[id as usize].canonical_name
    }

    /// Normalized canonical name of a tag.
    pub fn normalized_name(&self, id: TagId) -> &str {
        &self.normalized[id as usize]
    }

    /// Exact lookup by normalized name.
    pub fn lookup_exact(&self, normalized: &str) -> Option<TagId> {
        self.exact.lookup(normalized)
    }

    /// Alias lookup by normalized alias.
    pub fn lookup_alias(&self, normalized: &str) -> Option<TagId> {
        self.aliases.lookup(normalized)
    }

    /// Tags whose normalized name starts with `normalized`, unordered.
    pub fn prefix_matches(&self, normalized: &str) -> Vec<TagId> {
        self.prefix.matches_with_prefix(normalized)
    }

    /// Tags containing every token of `normalized`, unordered.
    pub fn word_matches(&self, normalized: &str) -> Vec<TagId> {
        self.words.lookup_all(tokens(normalized))
    }

    /// Popularity-rank a candidate set.
    pub fn rank(&self, candidates: Vec<TagId>, limit: usize) -> Vec<TagId> {
        self.popularity.rank(candidates, limit)
    }

    pub fn popularity(&self) -> &PopularityOrder {
        &self.popularity
    }

    /// `(id, normalized name)` for every indexed tag, in build order.
    pub fn iter_normalized(&self) -> impl Iterator<Item = (TagId, &str)> + '_ {
        self.normalized
            .iter()
            .enumerate()
            .map(|(id, name)| (id as TagId, name.as_str()))
    }

    pub fn total_tags(&self) -> usize {
        self.records.len()
    }

    /// Distinct normalized alias keys.
    pub fn total_aliases(&self) -> usize {
        self.aliases.len()
    }

    pub fn trie_size(&self) -> usize {
        self.prefix.len()
    }

    /// Distinct indexed tokens.
    pub fn word_index_size(&self) -> usize {
        self.words.len()
    }

    pub fn meta(&self) -> &SnapshotMeta {
        &self.meta
    }

    pub(crate) fn set_generation(&mut self, generation: u64) {
        self.meta.generation = generation;
    }
}
