use ahash::AHashMap;

use super::TagId;

/// Hash lookup from normalized alias to the tag that owns it.
///
/// When two tags claim the same alias, the tag inserted later wins. The
/// builder inserts in record-stream order, so the winner is the last claimant
/// in the stream.
#[derive(Debug, Default)]
pub struct AliasIndex {
    by_alias: AHashMap<String, TagId>,
}

impl AliasIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `normalized` to `id`, returning the tag it previously pointed at.
    pub fn insert(&mut self, normalized: String, id: TagId) -> Option<TagId> {
        self.by_alias.insert(normalized, id)
    }

    /// Remove `normalized` if it still points at `id`.
    pub fn remove_if_owned(&mut self, normalized: &str, id: TagId) -> bool {
        if self.lookup(normalized) == Some(id) {
            self.by_alias.remove(normalized);
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn lookup(&self, normalized: &str) -> Option<TagId> {
        self.by_alias.get(normalized).copied()
    }

    /// Number of distinct alias keys.
    pub fn len(&self) -> usize {
        self.by_alias.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_alias.is_empty()
    }
}
