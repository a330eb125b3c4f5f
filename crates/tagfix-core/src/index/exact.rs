use ahash::AHashMap;

use super::TagId;

/// Hash lookup from normalized canonical name to tag.
#[derive(Debug, Default)]
pub struct ExactIndex {
    by_name: AHashMap<String, TagId>,
}

impl ExactIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key. Returns the tag already holding it, leaving it in place.
    pub fn insert(&mut self, normalized: String, id: TagId) -> Option<TagId> {
        match self.by_name.get(&normalized) {
            Some(&existing) => Some(existing),
            None => {
                self.by_name.insert(normalized, id);
                None
            }
        }
    }

    #[inline]
    pub fn lookup(&self, normalized: &str) -> Option<TagId> {
        self.by_name.get(normalized).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
