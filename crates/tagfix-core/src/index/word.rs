use ahash::AHashMap;

use super::TagId;
use crate::normalize::tokens;

/// Inverted index from token to the tags whose normalized name contains it.
///
/// Tokens shorter than `min_token_len` characters are never indexed. Posting
/// lists stay sorted because tags are inserted in increasing id order.
#[derive(Debug)]
pub struct WordIndex {
    postings: AHashMap<String, Vec<TagId>>,
    min_token_len: usize,
}

impl WordIndex {
    pub fn new(min_token_len: usize) -> Self {
        Self {
            postings: AHashMap::new(),
            min_token_len,
        }
    }

    /// Index every qualifying token of a normalized name.
    pub fn insert(&mut self, normalized: &str, id: TagId) {
        for token in tokens(normalized) {
            if token.chars().count() < self.min_token_len {
                continue;
            }
            let posting = self.postings.entry(token.to_string()).or_default();
            if posting.last() != Some(&id) {
                debug_assert!(posting.last().map_or(true, |&last| last < id));
                posting.push(id);
            }
        }
    }

    /// Tags containing every token, unordered.
    ///
    /// Empty when no tokens are given or when any token is absent from the
    /// index, which includes every token below the length threshold.
    pub fn lookup_all<'q, I>(&self, query_tokens: I) -> Vec<TagId>
    where
        I: IntoIterator<Item = &'q str>,
    {
        let mut lists: Vec<&[TagId]> = Vec::new();
        for token in query_tokens {
            match self.postings.get(token) {
                Some(posting) => lists.push(posting),
                None => return Vec::new(),
            }
        }
        if lists.is_empty() {
            return Vec::new();
        }

        lists.sort_by_key(|list| list.len());
        let (smallest, rest) = lists.split_at(1);
        smallest[0]
            .iter()
            .copied()
            .filter(|id| rest.iter().all(|list| list.binary_search(id).is_ok()))
            .collect()
    }

    /// Posting list for one token.
    pub fn posting(&self, token: &str) -> &[TagId] {
        self.postings.get(token).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct indexed tokens.
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn index() -> WordIndex {
        let mut index = WordIndex::new(3);
        index.insert("blonde hair", 0);
        index.insert("blonde eyes", 1);
        index.insert("long hair", 2);
        index.insert("a hair ok", 3);
        index
    }

    #[test]
    fn test_intersection() {
        let index = index();
        assert_eq!(index.lookup_all(["hair", "blonde"]), vec![0]);
        let mut hair = index.lookup_all(["hair"]);
        hair.sort();
        assert_eq!(hair, vec![0, 2, 3]);
    }

    #[test]
    fn test_short_tokens_not_indexed() {
        let index = index();
        assert!(index.posting("a").is_empty());
        assert!(index.posting("ok").is_empty());
        assert!(index.lookup_all(["ok"]).is_empty());
        assert!(index.lookup_all(["hair", "ok"]).is_empty());
    }

    #[test]
    fn test_missing_token_empties_result() {
        let index = index();
        assert!(index.lookup_all(["blonde", "red"]).is_empty());
    }

    #[test]
    fn test_no_tokens() {
        let index = index();
        assert!(index.lookup_all(std::iter::empty()).is_empty());
    }

    #[test]
    fn test_repeated_token_indexed_once() {
        let mut index = WordIndex::new(3);
        index.insert("hair hair", 5);
        assert_eq!(index.posting("hair"), &[5]);
        assert_eq!(index.len(), 1);
    }
}
