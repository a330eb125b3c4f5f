use std::cmp::Reverse;

use super::TagId;

/// Tags sorted by usage count descending, ties in build order.
///
/// The single ranking oracle for every strategy whose raw result is an
/// unordered set. Ranking a candidate set yields the same list as scanning
/// the order from the top and keeping members of the set until `limit` is
/// reached; it is computed from each tag's position instead of a full scan.
#[derive(Debug, Default)]
pub struct PopularityOrder {
    order: Vec<TagId>,
    position: Vec<u32>,
}

impl PopularityOrder {
    /// Build from usage counts indexed by [`TagId`].
    pub fn from_counts(counts: &[u64]) -> Self {
        let mut order: Vec<TagId> = (0..counts.len() as TagId).collect();
        // Stable sort keeps build order among equal counts.
        order.sort_by_key(|&id| Reverse(counts[id as usize]));

        let mut position = vec![0u32; counts.len()];
        for (pos, &id) in order.iter().enumerate() {
            position[id as usize] = pos as u32;
        }

        Self { order, position }
    }

    /// Rank position of a tag, 0 being the most used.
    #[inline]
    pub fn position(&self, id: TagId) -> u32 {
        self.position[id as usize]
    }

    /// Top `limit` members of `candidates` in popularity order.
    ///
    /// `candidates` must not contain duplicates.
    pub fn rank(&self, mut candidates: Vec<TagId>, limit: usize) -> Vec<TagId> {
        if limit == 0 || candidates.is_empty() {
            return Vec::new();
        }
        if candidates.len() > limit {
            candidates.select_nth_unstable_by_key(limit - 1, |&id| self.position(id));
            candidates.truncate(limit);
        }
        candidates.sort_unstable_by_key(|&id| self.position(id));
        candidates
    }

    /// All tags, most used first.
    pub fn iter(&self) -> impl Iterator<Item = TagId> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_descending_with_stable_ties() {
        let order = PopularityOrder::from_counts(&[10, 50, 10, 100, 50]);
        let ids: Vec<TagId> = order.iter().collect();
        assert_eq!(ids, vec![3, 1, 4, 0, 2]);
        assert_eq!(order.position(3), 0);
        assert_eq!(order.position(2), 4);
    }

    #[test]
    fn test_rank_matches_scan() {
        let counts = [5, 9, 1, 9, 7, 0, 3];
        let order = PopularityOrder::from_counts(&counts);
        let candidates = vec![6, 0, 3, 2, 1];

        for limit in 1..=6 {
            let scanned: Vec<TagId> = order
                .iter()
                .filter(|id| candidates.contains(id))
                .take(limit)
                .collect();
            assert_eq!(order.rank(candidates.clone(), limit), scanned);
        }
    }

    #[test]
    fn test_rank_edge_cases() {
        let order = PopularityOrder::from_counts(&[1, 2]);
        assert!(order.rank(vec![0, 1], 0).is_empty());
        assert!(order.rank(Vec::new(), 3).is_empty());
        assert_eq!(order.rank(vec![0, 1], 10), vec![1, 0]);
    }
}
