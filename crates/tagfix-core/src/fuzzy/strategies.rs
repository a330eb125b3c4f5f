//! Similarity metrics for the fuzzy fallback
//!
//! Every metric returns a similarity in `0.0..=1.0`, 1.0 meaning identical.

use strsim::{jaro_winkler, normalized_levenshtein, sorensen_dice};

use crate::config::Metric;

/// Normalized Levenshtein similarity: `1 - distance / max_len`.
#[inline]
pub fn levenshtein_similarity(query: &str, item: &str) -> f64 {
    normalized_levenshtein(query, item)
}

/// Jaro-Winkler similarity, favouring shared prefixes.
#[inline]
pub fn jaro_winkler_similarity(query: &str, item: &str) -> f64 {
    jaro_winkler(query, item)
}

/// Sørensen-Dice coefficient over character bigrams.
#[inline]
pub fn dice_similarity(query: &str, item: &str) -> f64 {
    sorensen_dice(query, item)
}

/// Indel similarity: `1 - indel_distance / (len_a + len_b)`.
///
/// Insertions and deletions only, so this equals
/// `2 * lcs / (len_a + len_b)` over chars. Two empty strings score 1.0.
pub fn indel_similarity(query: &str, item: &str) -> f64 {
    let a: Vec<char> = query.chars().collect();
    let b: Vec<char> = item.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    // Longest common subsequence, one rolling row
    let mut row = vec![0usize; b.len() + 1];
    for &ca in &a {
        let mut diagonal = 0;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diagonal + 1
            } else {
                above.max(row[j])
            };
            diagonal = above;
        }
    }
    let lcs = row[b.len()];

    (2 * lcs) as f64 / total as f64
}

/// Score `item` against `query` with the configured metric.
pub fn score(metric: Metric, query: &str, item: &str) -> f64 {
    if query == item {
        return 1.0;
    }
    match metric {
        Metric::Levenshtein => levenshtein_similarity(query, item),
        Metric::JaroWinkler => jaro_winkler_similarity(query, item),
        Metric::Dice => dice_similarity(query, item),
        Metric::Indel => indel_similarity(query, item),
    }
}
