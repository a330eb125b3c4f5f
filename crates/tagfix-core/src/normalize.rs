//! Query and name normalization
//!
//! Every index key and every query goes through [`normalize`], so a lookup
//! only ever compares canonical forms.

/// Canonical form of a tag name or query.
///
/// Lowercases, turns `_` into spaces, collapses whitespace runs to a single
/// space and trims both ends. Total and idempotent.
pub fn normalize(raw: &str) -> String {
    let lowered = raw.to_lowercase().replace('_', " ");

    let mut out = String::with_capacity(lowered.len());
    for word in lowered.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Split a normalized string into whitespace-separated tokens.
#[inline]
pub fn tokens(normalized: &str) -> impl Iterator<Item = &str> {
    normalized.split(' ').filter(|t| !t.is_empty())
}
