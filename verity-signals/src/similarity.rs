//! Token-set fuzzy similarity between listing titles.
//!
//! The measure is order- and duplicate-insensitive: both strings are
//! reduced to lowercase word sets and compared by overlap. When one
//! title's tokens are a subset of the other's (the common case of a
//! short query against a long marketplace title) the ratio is 1.0.

use std::collections::BTreeSet;

/// Split a string into its lowercase word set. Non-alphanumeric
/// characters are separators, so "Nike-Air Max, 90" and "nike air max 90"
/// tokenize identically.
pub fn tokenize(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

/// Compute the token-set ratio between two strings, in [0, 1].
///
/// With `i` shared tokens and `da`/`db` tokens unique to each side, the
/// ratio is `max(2i / (2i + da), 2i / (2i + db))`: the intersection
/// measured against the closer of the two word sets dominates.
/// Properties:
///
/// - identical token sets score 1.0
/// - a subset relation scores 1.0
/// - no shared tokens (or either side empty) scores 0.0
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let set_a = tokenize(a);
    let set_b = tokenize(b);

    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }

    let common = set_a.intersection(&set_b).count() as f64;
    if common == 0.0 {
        return 0.0;
    }

    let only_a = (set_a.len() as f64) - common;
    let only_b = (set_b.len() as f64) - common;

    let ratio_a = 2.0 * common / (2.0 * common + only_a);
    let ratio_b = 2.0 * common / (2.0 * common + only_b);

    // Clamp to guard floating-point rounding at the top of the range.
    ratio_a.max(ratio_b).clamp(0.0, 1.0)
}
