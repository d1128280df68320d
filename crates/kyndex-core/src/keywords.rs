//! Pure tokenization helpers.
//!
//! Shared by the index coordinator (word extraction with occurrence counts)
//! and the query engine (keyword parsing). All functions are pure; the
//! normalization rules here are the single source of truth, so a token
//! produced at index time and a keyword parsed at query time always agree
//! on form.

use std::collections::BTreeMap;

/// Minimum token length for primary text.
pub const MIN_WORD_LENGTH: usize = 3;

/// Normalize a single dictionary word: trim and lowercase.
///
/// # Examples
///
/// ```
/// use kyndex_core::keywords::normalize_word;
///
/// assert_eq!(normalize_word("Report"), "report");
/// assert_eq!(normalize_word("  BUDGET  "), "budget");
/// ```
pub fn normalize_word(word: &str) -> String {
    word.trim().to_lowercase()
}

/// Lowercase `text` and split it on non-alphanumeric boundaries, dropping
/// tokens shorter than `min_len` characters.
///
/// # Examples
///
/// ```
/// use kyndex_core::keywords::tokenize;
///
/// assert_eq!(tokenize("The Quarterly Budget!", 3), vec!["the", "quarterly", "budget"]);
/// assert_eq!(tokenize("a b see", 3), vec!["see"]);
/// ```
pub fn tokenize(text: &str, min_len: usize) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty() && token.chars().count() >= min_len)
        .map(str::to_string)
        .collect()
}

/// Parse a free-text keyword string into distinct query keywords,
/// preserving first-occurrence order.
///
/// # Examples
///
/// ```
/// use kyndex_core::keywords::keywords;
///
/// assert_eq!(keywords("budget report budget"), vec!["budget", "report"]);
/// assert!(keywords("").is_empty());
/// ```
pub fn keywords(text: &str) -> Vec<String> {
    keywords_with(text, MIN_WORD_LENGTH)
}

/// Like [`keywords`] with a custom minimum token length.
pub fn keywords_with(text: &str, min_len: usize) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tokenize(text, min_len)
        .into_iter()
        .filter(|token| seen.insert(token.clone()))
        .collect()
}

/// Fold the tokens of `text` into occurrence counts, ordered by word.
pub fn word_counts(text: &str, min_len: usize) -> BTreeMap<String, u32> {
    let mut counts = BTreeMap::new();
    for token in tokenize(text, min_len) {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

// ============================================================================
// Tests
// ============================================================================
