//! Query-side stopword filtering.
//!
//! Filters common words from the parsed keyword list before prefix
//! matching. Filtering is query-side only: the index keeps its full word
//! set, so tuning this filter never requires a re-crawl.
//!
//! The filter composes three sources:
//!
//! - the English list from the `stop-words` crate (~500 words)
//! - custom stopwords from [`IndexConfig::custom_stopwords`]
//! - an allowlist of words to preserve (case-sensitive, for terms that
//!   look like stopwords but carry meaning in a site's domain)
//!
//! A keyword list that would filter down to nothing falls back to the
//! unfiltered list, so a query of pure stopwords still searches literally.

use std::collections::HashSet;

use kyndex_core::IndexConfig;
use stop_words::{get, LANGUAGE};

/// Stopword filter for keyword preprocessing.
pub struct StopwordFilter {
    stopwords: HashSet<String>,
    allowlist: HashSet<String>,
    enabled: bool,
}

impl StopwordFilter {
    /// Create a filter from configuration.
    pub fn new(config: &IndexConfig) -> Self {
        let mut stopwords: HashSet<String> = get(LANGUAGE::English)
            .iter()
            .map(|s| s.to_lowercase())
            .collect();

        for word in &config.custom_stopwords {
            stopwords.insert(word.to_lowercase());
        }

        let allowlist: HashSet<String> = config.allowlist.iter().cloned().collect();

        Self {
            stopwords,
            allowlist,
            enabled: config.stopwords_enabled,
        }
    }

    /// Create a disabled filter (passes all keywords through).
    pub fn disabled() -> Self {
        Self {
            stopwords: HashSet::new(),
            allowlist: HashSet::new(),
            enabled: false,
        }
    }

    /// Filter stopwords out of a keyword list.
    ///
    /// Returns the input unchanged when filtering is disabled or when every
    /// keyword would be filtered away.
    pub fn filter_keywords(&self, keywords: Vec<String>) -> Vec<String> {
        if !self.enabled {
            return keywords;
        }

        let filtered: Vec<String> = keywords
            .iter()
            .filter(|word| !self.is_stopword(word))
            .cloned()
            .collect();

        if filtered.is_empty() {
            keywords
        } else {
            filtered
        }
    }

    /// Check if a word is a stopword.
    ///
    /// The allowlist is consulted first with a case-sensitive match; the
    /// stopword check itself is case-insensitive.
    pub fn is_stopword(&self, word: &str) -> bool {
        if self.allowlist.contains(word) {
            return false;
        }
        self.stopwords.contains(&word.to_lowercase())
    }

    /// Number of stopwords in the filter.
    pub fn stopword_count(&self) -> usize {
        self.stopwords.len()
    }

    /// Whether filtering is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl std::fmt::Debug for StopwordFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StopwordFilter")
            .field("enabled", &self.enabled)
            .field("stopword_count", &self.stopwords.len())
            .field("allowlist_count", &self.allowlist.len())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
