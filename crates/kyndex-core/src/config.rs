//! Indexing and query configuration.
//!
//! One config type serves both halves of the engine: the coordinator reads
//! the token-length settings at index time, the query engine reads the
//! stopword settings at query time. Keeping stopword filtering query-side
//! means tuning the filter never requires a re-crawl.

use serde::{Deserialize, Serialize};

/// Configuration for indexing and querying.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Minimum token length for primary text (title, description, body).
    #[serde(default = "default_min_word_length")]
    pub min_word_length: usize,

    /// Minimum token length for supplemental text (`additional_content`),
    /// kept at 1 so exact codes and tags stay searchable.
    #[serde(default = "default_supplemental_min_word_length")]
    pub supplemental_min_word_length: usize,

    /// Enable stopword filtering of query keywords.
    #[serde(default = "default_true")]
    pub stopwords_enabled: bool,

    /// Additional words to filter from query keywords.
    #[serde(default)]
    pub custom_stopwords: Vec<String>,

    /// Words to preserve even when the stopword list contains them
    /// (case-sensitive).
    #[serde(default)]
    pub allowlist: Vec<String>,
}

fn default_min_word_length() -> usize {
    3
}

fn default_supplemental_min_word_length() -> usize {
    1
}

fn default_true() -> bool {
    true
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            min_word_length: default_min_word_length(),
            supplemental_min_word_length: default_supplemental_min_word_length(),
            stopwords_enabled: default_true(),
            custom_stopwords: Vec::new(),
            allowlist: Vec::new(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
