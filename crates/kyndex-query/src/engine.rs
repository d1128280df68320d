//! Query execution.
//!
//! Resolution order mirrors the data model: the site's rows form the
//! candidate set, AND-narrowing filters (entity, time window, properties)
//! trim it, then each keyword independently selects candidates whose
//! associated words start with it. Keyword results accumulate as a union
//! and deduplicate by unique key, first occurrence winning.
//!
//! Two deliberate properties worth calling out:
//!
//! - multiple keywords are OR, not AND, trading precision for recall;
//! - inactive rows are returned with their flag intact; hiding them from
//!   display is the caller's decision, so a unit toggled back to visible
//!   reappears without any re-indexing.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use kyndex_core::keywords;
use kyndex_core::model::{ContentId, SearchContent};
use kyndex_core::{IndexConfig, Result};
use kyndex_store::ContentStore;

use crate::query::SearchQuery;
use crate::stopwords::StopwordFilter;

/// Executes structured queries against a content store.
pub struct QueryEngine {
    store: Arc<dyn ContentStore>,
    filter: StopwordFilter,
    min_word_length: usize,
}

impl QueryEngine {
    /// Create an engine over a store.
    pub fn new(store: Arc<dyn ContentStore>, config: &IndexConfig) -> Self {
        Self {
            store,
            filter: StopwordFilter::new(config),
            min_word_length: config.min_word_length,
        }
    }

    /// Resolve a query, returning matching units deduplicated by unique
    /// key. Active and inactive units alike are returned.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchContent>> {
        let candidates = self.store.contents_by_site(query.site_id).await?;
        let filtered: Vec<SearchContent> = candidates
            .into_iter()
            .filter(|c| matches_filters(c, query))
            .collect();

        let parsed = keywords::keywords_with(&query.keywords, self.min_word_length);
        let parsed = self.filter.filter_keywords(parsed);
        if parsed.is_empty() {
            log::debug!(
                "search: site {} query without keywords matched {} unit(s)",
                query.site_id,
                filtered.len()
            );
            return Ok(filtered);
        }

        // Fetch each candidate's word list once; every keyword then matches
        // against the same snapshot.
        let mut words_by_content: HashMap<ContentId, Vec<String>> =
            HashMap::with_capacity(filtered.len());
        for candidate in &filtered {
            let words = self
                .store
                .words_for_content(candidate.id)
                .await?
                .into_iter()
                .map(|w| w.word)
                .collect();
            words_by_content.insert(candidate.id, words);
        }

        // Union across keywords, deduplicated by unique key.
        let mut seen: HashSet<&str> = HashSet::new();
        let mut results: Vec<SearchContent> = Vec::new();
        for keyword in &parsed {
            for candidate in &filtered {
                let matched = words_by_content
                    .get(&candidate.id)
                    .is_some_and(|words| words.iter().any(|w| w.starts_with(keyword.as_str())));
                if matched && seen.insert(candidate.unique_key.as_str()) {
                    results.push(candidate.clone());
                }
            }
        }

        log::debug!(
            "search: site {} query '{}' matched {} unit(s)",
            query.site_id,
            query.keywords,
            results.len()
        );
        Ok(results)
    }
}

impl std::fmt::Debug for QueryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryEngine")
            .field("filter", &self.filter)
            .finish()
    }
}

/// AND-narrowing filters applied before keyword matching. An entity filter
/// naming no stored tag simply matches nothing.
fn matches_filters(content: &SearchContent, query: &SearchQuery) -> bool {
    if !query.entity_names.is_empty() && !query.entity_names.contains(&content.entity_name) {
        return false;
    }

    if let Some(begin) = query.begin_time {
        if content.content_authored_on < begin {
            return false;
        }
    }
    if let Some(end) = query.end_time {
        if content.content_authored_on > end {
            return false;
        }
    }

    query
        .properties
        .iter()
        .all(|(name, value)| {
            content
                .properties
                .iter()
                .any(|p| &p.name == name && &p.value == value)
        })
}

// ============================================================================
// Tests
// ============================================================================
