//! In-memory reference store.
//!
//! `MemoryStore` keeps the whole index behind a single `tokio::sync::RwLock`
//! over BTreeMap-backed tables, so iteration order is deterministic and
//! every trait call commits atomically. Queries take the read lock and can
//! run while a sweep is writing between calls, observing a
//! partially-updated index rather than blocking for the sweep's duration.
//!
//! The backend doubles as the test substrate for the whole workspace and
//! can be made durable through the snapshot functions in
//! [`crate::snapshot`].

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use kyndex_core::keywords::normalize_word;
use kyndex_core::model::{ContentId, ContentWord, SearchContent, SearchWord, SiteId, WordId};
use kyndex_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::store::ContentStore;
use async_trait::async_trait;

/// Membership row as stored (word string lives in the dictionary).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ContentWordRow {
    pub(crate) word_id: WordId,
    pub(crate) count: u32,
    pub(crate) created_on: DateTime<Utc>,
    pub(crate) modified_on: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub(crate) struct Inner {
    pub(crate) contents: BTreeMap<ContentId, SearchContent>,
    pub(crate) words: BTreeMap<WordId, SearchWord>,
    pub(crate) word_ids: HashMap<String, WordId>,
    pub(crate) content_words: BTreeMap<ContentId, Vec<ContentWordRow>>,
    pub(crate) next_content_id: ContentId,
    pub(crate) next_word_id: WordId,
}

impl Inner {
    fn remove_content(&mut self, id: ContentId) -> bool {
        self.content_words.remove(&id);
        self.contents.remove(&id).is_some()
    }

    fn hydrate(&self, content_id: ContentId, row: &ContentWordRow) -> Option<ContentWord> {
        let word = self.words.get(&row.word_id)?;
        Some(ContentWord {
            content_id,
            word_id: row.word_id,
            word: word.word.clone(),
            count: row.count,
            created_on: row.created_on,
            modified_on: row.modified_on,
        })
    }
}

/// In-memory search index store.
pub struct MemoryStore {
    pub(crate) inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_content_id: 1,
                next_word_id: 1,
                ..Default::default()
            }),
        }
    }

    /// Number of content units currently stored.
    pub async fn content_count(&self) -> usize {
        self.inner.read().await.contents.len()
    }

    /// Number of words in the dictionary.
    pub async fn word_count(&self) -> usize {
        self.inner.read().await.words.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn add_content(&self, mut content: SearchContent) -> Result<SearchContent> {
        let mut inner = self.inner.write().await;

        // Replace semantics: supersede an existing unit with the same key
        // in the same site, dropping its membership rows.
        let superseded: Vec<ContentId> = inner
            .contents
            .values()
            .filter(|c| c.site_id == content.site_id && c.unique_key == content.unique_key)
            .map(|c| c.id)
            .collect();
        for id in superseded {
            inner.remove_content(id);
        }

        content.id = inner.next_content_id;
        inner.next_content_id += 1;
        inner.contents.insert(content.id, content.clone());

        log::debug!(
            "store: added content {} (site {}, key '{}')",
            content.id,
            content.site_id,
            content.unique_key
        );

        Ok(content)
    }

    async fn delete_content(&self, id: ContentId) -> Result<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.remove_content(id))
    }

    async fn delete_by_key(&self, unique_key: &str, recursive: bool) -> Result<usize> {
        let mut inner = self.inner.write().await;

        let matched: Vec<ContentId> = inner
            .contents
            .values()
            .filter(|c| {
                if recursive {
                    c.unique_key.starts_with(unique_key)
                } else {
                    c.unique_key == unique_key
                }
            })
            .map(|c| c.id)
            .collect();

        for id in &matched {
            inner.remove_content(*id);
        }

        log::debug!(
            "store: removed {} unit(s) under key '{}' (recursive={})",
            matched.len(),
            unique_key,
            recursive
        );

        Ok(matched.len())
    }

    async fn delete_all(&self) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.contents.clear();
        inner.content_words.clear();
        // The word dictionary is append-only and survives.
        Ok(())
    }

    async fn contents_by_site(&self, site_id: SiteId) -> Result<Vec<SearchContent>> {
        let inner = self.inner.read().await;
        Ok(inner
            .contents
            .values()
            .filter(|c| c.site_id == site_id)
            .cloned()
            .collect())
    }

    async fn get_or_create_word(&self, word: &str) -> Result<SearchWord> {
        let normalized = normalize_word(word);
        if normalized.is_empty() {
            return Err(Error::parse("cannot intern an empty word"));
        }

        let mut inner = self.inner.write().await;
        if let Some(id) = inner.word_ids.get(&normalized) {
            if let Some(existing) = inner.words.get(id) {
                return Ok(existing.clone());
            }
        }

        let word = SearchWord {
            id: inner.next_word_id,
            word: normalized.clone(),
        };
        inner.next_word_id += 1;
        inner.word_ids.insert(normalized, word.id);
        inner.words.insert(word.id, word.clone());
        Ok(word)
    }

    async fn words_for_content(&self, content_id: ContentId) -> Result<Vec<ContentWord>> {
        let inner = self.inner.read().await;
        let Some(rows) = inner.content_words.get(&content_id) else {
            return Ok(Vec::new());
        };
        Ok(rows
            .iter()
            .filter_map(|row| inner.hydrate(content_id, row))
            .collect())
    }

    async fn add_content_word(
        &self,
        content_id: ContentId,
        word_id: WordId,
        count: u32,
    ) -> Result<ContentWord> {
        let mut inner = self.inner.write().await;
        if !inner.contents.contains_key(&content_id) {
            return Err(Error::not_found(content_id.to_string(), "search content"));
        }
        if !inner.words.contains_key(&word_id) {
            return Err(Error::not_found(word_id.to_string(), "search word"));
        }

        let now = Utc::now();
        let row = ContentWordRow {
            word_id,
            count,
            created_on: now,
            modified_on: now,
        };
        inner
            .content_words
            .entry(content_id)
            .or_default()
            .push(row.clone());

        inner
            .hydrate(content_id, &row)
            .ok_or_else(|| Error::not_found(word_id.to_string(), "search word"))
    }

    async fn update_content_word(
        &self,
        content_id: ContentId,
        word_id: WordId,
        count: u32,
    ) -> Result<ContentWord> {
        let mut inner = self.inner.write().await;

        let row = inner
            .content_words
            .get_mut(&content_id)
            .and_then(|rows| rows.iter_mut().find(|r| r.word_id == word_id))
            .ok_or_else(|| {
                Error::not_found(format!("{content_id}/{word_id}"), "content word")
            })?;
        row.count = count;
        row.modified_on = Utc::now();
        let row = row.clone();

        inner
            .hydrate(content_id, &row)
            .ok_or_else(|| Error::not_found(word_id.to_string(), "search word"))
    }
}

// ============================================================================
// Tests
// ============================================================================
