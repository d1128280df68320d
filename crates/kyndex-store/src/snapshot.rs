//! JSON snapshot persistence for the in-memory store.
//!
//! A snapshot captures the full store state (content units, word
//! dictionary, membership rows, id counters) as one pretty-printed JSON
//! file. Hosts that embed the memory backend use this to survive restarts
//! without re-crawling; a missing snapshot file simply means an empty
//! index.

use std::path::Path;

use kyndex_core::model::{ContentId, SearchContent, SearchWord, WordId};
use kyndex_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::memory::{ContentWordRow, Inner, MemoryStore};

/// Membership row in snapshot form, keyed to its content unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotContentWord {
    pub content_id: ContentId,
    #[serde(flatten)]
    pub(crate) row: ContentWordRow,
}

/// Serializable image of a [`MemoryStore`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub contents: Vec<SearchContent>,
    pub words: Vec<SearchWord>,
    pub content_words: Vec<SnapshotContentWord>,
    pub next_content_id: ContentId,
    pub next_word_id: WordId,
}

impl MemoryStore {
    /// Capture the current state as a snapshot.
    pub async fn snapshot(&self) -> StoreSnapshot {
        let inner = self.inner.read().await;
        StoreSnapshot {
            contents: inner.contents.values().cloned().collect(),
            words: inner.words.values().cloned().collect(),
            content_words: inner
                .content_words
                .iter()
                .flat_map(|(content_id, rows)| {
                    rows.iter().map(|row| SnapshotContentWord {
                        content_id: *content_id,
                        row: row.clone(),
                    })
                })
                .collect(),
            next_content_id: inner.next_content_id,
            next_word_id: inner.next_word_id,
        }
    }

    /// Rebuild a store from a snapshot.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let mut inner = Inner {
            next_content_id: snapshot.next_content_id.max(1),
            next_word_id: snapshot.next_word_id.max(1),
            ..Default::default()
        };

        for word in snapshot.words {
            inner.word_ids.insert(word.word.clone(), word.id);
            inner.words.insert(word.id, word);
        }
        for content in snapshot.contents {
            inner.contents.insert(content.id, content);
        }
        for entry in snapshot.content_words {
            inner
                .content_words
                .entry(entry.content_id)
                .or_default()
                .push(entry.row);
        }

        Self {
            inner: tokio::sync::RwLock::new(inner),
        }
    }

    /// Write the current state to `path` as pretty-printed JSON.
    pub async fn save_snapshot(&self, path: &Path) -> Result<()> {
        let snapshot = self.snapshot().await;

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
            }
        }

        let content = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| Error::operation(format!("failed to serialize snapshot: {e}")))?;
        std::fs::write(path, content).map_err(|e| Error::io_with_path(e, path))?;

        log::info!(
            "store: saved snapshot with {} unit(s), {} word(s) to {:?}",
            snapshot.contents.len(),
            snapshot.words.len(),
            path
        );
        Ok(())
    }

    /// Load a store from a snapshot file.
    ///
    /// Returns `Ok(None)` if the file doesn't exist.
    /// Returns `Err` if the file exists but cannot be parsed.
    pub fn load_snapshot(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        let snapshot: StoreSnapshot = serde_json::from_str(&content)
            .map_err(|e| Error::parse(format!("invalid snapshot JSON: {e}")))?;

        Ok(Some(Self::from_snapshot(snapshot)))
    }
}

// ============================================================================
// Tests
// ============================================================================
