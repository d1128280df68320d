//! Content store trait.
//!
//! This module defines the [`ContentStore`] trait that all storage
//! implementations must satisfy. The trait is the persistence boundary of
//! the engine: the coordinator writes through it during sweeps and the
//! query engine reads through it to answer searches.
//!
//! # Semantics contract
//!
//! - Each call commits on its own; callers never span a transaction across
//!   calls. `add_content` persists the unit together with its properties
//!   atomically.
//! - `get_or_create_word` is idempotent: concurrent calls for the same
//!   normalized word resolve to one dictionary entry, and "already exists"
//!   is success, not failure.
//! - The word dictionary is append-only. Deleting content never deletes
//!   words, even when nothing references them any longer.
//! - Reads may observe a partially-updated index while a sweep is running;
//!   they must not block behind writers for the duration of a sweep.

use async_trait::async_trait;
use kyndex_core::model::{ContentId, ContentWord, SearchContent, SearchWord, SiteId, WordId};
use kyndex_core::Result;

/// Abstract storage backend for the search index.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Persist a content unit and its properties atomically, assigning its
    /// id.
    ///
    /// Replace semantics: an existing unit with the same
    /// `(site_id, unique_key)` is superseded, and its word membership rows
    /// are dropped with it.
    async fn add_content(&self, content: SearchContent) -> Result<SearchContent>;

    /// Delete a content unit by id. Returns whether a unit was removed.
    async fn delete_content(&self, id: ContentId) -> Result<bool>;

    /// Delete the unit with exactly `unique_key`; with `recursive`, also
    /// every unit whose key starts with `unique_key` as a strict prefix.
    ///
    /// Returns the number of units removed.
    async fn delete_by_key(&self, unique_key: &str, recursive: bool) -> Result<usize>;

    /// Remove all content units and membership rows. The word dictionary
    /// survives.
    async fn delete_all(&self) -> Result<()>;

    /// All content units of a site, active and inactive alike.
    async fn contents_by_site(&self, site_id: SiteId) -> Result<Vec<SearchContent>>;

    /// Intern a word: normalize it and return the existing dictionary
    /// entry, or create one on first occurrence.
    async fn get_or_create_word(&self, word: &str) -> Result<SearchWord>;

    /// Membership rows of a content unit, hydrated with word strings.
    async fn words_for_content(&self, content_id: ContentId) -> Result<Vec<ContentWord>>;

    /// Insert a membership row. Callers intern the word first via
    /// [`ContentStore::get_or_create_word`].
    async fn add_content_word(
        &self,
        content_id: ContentId,
        word_id: WordId,
        count: u32,
    ) -> Result<ContentWord>;

    /// Update the occurrence count of an existing membership row.
    async fn update_content_word(
        &self,
        content_id: ContentId,
        word_id: WordId,
        count: u32,
    ) -> Result<ContentWord>;
}

// ============================================================================
// Tests
// ============================================================================
