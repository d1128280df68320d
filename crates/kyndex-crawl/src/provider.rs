//! The provider contract.
//!
//! A provider knows how to enumerate indexable content for one entity kind
//! (pages, modules, future kinds). During a sweep the coordinator calls
//! every registered provider in priority order; providers emit raw
//! [`PendingContent`] through the [`SweepSink`] and report per-unit
//! failures through it without aborting the sweep.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kyndex_core::model::{ContentUnit, EntityId, PageId, SiteId};
use kyndex_core::Result;

/// Owning page/module context accompanying an emitted unit.
///
/// The coordinator derives enrichment defaults from this, never from the
/// raw unit alone: the site id is always forced from here, and unset unit
/// fields fall back to these values.
#[derive(Debug, Clone)]
pub struct OwnerContext {
    pub site_id: SiteId,
    pub page_id: PageId,
    /// Id of the source entity the unit was extracted from.
    pub entity_id: EntityId,
    /// Full path of the owning page (already hierarchy-resolved).
    pub path: String,
    pub title: Option<String>,
    pub name: String,
    /// Last-modified time of the source entity.
    pub modified_on: DateTime<Utc>,
    pub is_deleted: bool,
}

/// One unit emitted by a provider, awaiting enrichment and persistence.
#[derive(Debug, Clone)]
pub struct PendingContent {
    pub unit: ContentUnit,
    pub owner: OwnerContext,
    /// Outcome of the allow-index policy for the owning page. Disallowed
    /// content is still emitted and persisted inactive, so re-enabling the
    /// policy later needs no re-crawl.
    pub allow_index: bool,
}

/// Receiver for a provider's output during one sweep.
#[async_trait]
pub trait SweepSink: Send + Sync {
    /// Enrich and persist a batch of emitted units.
    async fn process(&self, batch: Vec<PendingContent>) -> Result<()>;

    /// Report a per-unit failure. The message should name the offending
    /// entity; the sweep continues regardless.
    async fn report_error(&self, message: String);
}

/// A pluggable component able to enumerate indexable content for one
/// entity kind.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Entity tag this provider produces (e.g. "Page", "Module"). Also the
    /// default `entity_name` of its emitted units.
    fn name(&self) -> &str;

    /// Sweep ordering: lower priorities run first; ties keep registration
    /// order. Ordering is a scheduling hint, not a correctness dependency.
    fn priority(&self) -> i32;

    /// Enumerate all indexable units of this kind belonging to `site_id`
    /// that changed since `since` (`None` means full reindex), emitting
    /// them through `sink`.
    ///
    /// Returns the count of units examined/emitted. Per-unit failures must
    /// be caught, reported via [`SweepSink::report_error`], and must not
    /// abort processing of the remaining units.
    async fn index_content(
        &self,
        site_id: SiteId,
        since: Option<DateTime<Utc>>,
        sink: &dyn SweepSink,
    ) -> Result<usize>;
}

// ============================================================================
// Tests
// ============================================================================
