//! Sweep orchestration.
//!
//! The coordinator drives one full or incremental sweep over one site: it
//! invokes every registered provider in priority order, enriches each
//! emitted unit with defaults derived from its owning context, tokenizes
//! the unit's text, and commits unit + interned words to the store.
//!
//! Error handling follows a fixed taxonomy:
//!
//! - per-unit provider failures arrive via the sink's error channel and
//!   are collected into [`SweepStats::errors`]; the sweep continues;
//! - a provider whose `index_content` itself fails is skipped and
//!   recorded; remaining providers still run;
//! - store failures are hard failures and propagate out of
//!   [`IndexCoordinator::run`], keeping already-committed content.
//!
//! The coordinator holds no scheduling logic and no retry logic; a full
//! sweep is idempotent and re-running it is the retry mechanism.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kyndex_core::keywords::word_counts;
use kyndex_core::model::{names, ContentProperty, SearchContent};
use kyndex_core::{Error, IndexConfig, Result, SiteContext};
use kyndex_store::ContentStore;
use tokio::sync::Mutex;

use crate::provider::{PendingContent, SweepSink};
use crate::registry::ProviderRegistry;

/// Statistics about one sweep.
#[derive(Debug, Clone, Default)]
pub struct SweepStats {
    /// Units enriched and committed to the store.
    pub units_indexed: usize,
    /// Providers that completed their pass.
    pub providers_run: usize,
    /// Providers skipped because their pass failed outright.
    pub providers_skipped: usize,
    /// Per-unit and per-provider error messages collected along the way.
    pub errors: Vec<String>,
}

/// Orchestrates providers and commits their output.
pub struct IndexCoordinator {
    store: Arc<dyn ContentStore>,
    registry: ProviderRegistry,
    config: IndexConfig,
}

impl IndexCoordinator {
    pub fn new(store: Arc<dyn ContentStore>, registry: ProviderRegistry, config: IndexConfig) -> Self {
        Self {
            store,
            registry,
            config,
        }
    }

    /// The provider registry this coordinator sweeps.
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Run one sweep for the site in `ctx`.
    ///
    /// `since = None` reindexes everything; `since = Some(watermark)`
    /// limits providers to content changed at or after the watermark.
    pub async fn run(&self, ctx: &SiteContext, since: Option<DateTime<Utc>>) -> Result<SweepStats> {
        log::info!(
            "search: starting {} sweep for site {}",
            if since.is_some() { "incremental" } else { "full" },
            ctx.site_id
        );

        let mut stats = SweepStats::default();

        for provider in self.registry.ordered() {
            let sink = PersistSink::new(
                Arc::clone(&self.store),
                ctx.clone(),
                provider.name().to_string(),
                self.config.clone(),
            );

            let result = provider.index_content(ctx.site_id, since, &sink).await;

            // Store failures surface through the sink regardless of what
            // the provider returned; committed content stays committed.
            if let Some(fatal) = sink.take_fatal().await {
                return Err(fatal);
            }
            stats.units_indexed += sink.indexed();
            stats.errors.extend(sink.take_errors().await);

            match result {
                Ok(examined) => {
                    stats.providers_run += 1;
                    log::info!(
                        "search: provider '{}' examined {} unit(s)",
                        provider.name(),
                        examined
                    );
                }
                Err(e) => {
                    stats.providers_skipped += 1;
                    let message = format!("provider '{}' failed: {e}", provider.name());
                    log::error!("search: {message}");
                    stats.errors.push(message);
                }
            }
        }

        log::info!(
            "search: sweep for site {} indexed {} unit(s) ({} error(s))",
            ctx.site_id,
            stats.units_indexed,
            stats.errors.len()
        );

        Ok(stats)
    }
}

/// Sink enriching and persisting one provider's output.
struct PersistSink {
    store: Arc<dyn ContentStore>,
    ctx: SiteContext,
    provider: String,
    config: IndexConfig,
    indexed: AtomicUsize,
    errors: Mutex<Vec<String>>,
    fatal: Mutex<Option<Error>>,
}

impl PersistSink {
    fn new(store: Arc<dyn ContentStore>, ctx: SiteContext, provider: String, config: IndexConfig) -> Self {
        Self {
            store,
            ctx,
            provider,
            config,
            indexed: AtomicUsize::new(0),
            errors: Mutex::new(Vec::new()),
            fatal: Mutex::new(None),
        }
    }

    fn indexed(&self) -> usize {
        self.indexed.load(Ordering::Relaxed)
    }

    async fn take_errors(&self) -> Vec<String> {
        std::mem::take(&mut *self.errors.lock().await)
    }

    async fn take_fatal(&self) -> Option<Error> {
        self.fatal.lock().await.take()
    }

    /// Commit one enriched unit: the unit itself, then its interned words.
    async fn persist(&self, content: SearchContent) -> Result<()> {
        let mut counts = word_counts(&primary_text(&content), self.config.min_word_length);
        for (word, count) in word_counts(
            &content.additional_content,
            self.config.supplemental_min_word_length,
        ) {
            *counts.entry(word).or_insert(0) += count;
        }

        let stored = self.store.add_content(content).await?;
        for (word, count) in counts {
            let entry = self.store.get_or_create_word(&word).await?;
            self.store
                .add_content_word(stored.id, entry.id, count)
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl SweepSink for PersistSink {
    async fn process(&self, batch: Vec<PendingContent>) -> Result<()> {
        for pending in batch {
            let content = enrich(&self.ctx, &self.provider, pending);
            if let Err(e) = self.persist(content).await {
                let message = e.to_string();
                *self.fatal.lock().await = Some(e);
                return Err(Error::operation(message));
            }
            self.indexed.fetch_add(1, Ordering::Relaxed);
        }
        Ok(())
    }

    async fn report_error(&self, message: String) {
        self.errors.lock().await.push(message);
    }
}

/// Apply enrichment defaults to an emitted unit, producing the stored form.
///
/// Only fields the provider left unset are defaulted; the site id is
/// always forced from the owning context.
fn enrich(ctx: &SiteContext, provider_tag: &str, pending: PendingContent) -> SearchContent {
    let PendingContent {
        unit,
        owner,
        allow_index,
    } = pending;

    let entity_name = unit
        .entity_name
        .unwrap_or_else(|| provider_tag.to_string());
    let entity_id = unit.entity_id.unwrap_or(owner.entity_id);
    let unique_key = unit
        .unique_key
        .unwrap_or_else(|| format!("{entity_name}:{entity_id}"));
    let title = unit
        .title
        .or_else(|| owner.title.clone().filter(|t| !t.is_empty()))
        .unwrap_or_else(|| owner.name.clone());
    let url = unit
        .url
        .unwrap_or_else(|| default_url(&ctx.base_path, &owner.path));
    let is_active = unit.is_active.unwrap_or(true) && allow_index && !owner.is_deleted;
    let content_authored_on = unit.content_authored_on.unwrap_or(owner.modified_on);

    let mut properties = unit.properties;
    if !properties.iter().any(|p| p.name == names::PROP_PAGE_ID) {
        properties.push(ContentProperty::new(
            names::PROP_PAGE_ID,
            owner.page_id.to_string(),
        ));
    }
    if !properties.iter().any(|p| p.name == names::PROP_ENTITY_ID) {
        properties.push(ContentProperty::new(
            names::PROP_ENTITY_ID,
            entity_id.to_string(),
        ));
    }

    SearchContent {
        id: 0,
        site_id: owner.site_id,
        entity_name,
        entity_id,
        unique_key,
        title,
        description: unit.description,
        body: unit.body,
        url,
        additional_content: unit.additional_content,
        content_authored_on,
        is_active,
        properties,
    }
}

/// Default deep link: the site's base path joined with the owning page's
/// path, leading slash normalized.
fn default_url(base_path: &str, page_path: &str) -> String {
    let mut url = String::new();
    if !base_path.is_empty() {
        url.push_str(base_path.trim_end_matches('/'));
    }
    if !page_path.starts_with('/') {
        url.push('/');
    }
    url.push_str(page_path);
    url
}

fn primary_text(content: &SearchContent) -> String {
    format!("{} {} {}", content.title, content.description, content.body)
}

// ============================================================================
// Tests
// ============================================================================
