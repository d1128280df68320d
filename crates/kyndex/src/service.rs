//! Service facade.
//!
//! [`SearchService`] composes the store, the index coordinator, and the
//! query engine into the three operations hosts embed: run a sweep, answer
//! a query, delete an index entry. Every operation takes an explicit
//! [`SiteContext`]; the service keeps no ambient tenant state.
//!
//! Scheduling stays with the host: an external scheduler triggers sweeps
//! and guarantees single flight per site. For hosts that want "index
//! whatever changed since last time" without bookkeeping, the service can
//! be given a state directory and [`SearchService::index_changed`] keeps a
//! per-site watermark there.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use kyndex_core::model::SearchContent;
use kyndex_core::{IndexConfig, Result, SiteContext};
use kyndex_crawl::provider::SearchProvider;
use kyndex_crawl::{IndexCoordinator, ProviderRegistry, SweepStats, SweepTracker};
use kyndex_query::{QueryEngine, SearchQuery};
use kyndex_store::{ContentStore, MemoryStore};

/// The embedded search engine: sweep, search, delete.
pub struct SearchService {
    store: Arc<dyn ContentStore>,
    coordinator: IndexCoordinator,
    engine: QueryEngine,
    state_dir: Option<PathBuf>,
}

impl SearchService {
    /// Start building a service.
    pub fn builder() -> SearchServiceBuilder {
        SearchServiceBuilder::default()
    }

    /// Run one full (`since = None`) or incremental sweep for a site.
    ///
    /// Returns sweep statistics; `units_indexed` is the total committed.
    pub async fn index(
        &self,
        ctx: &SiteContext,
        since: Option<DateTime<Utc>>,
    ) -> Result<SweepStats> {
        self.coordinator.run(ctx, since).await
    }

    /// Run a sweep bounded by the site's recorded watermark, then advance
    /// the watermark to this sweep's start time.
    ///
    /// Without a configured state directory this is a full sweep every
    /// time. The first sweep of a site is always full.
    pub async fn index_changed(&self, ctx: &SiteContext) -> Result<SweepStats> {
        let since = match &self.state_dir {
            Some(dir) => SweepTracker::load(dir)?
                .and_then(|tracker| tracker.last_swept(ctx.site_id)),
            None => None,
        };
        if since.is_none() {
            log::debug!(
                "search: no sweep watermark for site {}, running full sweep",
                ctx.site_id
            );
        }

        // The sweep's start time becomes the next watermark, so changes
        // made while the sweep runs are re-examined next time.
        let started_at = Utc::now();
        let stats = self.coordinator.run(ctx, since).await?;

        if let Some(dir) = &self.state_dir {
            let mut tracker = SweepTracker::load(dir)?.unwrap_or_default();
            tracker.record(ctx.site_id, started_at, stats.units_indexed);
            tracker.save(dir)?;
        }

        Ok(stats)
    }

    /// Resolve a query for the context's site.
    ///
    /// The query's site id is forced from the context; results include
    /// inactive units, flagged as such, for the caller to filter.
    pub async fn search(
        &self,
        ctx: &SiteContext,
        mut query: SearchQuery,
    ) -> Result<Vec<SearchContent>> {
        query.site_id = ctx.site_id;
        self.engine.search(&query).await
    }

    /// Delete an index entry by key; with `recursive`, also every entry
    /// whose key extends it. Returns the number of entries removed.
    pub async fn remove(&self, unique_key: &str, recursive: bool) -> Result<usize> {
        self.store.delete_by_key(unique_key, recursive).await
    }

    /// The store this service operates on.
    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.store
    }
}

/// Builder for [`SearchService`].
#[derive(Default)]
pub struct SearchServiceBuilder {
    store: Option<Arc<dyn ContentStore>>,
    registry: ProviderRegistry,
    config: IndexConfig,
    state_dir: Option<PathBuf>,
}

impl SearchServiceBuilder {
    /// Use a specific store; defaults to a fresh in-memory store.
    pub fn store(mut self, store: Arc<dyn ContentStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Register a provider.
    pub fn provider(mut self, provider: Arc<dyn SearchProvider>) -> Self {
        self.registry = self.registry.add(provider);
        self
    }

    /// Override the default configuration.
    pub fn config(mut self, config: IndexConfig) -> Self {
        self.config = config;
        self
    }

    /// Keep per-site sweep watermarks in this directory.
    pub fn state_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.state_dir = Some(dir.into());
        self
    }

    /// Build the service.
    pub fn build(self) -> SearchService {
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()) as Arc<dyn ContentStore>);
        let coordinator =
            IndexCoordinator::new(Arc::clone(&store), self.registry, self.config.clone());
        let engine = QueryEngine::new(Arc::clone(&store), &self.config);

        SearchService {
            store,
            coordinator,
            engine,
            state_dir: self.state_dir,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
