//! Module provider.
//!
//! Walks a site's page-module placements and dispatches each module to the
//! content source registered for its kind. A kind with no registered
//! source contributes nothing and is skipped silently; a source that fails
//! for one module is reported through the sink and the sweep moves on to
//! the remaining modules.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kyndex_core::model::{names, EntityId, PageId, SiteId};
use kyndex_core::Result;

use crate::hierarchy::resolve_paths;
use crate::provider::{OwnerContext, PendingContent, SearchProvider, SweepSink};
use crate::sources::{allow_index, ModuleContentSource, ModuleSource, PageSource, SettingSource};

/// Sweep priority of the module provider; runs after the page provider.
pub const MODULE_PROVIDER_PRIORITY: i32 = 200;

/// Default unique key of a module's index entry, prefixed by the owning
/// page's key so recursive page deletion cascades here.
pub fn module_key(page_id: PageId, module_id: EntityId) -> String {
    format!("page:{page_id}:module:{module_id}")
}

/// Static mapping from module content kind to its registered extractor.
#[derive(Clone, Default)]
pub struct ContentSourceRegistry {
    sources: HashMap<String, Arc<dyn ModuleContentSource>>,
}

impl ContentSourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a content source for a module kind.
    #[allow(clippy::should_implement_trait)]
    pub fn add(mut self, kind: impl Into<String>, source: Arc<dyn ModuleContentSource>) -> Self {
        self.sources.insert(kind.into(), source);
        self
    }

    /// Look up the source for a kind.
    pub fn get(&self, kind: &str) -> Option<Arc<dyn ModuleContentSource>> {
        self.sources.get(kind).cloned()
    }

    /// Number of registered kinds.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl std::fmt::Debug for ContentSourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<&str> = self.sources.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        f.debug_struct("ContentSourceRegistry")
            .field("kinds", &kinds)
            .finish()
    }
}

/// Provider indexing the module content of a site.
pub struct ModuleProvider {
    modules: Arc<dyn ModuleSource>,
    pages: Arc<dyn PageSource>,
    settings: Arc<dyn SettingSource>,
    sources: ContentSourceRegistry,
}

impl ModuleProvider {
    pub fn new(
        modules: Arc<dyn ModuleSource>,
        pages: Arc<dyn PageSource>,
        settings: Arc<dyn SettingSource>,
        sources: ContentSourceRegistry,
    ) -> Self {
        Self {
            modules,
            pages,
            settings,
            sources,
        }
    }
}

#[async_trait]
impl SearchProvider for ModuleProvider {
    fn name(&self) -> &str {
        names::MODULE
    }

    fn priority(&self) -> i32 {
        MODULE_PROVIDER_PRIORITY
    }

    async fn index_content(
        &self,
        site_id: SiteId,
        since: Option<DateTime<Utc>>,
        sink: &dyn SweepSink,
    ) -> Result<usize> {
        let placements = self.modules.page_modules(site_id).await?;
        let pages = self.pages.pages(site_id).await?;
        let paths = resolve_paths(&pages);
        let pages_by_id: HashMap<PageId, _> = pages.iter().map(|p| (p.page_id, p)).collect();

        let mut seen_modules = HashSet::new();
        let mut batch = Vec::new();
        let mut count = 0;

        for placement in &placements {
            // One entry per module, first placement wins.
            if !seen_modules.insert(placement.module_id) {
                continue;
            }

            // A placement whose page no longer resolves contributes nothing.
            let Some(page) = pages_by_id.get(&placement.page_id) else {
                continue;
            };

            if placement.content_kind.is_empty() {
                continue;
            }
            let Some(source) = self.sources.get(&placement.content_kind) else {
                log::debug!(
                    "search: no content source registered for kind '{}' (module {})",
                    placement.content_kind,
                    placement.module_id
                );
                continue;
            };

            log::debug!("search: begin index module {}", placement.module_id);

            let allow = allow_index(self.settings.as_ref(), page.page_id).await;

            match source.content(placement, since).await {
                Ok(units) => {
                    for mut unit in units {
                        unit.unique_key.get_or_insert_with(|| {
                            module_key(placement.page_id, placement.module_id)
                        });
                        count += 1;
                        batch.push(PendingContent {
                            unit,
                            owner: OwnerContext {
                                site_id: placement.site_id,
                                page_id: page.page_id,
                                entity_id: placement.module_id,
                                path: paths
                                    .get(&page.page_id)
                                    .cloned()
                                    .unwrap_or_else(|| page.slug.clone()),
                                title: page.title.clone(),
                                name: page.name.clone(),
                                modified_on: placement.modified_on,
                                is_deleted: placement.is_deleted,
                            },
                            allow_index: allow,
                        });
                    }
                }
                Err(e) => {
                    log::error!("search: index module {} failed: {e}", placement.module_id);
                    sink.report_error(format!(
                        "index module {} failed: {e}",
                        placement.module_id
                    ))
                    .await;
                }
            }

            log::debug!("search: end index module {}", placement.module_id);
        }

        sink.process(batch).await?;
        Ok(count)
    }
}

// ============================================================================
// Tests
// ============================================================================
