//! Page provider.
//!
//! Indexes one unit per page of a site. Pages that are deleted, outside
//! their visibility window, or disallowed by the AllowIndex setting are
//! still emitted, marked inactive, so re-enabling them later needs no
//! re-crawl.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kyndex_core::model::{names, ContentUnit, PageId, SiteId};
use kyndex_core::Result;

use crate::hierarchy::resolve_paths;
use crate::provider::{OwnerContext, PendingContent, SearchProvider, SweepSink};
use crate::sources::{allow_index, PageSource, SettingSource};

/// Sweep priority of the page provider; pages index before their modules.
pub const PAGE_PROVIDER_PRIORITY: i32 = 100;

/// Unique key of a page's index entry. Module keys extend this, which is
/// what lets a page's recursive deletion cascade to its modules.
pub fn page_key(page_id: PageId) -> String {
    format!("page:{page_id}")
}

/// Provider indexing the pages of a site.
pub struct PageProvider {
    pages: Arc<dyn PageSource>,
    settings: Arc<dyn SettingSource>,
}

impl PageProvider {
    pub fn new(pages: Arc<dyn PageSource>, settings: Arc<dyn SettingSource>) -> Self {
        Self { pages, settings }
    }
}

#[async_trait]
impl SearchProvider for PageProvider {
    fn name(&self) -> &str {
        names::PAGE
    }

    fn priority(&self) -> i32 {
        PAGE_PROVIDER_PRIORITY
    }

    async fn index_content(
        &self,
        site_id: SiteId,
        since: Option<DateTime<Utc>>,
        sink: &dyn SweepSink,
    ) -> Result<usize> {
        let pages = self.pages.pages(site_id).await?;
        let paths = resolve_paths(&pages);
        let now = Utc::now();

        let mut batch = Vec::new();
        for page in &pages {
            if let Some(since) = since {
                if page.modified_on < since {
                    continue;
                }
            }

            log::debug!("search: begin index page {}", page.page_id);

            let allow = allow_index(self.settings.as_ref(), page.page_id).await;
            let visible = !page.is_deleted && page.visibility.is_visible_at(now);
            let path = paths
                .get(&page.page_id)
                .cloned()
                .unwrap_or_else(|| page.slug.clone());

            let unit = ContentUnit::builder()
                .unique_key(page_key(page.page_id))
                .title(page.display_title())
                .body(format!("{} {}", page.name, page.display_title()))
                .active(visible)
                .build();

            batch.push(PendingContent {
                unit,
                owner: OwnerContext {
                    site_id: page.site_id,
                    page_id: page.page_id,
                    entity_id: page.page_id,
                    path,
                    title: page.title.clone(),
                    name: page.name.clone(),
                    modified_on: page.modified_on,
                    is_deleted: page.is_deleted,
                },
                allow_index: allow,
            });

            log::debug!("search: end index page {}", page.page_id);
        }

        let count = batch.len();
        sink.process(batch).await?;
        Ok(count)
    }
}

// ============================================================================
// Tests
// ============================================================================
