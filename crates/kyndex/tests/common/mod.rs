//! Shared fixtures for the integration tests.
//!
//! `SiteFixture` plays the host platform: it implements the page, module,
//! and setting sources over in-memory data, plus a "text" module content
//! source. `build_service` wires it into a full service with both built-in
//! providers registered.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use kyndex::crawl::{
    ContentSourceRegistry, ModuleContentSource, ModuleProvider, ModuleSource, PageInfo,
    PageProvider, PageSource, PlacedModule, SettingSource, VisibilityWindow,
};
use kyndex::core::model::{names, ContentUnit, EntityId, PageId, SiteId};
use kyndex::core::{Error, Result};
use kyndex::SearchService;

pub fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, day, 0, 0, 0).unwrap()
}

pub fn page(page_id: PageId, parent_id: Option<PageId>, slug: &str, title: &str) -> PageInfo {
    PageInfo {
        page_id,
        site_id: 1,
        parent_id,
        slug: slug.to_string(),
        name: slug.to_string(),
        title: Some(title.to_string()),
        modified_on: at(page_id as u32),
        is_deleted: false,
        visibility: VisibilityWindow::always(),
    }
}

pub fn placement(module_id: EntityId, page_id: PageId) -> PlacedModule {
    PlacedModule {
        module_id,
        page_id,
        site_id: 1,
        title: None,
        content_kind: "text".to_string(),
        modified_on: at(module_id as u32),
        is_deleted: false,
    }
}

/// In-memory stand-in for the host platform's repositories.
#[derive(Default)]
pub struct SiteFixture {
    pub pages: Vec<PageInfo>,
    pub placements: Vec<PlacedModule>,
    pub module_text: HashMap<EntityId, String>,
    pub deny_pages: Vec<PageId>,
    pub broken_modules: Vec<EntityId>,
}

#[async_trait]
impl PageSource for SiteFixture {
    async fn pages(&self, site_id: SiteId) -> Result<Vec<PageInfo>> {
        Ok(self
            .pages
            .iter()
            .filter(|p| p.site_id == site_id)
            .cloned()
            .collect())
    }

    async fn page(&self, page_id: PageId) -> Result<Option<PageInfo>> {
        Ok(self.pages.iter().find(|p| p.page_id == page_id).cloned())
    }
}

#[async_trait]
impl ModuleSource for SiteFixture {
    async fn page_modules(&self, site_id: SiteId) -> Result<Vec<PlacedModule>> {
        Ok(self
            .placements
            .iter()
            .filter(|m| m.site_id == site_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SettingSource for SiteFixture {
    async fn setting(
        &self,
        entity_name: &str,
        entity_id: EntityId,
        name: &str,
    ) -> Result<Option<String>> {
        if entity_name == names::PAGE
            && name == names::SETTING_ALLOW_INDEX
            && self.deny_pages.contains(&entity_id)
        {
            Ok(Some("false".to_string()))
        } else {
            Ok(None)
        }
    }
}

#[async_trait]
impl ModuleContentSource for SiteFixture {
    async fn content(
        &self,
        module: &PlacedModule,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<ContentUnit>> {
        if self.broken_modules.contains(&module.module_id) {
            return Err(Error::operation("content backend unavailable"));
        }
        if let Some(since) = since {
            if module.modified_on < since {
                return Ok(Vec::new());
            }
        }
        let text = self
            .module_text
            .get(&module.module_id)
            .cloned()
            .unwrap_or_default();
        Ok(vec![ContentUnit::builder().body(text).build()])
    }
}

/// Three pages (finance/budget nested under finance) and three text
/// modules spread across them.
pub fn standard_fixture() -> SiteFixture {
    let mut module_text = HashMap::new();
    module_text.insert(10, "Annual budget overview for the organization".to_string());
    module_text.insert(
        11,
        "Budget breakdown by department with budgeting notes".to_string(),
    );
    module_text.insert(
        12,
        "Welcome announcement and reporting highlights".to_string(),
    );

    SiteFixture {
        pages: vec![
            page(1, None, "home", "Home"),
            page(2, None, "finance", "Finance"),
            page(3, Some(2), "budget", "Budget Planning"),
        ],
        placements: vec![placement(10, 2), placement(11, 3), placement(12, 1)],
        module_text,
        deny_pages: Vec::new(),
        broken_modules: Vec::new(),
    }
}

/// Wire a fixture into a full service with both providers registered.
pub fn build_service(fixture: Arc<SiteFixture>) -> SearchService {
    build_service_with(fixture, |builder| builder)
}

/// Same as [`build_service`] but lets a test adjust the builder.
pub fn build_service_with(
    fixture: Arc<SiteFixture>,
    adjust: impl FnOnce(kyndex::SearchServiceBuilder) -> kyndex::SearchServiceBuilder,
) -> SearchService {
    let sources = ContentSourceRegistry::new()
        .add("text", Arc::clone(&fixture) as Arc<dyn ModuleContentSource>);

    let builder = SearchService::builder()
        .provider(Arc::new(PageProvider::new(
            Arc::clone(&fixture) as Arc<dyn PageSource>,
            Arc::clone(&fixture) as Arc<dyn SettingSource>,
        )))
        .provider(Arc::new(ModuleProvider::new(
            Arc::clone(&fixture) as Arc<dyn ModuleSource>,
            Arc::clone(&fixture) as Arc<dyn PageSource>,
            Arc::clone(&fixture) as Arc<dyn SettingSource>,
            sources,
        )));

    adjust(builder).build()
}
