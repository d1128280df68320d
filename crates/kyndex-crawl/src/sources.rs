//! External content-source capabilities consumed by providers.
//!
//! The host platform owns page, module, and setting storage; Kyndex only
//! reads them. These traits are the seam: production hosts implement them
//! over their repositories, tests implement them over in-memory fixtures.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kyndex_core::model::{names, ContentUnit, EntityId, PageId, SiteId};
use kyndex_core::Result;
use serde::{Deserialize, Serialize};

/// Effective/expiry window constraining when content is publicly visible.
///
/// Missing bounds are open: no effective date means "visible since
/// forever", no expiry means "never expires".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityWindow {
    pub effective: Option<DateTime<Utc>>,
    pub expiry: Option<DateTime<Utc>>,
}

impl VisibilityWindow {
    /// An unconstrained window.
    pub fn always() -> Self {
        Self::default()
    }

    /// Pure check: visible at `now` when past the effective date and
    /// before the expiry date.
    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        if let Some(effective) = self.effective {
            if now < effective {
                return false;
            }
        }
        if let Some(expiry) = self.expiry {
            if now > expiry {
                return false;
            }
        }
        true
    }
}

/// Page metadata as supplied by the host's page repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageInfo {
    pub page_id: PageId,
    pub site_id: SiteId,
    pub parent_id: Option<PageId>,
    /// Path segment of this page alone; full paths are resolved from the
    /// parent chain (see [`crate::hierarchy`]).
    pub slug: String,
    pub name: String,
    pub title: Option<String>,
    pub modified_on: DateTime<Utc>,
    pub is_deleted: bool,
    pub visibility: VisibilityWindow,
}

impl PageInfo {
    /// Display title, falling back to the page name.
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ => &self.name,
        }
    }
}

/// One module placement on a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedModule {
    pub module_id: EntityId,
    pub page_id: PageId,
    pub site_id: SiteId,
    pub title: Option<String>,
    /// Tag of the registered content source able to extract this module's
    /// content; empty when the module kind is not searchable.
    #[serde(default)]
    pub content_kind: String,
    pub modified_on: DateTime<Utc>,
    pub is_deleted: bool,
}

/// Read access to a site's pages.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// All pages of a site, including deleted and not-yet-effective ones.
    async fn pages(&self, site_id: SiteId) -> Result<Vec<PageInfo>>;

    /// A single page by id.
    async fn page(&self, page_id: PageId) -> Result<Option<PageInfo>>;
}

/// Read access to a site's module placements.
#[async_trait]
pub trait ModuleSource: Send + Sync {
    /// All module placements of a site (one entry per page/module pair).
    async fn page_modules(&self, site_id: SiteId) -> Result<Vec<PlacedModule>>;
}

/// Read access to per-entity settings.
#[async_trait]
pub trait SettingSource: Send + Sync {
    async fn setting(
        &self,
        entity_name: &str,
        entity_id: EntityId,
        name: &str,
    ) -> Result<Option<String>>;
}

/// Content extractor for one module kind.
///
/// Implementations enumerate the indexable units a module contributes,
/// bounded by `since` when the sweep is incremental (`None` means a full
/// crawl of the module's content).
#[async_trait]
pub trait ModuleContentSource: Send + Sync {
    async fn content(
        &self,
        module: &PlacedModule,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<ContentUnit>>;
}

/// Evaluate the allow-index policy for a page.
///
/// A missing or unparsable setting means allowed; a settings read failure
/// is logged and also treated as allowed so one broken setting row cannot
/// blank out a page's index entry.
pub async fn allow_index(settings: &dyn SettingSource, page_id: PageId) -> bool {
    match settings
        .setting(names::PAGE, page_id, names::SETTING_ALLOW_INDEX)
        .await
    {
        Ok(Some(value)) => value.trim().parse::<bool>().unwrap_or(true),
        Ok(None) => true,
        Err(e) => {
            log::warn!("search: failed to read AllowIndex for page {page_id}: {e}");
            true
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    // ------------------------------------------------------------------------
    // VisibilityWindow tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_window_unconstrained() {
        assert!(VisibilityWindow::always().is_visible_at(at(2025, 1, 1)));
    }

    #[test]
    fn test_window_before_effective() {
        let window = VisibilityWindow {
            effective: Some(at(2025, 6, 1)),
            expiry: None,
        };
        assert!(!window.is_visible_at(at(2025, 5, 31)));
        assert!(window.is_visible_at(at(2025, 6, 1)));
        assert!(window.is_visible_at(at(2026, 1, 1)));
    }

    #[test]
    fn test_window_after_expiry() {
        let window = VisibilityWindow {
            effective: None,
            expiry: Some(at(2025, 6, 1)),
        };
        assert!(window.is_visible_at(at(2025, 6, 1)));
        assert!(!window.is_visible_at(at(2025, 6, 2)));
    }

    #[test]
    fn test_window_bounded_both_sides() {
        let window = VisibilityWindow {
            effective: Some(at(2025, 1, 1)),
            expiry: Some(at(2025, 12, 31)),
        };
        assert!(!window.is_visible_at(at(2024, 12, 31)));
        assert!(window.is_visible_at(at(2025, 7, 1)));
        assert!(!window.is_visible_at(at(2026, 1, 1)));
    }

    // ------------------------------------------------------------------------
    // display_title tests
    // ------------------------------------------------------------------------

    fn page(title: Option<&str>) -> PageInfo {
        PageInfo {
            page_id: 1,
            site_id: 1,
            parent_id: None,
            slug: "home".to_string(),
            name: "Home".to_string(),
            title: title.map(String::from),
            modified_on: at(2025, 1, 1),
            is_deleted: false,
            visibility: VisibilityWindow::always(),
        }
    }

    #[test]
    fn test_display_title_prefers_title() {
        assert_eq!(page(Some("Welcome")).display_title(), "Welcome");
    }

    #[test]
    fn test_display_title_falls_back_to_name() {
        assert_eq!(page(None).display_title(), "Home");
        assert_eq!(page(Some("")).display_title(), "Home");
    }

    // ------------------------------------------------------------------------
    // allow_index tests
    // ------------------------------------------------------------------------

    struct FixtureSettings {
        values: HashMap<(String, EntityId, String), String>,
        fail: bool,
    }

    #[async_trait]
    impl SettingSource for FixtureSettings {
        async fn setting(
            &self,
            entity_name: &str,
            entity_id: EntityId,
            name: &str,
        ) -> Result<Option<String>> {
            if self.fail {
                return Err(kyndex_core::Error::operation("settings unavailable"));
            }
            Ok(self
                .values
                .get(&(entity_name.to_string(), entity_id, name.to_string()))
                .cloned())
        }
    }

    fn settings_with(page_id: PageId, value: &str) -> FixtureSettings {
        let mut values = HashMap::new();
        values.insert(
            (
                names::PAGE.to_string(),
                page_id,
                names::SETTING_ALLOW_INDEX.to_string(),
            ),
            value.to_string(),
        );
        FixtureSettings {
            values,
            fail: false,
        }
    }

    #[tokio::test]
    async fn test_allow_index_absent_setting_is_allowed() {
        let settings = FixtureSettings {
            values: HashMap::new(),
            fail: false,
        };
        assert!(allow_index(&settings, 1).await);
    }

    #[tokio::test]
    async fn test_allow_index_false_setting_disables() {
        assert!(!allow_index(&settings_with(1, "false"), 1).await);
    }

    #[tokio::test]
    async fn test_allow_index_true_setting_allows() {
        assert!(allow_index(&settings_with(1, "true"), 1).await);
    }

    #[tokio::test]
    async fn test_allow_index_unparsable_setting_is_allowed() {
        assert!(allow_index(&settings_with(1, "maybe"), 1).await);
    }

    #[tokio::test]
    async fn test_allow_index_settings_failure_is_allowed() {
        let settings = FixtureSettings {
            values: HashMap::new(),
            fail: true,
        };
        assert!(allow_index(&settings, 1).await);
    }
}
