//! End-to-end sweep tests: providers, enrichment, incremental watermarks,
//! failure isolation, and index-entry deletion.

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use common::{at, build_service, build_service_with, placement, standard_fixture};
use kyndex::core::model::names;
use kyndex::core::SiteContext;
use kyndex::query::SearchQuery;
use tempfile::TempDir;

#[tokio::test]
async fn test_full_sweep_indexes_pages_and_modules() {
    let service = build_service(Arc::new(standard_fixture()));
    let ctx = SiteContext::new(1);

    let stats = service.index(&ctx, None).await.unwrap();

    assert_eq!(stats.units_indexed, 6); // 3 pages + 3 modules
    assert_eq!(stats.providers_run, 2);
    assert_eq!(stats.providers_skipped, 0);
    assert!(stats.errors.is_empty());

    let all = service.search(&ctx, SearchQuery::default()).await.unwrap();
    assert_eq!(all.len(), 6);

    let keys: HashSet<&str> = all.iter().map(|c| c.unique_key.as_str()).collect();
    assert!(keys.contains("page:3"));
    assert!(keys.contains("page:3:module:11"));
}

#[tokio::test]
async fn test_module_units_inherit_owning_page_defaults() {
    let service = build_service(Arc::new(standard_fixture()));
    let ctx = SiteContext::new(1);
    service.index(&ctx, None).await.unwrap();

    let all = service.search(&ctx, SearchQuery::default()).await.unwrap();
    let module = all
        .iter()
        .find(|c| c.unique_key == "page:3:module:11")
        .unwrap();

    assert_eq!(module.entity_name, names::MODULE);
    assert_eq!(module.entity_id, 11);
    // URL defaults to the hierarchy-resolved path of the owning page
    assert_eq!(module.url, "/finance/budget");
    // Title falls back to the owning page's title
    assert_eq!(module.title, "Budget Planning");
    // Identifying properties are appended
    assert_eq!(module.property(names::PROP_PAGE_ID), Some("3"));
    assert_eq!(module.property(names::PROP_ENTITY_ID), Some("11"));
}

#[tokio::test]
async fn test_base_path_prefixes_defaulted_urls() {
    let service = build_service(Arc::new(standard_fixture()));
    let ctx = SiteContext::new(1).with_base_path("/acme");
    service.index(&ctx, None).await.unwrap();

    let all = service.search(&ctx, SearchQuery::default()).await.unwrap();
    let module = all
        .iter()
        .find(|c| c.unique_key == "page:3:module:11")
        .unwrap();
    assert_eq!(module.url, "/acme/finance/budget");
}

#[tokio::test]
async fn test_repeated_full_sweeps_are_idempotent() {
    let service = build_service(Arc::new(standard_fixture()));
    let ctx = SiteContext::new(1);

    service.index(&ctx, None).await.unwrap();
    let first: HashSet<String> = service
        .search(&ctx, SearchQuery::default())
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.unique_key)
        .collect();

    service.index(&ctx, None).await.unwrap();
    let second: HashSet<String> = service
        .search(&ctx, SearchQuery::default())
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.unique_key)
        .collect();

    assert_eq!(first, second);
    assert_eq!(second.len(), 6);
}

#[tokio::test]
async fn test_incremental_sweep_uses_recorded_watermark() {
    let state_dir = TempDir::new().unwrap();
    let service = build_service_with(Arc::new(standard_fixture()), |builder| {
        builder.state_dir(state_dir.path())
    });
    let ctx = SiteContext::new(1);

    // First run has no watermark: full sweep.
    let first = service.index_changed(&ctx).await.unwrap();
    assert_eq!(first.units_indexed, 6);

    // Nothing changed since the watermark: nothing re-indexed, nothing lost.
    let second = service.index_changed(&ctx).await.unwrap();
    assert_eq!(second.units_indexed, 0);

    let all = service.search(&ctx, SearchQuery::default()).await.unwrap();
    assert_eq!(all.len(), 6);
}

#[tokio::test]
async fn test_explicit_since_limits_the_sweep() {
    let service = build_service(Arc::new(standard_fixture()));
    let ctx = SiteContext::new(1);

    // Pages 1-3 modified on days 1-3, modules 10-12 on days 10-12; a
    // watermark of day 9 passes only the modules.
    let stats = service.index(&ctx, Some(at(9))).await.unwrap();
    assert_eq!(stats.units_indexed, 3);

    let all = service.search(&ctx, SearchQuery::default()).await.unwrap();
    let keys: HashSet<&str> = all.iter().map(|c| c.unique_key.as_str()).collect();
    assert!(keys.contains("page:2:module:10"));
    assert!(!keys.contains("page:2"));
}

#[tokio::test]
async fn test_broken_module_is_isolated_and_reported() {
    let mut fixture = standard_fixture();
    fixture.broken_modules.push(11);
    let service = build_service(Arc::new(fixture));
    let ctx = SiteContext::new(1);

    let stats = service.index(&ctx, None).await.unwrap();

    // Both providers still complete; only the broken module is missing.
    assert_eq!(stats.providers_run, 2);
    assert_eq!(stats.units_indexed, 5);
    assert_eq!(stats.errors.len(), 1);
    assert!(stats.errors[0].contains("module 11"), "got: {}", stats.errors[0]);

    let all = service.search(&ctx, SearchQuery::default()).await.unwrap();
    let keys: HashSet<&str> = all.iter().map(|c| c.unique_key.as_str()).collect();
    assert!(!keys.contains("page:3:module:11"));
    assert!(keys.contains("page:2:module:10"));
}

#[tokio::test]
async fn test_denied_page_and_its_module_are_indexed_inactive() {
    let mut fixture = standard_fixture();
    fixture.deny_pages.push(3);
    let service = build_service(Arc::new(fixture));
    let ctx = SiteContext::new(1);

    service.index(&ctx, None).await.unwrap();

    // Still present in query results, distinguishable by the flag.
    let all = service.search(&ctx, SearchQuery::default()).await.unwrap();
    assert_eq!(all.len(), 6);

    let inactive: HashSet<&str> = all
        .iter()
        .filter(|c| !c.is_active)
        .map(|c| c.unique_key.as_str())
        .collect();
    assert_eq!(inactive, HashSet::from(["page:3", "page:3:module:11"]));
}

#[tokio::test]
async fn test_remove_recursive_cascades_to_module_entries() {
    let service = build_service(Arc::new(standard_fixture()));
    let ctx = SiteContext::new(1);
    service.index(&ctx, None).await.unwrap();

    let removed = service.remove("page:3", true).await.unwrap();
    assert_eq!(removed, 2); // the page and its module

    let all = service.search(&ctx, SearchQuery::default()).await.unwrap();
    let keys: HashSet<&str> = all.iter().map(|c| c.unique_key.as_str()).collect();
    assert!(!keys.contains("page:3"));
    assert!(!keys.contains("page:3:module:11"));
    assert!(keys.contains("page:2"));
    assert!(keys.contains("page:2:module:10"));
}

#[tokio::test]
async fn test_remove_non_recursive_keeps_children() {
    let service = build_service(Arc::new(standard_fixture()));
    let ctx = SiteContext::new(1);
    service.index(&ctx, None).await.unwrap();

    let removed = service.remove("page:3", false).await.unwrap();
    assert_eq!(removed, 1);

    let all = service.search(&ctx, SearchQuery::default()).await.unwrap();
    let keys: HashSet<&str> = all.iter().map(|c| c.unique_key.as_str()).collect();
    assert!(keys.contains("page:3:module:11"));
}

#[tokio::test]
async fn test_resweep_restores_removed_entries() {
    let service = build_service(Arc::new(standard_fixture()));
    let ctx = SiteContext::new(1);
    service.index(&ctx, None).await.unwrap();
    service.remove("page:3", true).await.unwrap();

    // A full sweep is the retry mechanism: deleted entries come back.
    service.index(&ctx, None).await.unwrap();

    let all = service.search(&ctx, SearchQuery::default()).await.unwrap();
    assert_eq!(all.len(), 6);
}

#[tokio::test]
async fn test_module_without_text_still_indexes_unit() {
    let mut fixture = standard_fixture();
    fixture.placements.push(placement(13, 1));
    // No text registered for module 13: it indexes with empty body.
    let service = build_service(Arc::new(fixture));
    let ctx = SiteContext::new(1);

    let stats = service.index(&ctx, None).await.unwrap();
    assert_eq!(stats.units_indexed, 7);
}
