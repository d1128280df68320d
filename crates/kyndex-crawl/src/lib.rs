//! Content crawling and index coordination for Kyndex.
//!
//! This crate owns the indexing half of the engine: the provider contract,
//! the built-in page and module providers, and the coordinator that drives
//! a sweep and commits its output to storage.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       kyndex-crawl                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  SearchProvider trait (one impl per entity kind)            │
//! │  ├── PageProvider   (priority 100)                          │
//! │  └── ModuleProvider (priority 200, content-source registry) │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ProviderRegistry (static tag → provider mapping)           │
//! │  Source traits (page/module/setting repositories)           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  IndexCoordinator (sweep loop, enrichment, persistence)     │
//! │  SweepTracker (per-site incremental watermarks)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! A sweep is one pass of every registered provider over one site, full
//! (`since = None`) or incremental (`since = Some(watermark)`). The
//! coordinator holds no scheduling logic; an external scheduler triggers
//! sweeps and guarantees single flight per site.

pub mod coordinator;
pub mod hierarchy;
pub mod modules;
pub mod pages;
pub mod provider;
pub mod registry;
pub mod sources;
pub mod sweep;

// Re-exports
pub use coordinator::{IndexCoordinator, SweepStats};
pub use modules::{ContentSourceRegistry, ModuleProvider, MODULE_PROVIDER_PRIORITY};
pub use pages::{PageProvider, PAGE_PROVIDER_PRIORITY};
pub use provider::{OwnerContext, PendingContent, SearchProvider, SweepSink};
pub use registry::ProviderRegistry;
pub use sources::{
    ModuleContentSource, ModuleSource, PageInfo, PageSource, PlacedModule, SettingSource,
    VisibilityWindow,
};
pub use sweep::{SweepRecord, SweepTracker};
