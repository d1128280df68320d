//! Kyndex core: shared types, errors, and tokenization.
//!
//! This crate provides the foundational types used across all Kyndex crates.
//! It has no internal Kyndex dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`model`]: Word dictionary and content unit types
//! - [`context`]: Explicit per-site context passed into every operation
//! - [`config`]: Indexing and query configuration
//! - [`keywords`]: Pure tokenization helpers

pub mod config;
pub mod context;
pub mod error;
pub mod keywords;
pub mod model;

// Re-export key types at crate root for convenience
pub use config::IndexConfig;
pub use context::SiteContext;
pub use error::{Error, Result};
pub use model::names;
pub use model::{
    ContentId, ContentProperty, ContentUnit, ContentUnitBuilder, ContentWord, EntityId, PageId,
    SearchContent, SearchWord, SiteId, WordId,
};
