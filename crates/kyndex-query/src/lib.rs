//! Query engine for the Kyndex search index.
//!
//! Resolves a structured [`SearchQuery`] against the store: candidates are
//! narrowed by entity, time window, and property filters, then matched per
//! keyword by word prefix. Multiple keywords combine as a union (OR), not
//! an intersection; the combined result is deduplicated by unique key.
//!
//! # Modules
//!
//! - [`query`]: the structured query type
//! - [`stopwords`]: query-side stopword filtering
//! - [`engine`]: query execution

pub mod engine;
pub mod query;
pub mod stopwords;

// Re-exports
pub use engine::QueryEngine;
pub use query::SearchQuery;
pub use stopwords::StopwordFilter;
