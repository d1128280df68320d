//! Kyndex content search engine umbrella crate.
//!
//! Re-exports the engine's components and provides the [`SearchService`]
//! facade, the surface hosts embed: sweep, search, delete.

pub use kyndex_core as core;
pub use kyndex_crawl as crawl;
pub use kyndex_query as query;
pub use kyndex_store as store;

pub mod service;

pub use service::{SearchService, SearchServiceBuilder};
