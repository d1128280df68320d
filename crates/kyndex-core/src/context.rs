//! Explicit per-site context.
//!
//! The host platform historically threaded the current site through ambient
//! request state; Kyndex takes a [`SiteContext`] as an explicit parameter on
//! every operation (sweep, query, delete) instead. Named fields cover what
//! the engine itself consumes, and `extensions` is the single string-keyed
//! escape hatch for host-defined values.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::SiteId;

/// Context identifying the site an operation runs against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteContext {
    pub site_id: SiteId,

    /// Prefix prepended to defaulted content URLs (the alias path the site
    /// is mounted under); empty for root-mounted sites.
    #[serde(default)]
    pub base_path: String,

    /// Host-defined extension values, keyed by name.
    #[serde(default)]
    pub extensions: HashMap<String, String>,
}

impl SiteContext {
    /// Context for a root-mounted site with no extensions.
    pub fn new(site_id: SiteId) -> Self {
        Self {
            site_id,
            base_path: String::new(),
            extensions: HashMap::new(),
        }
    }

    /// Set the URL prefix the site is mounted under.
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Attach a host-defined extension value.
    pub fn with_extension(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extensions.insert(name.into(), value.into());
        self
    }

    /// Look up a host-defined extension value.
    pub fn extension(&self, name: &str) -> Option<&str> {
        self.extensions.get(name).map(String::as_str)
    }
}

// ============================================================================
// Tests
// ============================================================================
