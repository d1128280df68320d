//! Structured search query.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use kyndex_core::model::SiteId;
use serde::{Deserialize, Serialize};

/// A search request against one site's index.
///
/// All filters are optional except the site; absent filters don't narrow.
/// `keywords` is free text, tokenized by the engine; an empty keyword
/// string returns the filtered candidate set without keyword narrowing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Site whose index is queried (required).
    pub site_id: SiteId,

    /// Restrict results to these entity tags; empty means all. An unknown
    /// tag matches nothing rather than failing.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entity_names: Vec<String>,

    /// Lower bound (inclusive) on `content_authored_on`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub begin_time: Option<DateTime<Utc>>,

    /// Upper bound (inclusive) on `content_authored_on`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,

    /// Required property values, AND-combined: every entry must be present
    /// on a matching unit.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub properties: HashMap<String, String>,

    /// Free-text keywords, OR-combined per token after tokenization.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub keywords: String,
}

impl SearchQuery {
    /// Query returning every unit of a site.
    pub fn for_site(site_id: SiteId) -> Self {
        Self {
            site_id,
            ..Default::default()
        }
    }

    /// Set the keyword string.
    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = keywords.into();
        self
    }

    /// Restrict to one entity tag.
    pub fn with_entity(mut self, entity_name: impl Into<String>) -> Self {
        self.entity_names.push(entity_name.into());
        self
    }

    /// Require a property value.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
