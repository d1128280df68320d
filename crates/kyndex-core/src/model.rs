//! Word dictionary and content unit types.
//!
//! Two renditions of an indexable unit exist:
//!
//! - [`SearchContent`] is the stored form, with every field concrete. This
//!   is what the store persists and the query engine returns.
//! - [`ContentUnit`] is the raw form emitted by providers during a sweep.
//!   Fields a provider may leave unset are `Option`-valued; the coordinator
//!   fills defaults from the owning page/module context before persisting.
//!
//! Units are identified within a site by `unique_key`. Keys form prefix
//! hierarchies (a page key is a prefix of its modules' keys), which is what
//! lets a parent's recursive deletion cascade to children without a
//! foreign-key tree walk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Site identifier in the host platform.
pub type SiteId = i32;
/// Page identifier in the host platform.
pub type PageId = i32;
/// Identifier of the source entity a unit was extracted from.
pub type EntityId = i32;
/// Identifier of a stored content unit.
pub type ContentId = i32;
/// Identifier of a dictionary word.
pub type WordId = i32;

/// Well-known entity tags, property names, and setting names shared
/// between providers, the coordinator, and query callers.
pub mod names {
    /// Entity tag for page content units.
    pub const PAGE: &str = "Page";
    /// Entity tag for module content units.
    pub const MODULE: &str = "Module";
    /// Property recording the owning page of a unit.
    pub const PROP_PAGE_ID: &str = "PageId";
    /// Property recording the owning source entity of a unit.
    pub const PROP_ENTITY_ID: &str = "EntityId";
    /// Per-page setting consulted for the allow-index policy.
    pub const SETTING_ALLOW_INDEX: &str = "AllowIndex";
}

/// One normalized token in the word dictionary.
///
/// Words are interned on first occurrence and never deleted, even when no
/// content references them any longer. The dictionary is append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchWord {
    pub id: WordId,
    /// Normalized (trimmed, lowercase) form; unique across the dictionary.
    pub word: String,
}

/// A name/value pair attached to a content unit for faceted filtering.
///
/// Names need not be unique across a unit's property list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentProperty {
    pub name: String,
    pub value: String,
}

impl ContentProperty {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Membership row associating a content unit with a dictionary word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentWord {
    pub content_id: ContentId,
    pub word_id: WordId,
    /// Word string, denormalized from the dictionary on read.
    pub word: String,
    /// Occurrences of the word within the unit's indexed text.
    pub count: u32,
    pub created_on: DateTime<Utc>,
    pub modified_on: DateTime<Utc>,
}

/// One indexable unit as stored in the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchContent {
    /// Store-assigned identifier; zero until persisted.
    pub id: ContentId,
    pub site_id: SiteId,
    /// Logical type tag, e.g. "Page" or "Module".
    pub entity_name: String,
    /// Identifier of the unit in its source system.
    pub entity_id: EntityId,
    /// Identity of the unit within its site; see the module docs for the
    /// prefix-hierarchy convention.
    pub unique_key: String,
    pub title: String,
    pub description: String,
    pub body: String,
    /// Deep link to the content.
    pub url: String,
    /// Supplemental searchable text, tokenized separately from the
    /// primary fields.
    pub additional_content: String,
    /// Timestamp used for incremental sweeps and time-window filtering.
    pub content_authored_on: DateTime<Utc>,
    /// Inactive units stay in the index and are returned by queries;
    /// excluding them from display is the caller's concern.
    pub is_active: bool,
    pub properties: Vec<ContentProperty>,
}

impl SearchContent {
    /// Value of the first property with the given name, if any.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// Whether a property with the given name exists.
    pub fn has_property(&self, name: &str) -> bool {
        self.properties.iter().any(|p| p.name == name)
    }
}

/// Raw unit emitted by a provider during a sweep.
///
/// `None` means the provider left the field unset and the coordinator
/// supplies the default from the owning context. Text payloads and
/// properties are always concrete (an absent payload is simply empty).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentUnit {
    pub entity_name: Option<String>,
    pub entity_id: Option<EntityId>,
    pub unique_key: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub content_authored_on: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub additional_content: String,
    #[serde(default)]
    pub properties: Vec<ContentProperty>,
}

impl ContentUnit {
    /// Create a new unit builder.
    pub fn builder() -> ContentUnitBuilder {
        ContentUnitBuilder::default()
    }
}

/// Builder for [`ContentUnit`].
#[derive(Debug, Default)]
pub struct ContentUnitBuilder {
    unit: ContentUnit,
}

impl ContentUnitBuilder {
    /// Set the entity tag (defaults to the emitting provider's name).
    pub fn entity_name(mut self, name: impl Into<String>) -> Self {
        self.unit.entity_name = Some(name.into());
        self
    }

    /// Set the source entity id (defaults to the owning entity's id).
    pub fn entity_id(mut self, id: EntityId) -> Self {
        self.unit.entity_id = Some(id);
        self
    }

    /// Set the unique key (defaults to `{entity_name}:{entity_id}`).
    pub fn unique_key(mut self, key: impl Into<String>) -> Self {
        self.unit.unique_key = Some(key.into());
        self
    }

    /// Set the title (defaults to the owning page's title or name).
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.unit.title = Some(title.into());
        self
    }

    /// Set the deep link (defaults to the owning page's path).
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.unit.url = Some(url.into());
        self
    }

    /// Set the authored-on timestamp (defaults to the source's
    /// last-modified time).
    pub fn authored_on(mut self, at: DateTime<Utc>) -> Self {
        self.unit.content_authored_on = Some(at);
        self
    }

    /// Set the visibility flag (defaults to true, then combined with the
    /// allow-index policy).
    pub fn active(mut self, active: bool) -> Self {
        self.unit.is_active = Some(active);
        self
    }

    /// Set the description text.
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.unit.description = text.into();
        self
    }

    /// Set the main body text.
    pub fn body(mut self, text: impl Into<String>) -> Self {
        self.unit.body = text.into();
        self
    }

    /// Set the supplemental searchable text.
    pub fn additional_content(mut self, text: impl Into<String>) -> Self {
        self.unit.additional_content = text.into();
        self
    }

    /// Append a faceting property.
    pub fn property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.unit.properties.push(ContentProperty::new(name, value));
        self
    }

    /// Build the unit.
    pub fn build(self) -> ContentUnit {
        self.unit
    }
}

// ============================================================================
// Tests
// ============================================================================
