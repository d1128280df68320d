//! Provider registry.
//!
//! A static mapping from entity tag to provider instance, populated at
//! process startup. Sweeps iterate providers in ascending priority with
//! registration order breaking ties; lookups by tag serve callers that
//! need one specific provider.

use std::sync::Arc;

use crate::provider::SearchProvider;

/// Ordered collection of registered providers.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn SearchProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider.
    ///
    /// Later registrations with the same tag coexist; sweep order is
    /// decided by priority and registration order, lookup by tag returns
    /// the first registration.
    #[allow(clippy::should_implement_trait)]
    pub fn add(mut self, provider: Arc<dyn SearchProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Look up a provider by its entity tag.
    pub fn by_name(&self, name: &str) -> Option<Arc<dyn SearchProvider>> {
        self.providers.iter().find(|p| p.name() == name).cloned()
    }

    /// Providers in sweep order: ascending priority, stable on ties.
    pub fn ordered(&self) -> Vec<Arc<dyn SearchProvider>> {
        let mut ordered = self.providers.clone();
        ordered.sort_by_key(|p| p.priority());
        ordered
    }

    /// Number of registered providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.providers.iter().map(|p| p.name()).collect();
        f.debug_struct("ProviderRegistry")
            .field("providers", &names)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
