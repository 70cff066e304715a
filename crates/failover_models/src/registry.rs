//! Chat provider registry and the [`ProviderSource`] abstraction.

use crate::error::SourceError;
use crate::provider::{ChatProvider, same_provider};
use parking_lot::RwLock;
use std::sync::Arc;

/// Supplies the chat providers currently known to the host.
///
/// The failover engine calls [`list_chat_providers`](Self::list_chat_providers)
/// once per call and never caches the result, so providers added or removed
/// between calls are respected.
pub trait ProviderSource: Send + Sync + 'static {
    /// Returns a snapshot of the chat providers in priority order.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] if the host cannot enumerate its providers.
    fn list_chat_providers(&self) -> Result<Vec<Arc<dyn ChatProvider>>, SourceError>;
}

impl<T: ProviderSource> ProviderSource for Arc<T> {
    fn list_chat_providers(&self) -> Result<Vec<Arc<dyn ChatProvider>>, SourceError> {
        (**self).list_chat_providers()
    }
}

/// An ordered, identity-deduplicated set of chat providers.
///
/// Clones share the same underlying set, so a registry handed to the engine as
/// its [`ProviderSource`] observes later registrations.
///
/// ```
/// # use failover_models::{ChatProvider, ProviderRegistry, ProviderSource};
/// # use async_trait::async_trait;
/// # use std::sync::Arc;
/// # struct Echo;
/// # #[async_trait]
/// # impl ChatProvider for Echo {
/// #     fn id(&self) -> Option<&str> { Some("echo") }
/// # }
/// let registry = ProviderRegistry::new();
/// let provider: Arc<dyn ChatProvider> = Arc::new(Echo);
///
/// registry.register(provider.clone());
/// registry.register(provider);
///
/// assert_eq!(registry.len(), 1);
/// assert_eq!(registry.list_chat_providers().unwrap().len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: Arc<RwLock<Vec<Arc<dyn ChatProvider>>>>,
}

impl core::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.provider_ids())
            .finish()
    }
}

impl ProviderRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry from providers in priority order.
    #[must_use]
    pub fn from_providers(providers: impl IntoIterator<Item = Arc<dyn ChatProvider>>) -> Self {
        let registry = Self::new();
        for provider in providers {
            registry.register(provider);
        }
        registry
    }

    /// Appends a provider unless the same instance is already registered.
    ///
    /// Returns `true` if the provider was added.
    pub fn register(&self, provider: Arc<dyn ChatProvider>) -> bool {
        let mut providers = self.providers.write();
        if providers.iter().any(|p| same_provider(p, &provider)) {
            return false;
        }
        providers.push(provider);
        true
    }

    /// Replaces the provider with the same id in place, or appends it.
    ///
    /// Providers without an id are always appended (subject to identity dedup).
    pub fn upsert(&self, provider: Arc<dyn ChatProvider>) {
        let mut providers = self.providers.write();
        if let Some(id) = provider.id()
            && let Some(slot) = providers.iter_mut().find(|p| p.id() == Some(id))
        {
            *slot = provider;
            return;
        }
        if !providers.iter().any(|p| same_provider(p, &provider)) {
            providers.push(provider);
        }
    }

    /// Removes every provider with the given id.
    ///
    /// Returns `true` if anything was removed.
    pub fn remove(&self, id: &str) -> bool {
        let mut providers = self.providers.write();
        let before = providers.len();
        providers.retain(|p| p.id() != Some(id));
        providers.len() != before
    }

    /// Returns the first provider with the given id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<dyn ChatProvider>> {
        self.providers
            .read()
            .iter()
            .find(|p| p.id() == Some(id))
            .cloned()
    }

    /// Number of registered providers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.read().len()
    }

    /// Returns `true` if no provider is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.read().is_empty()
    }

    /// Lists provider ids in priority order (`None` for providers without one).
    #[must_use]
    pub fn provider_ids(&self) -> Vec<Option<String>> {
        self.providers
            .read()
            .iter()
            .map(|p| p.id().map(str::to_owned))
            .collect()
    }

    /// Returns a snapshot of the registered providers.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Arc<dyn ChatProvider>> {
        self.providers.read().clone()
    }
}

impl ProviderSource for ProviderRegistry {
    fn list_chat_providers(&self) -> Result<Vec<Arc<dyn ChatProvider>>, SourceError> {
        Ok(self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Named(Option<&'static str>);

    #[async_trait]
    impl ChatProvider for Named {
        fn id(&self) -> Option<&str> {
            self.0
        }
    }

    fn named(id: &'static str) -> Arc<dyn ChatProvider> {
        Arc::new(Named(Some(id)))
    }

    #[test]
    fn register_dedups_by_identity_not_id() {
        let registry = ProviderRegistry::new();
        let a = named("a");
        assert!(registry.register(a.clone()));
        assert!(!registry.register(a));
        // Same id, different instance.
        assert!(registry.register(named("a")));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn upsert_replaces_in_place() {
        let registry = ProviderRegistry::from_providers([named("a"), named("b"), named("c")]);
        let replacement = named("b");
        registry.upsert(replacement.clone());

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert!(same_provider(&snapshot[1], &replacement));
    }

    #[test]
    fn upsert_appends_unknown_ids() {
        let registry = ProviderRegistry::from_providers([named("a")]);
        registry.upsert(named("z"));
        registry.upsert(Arc::new(Named(None)));
        assert_eq!(
            registry.provider_ids(),
            vec![Some("a".to_string()), Some("z".to_string()), None]
        );
    }

    #[test]
    fn remove_by_id() {
        let registry = ProviderRegistry::from_providers([named("a"), named("b")]);
        assert!(registry.remove("a"));
        assert!(!registry.remove("a"));
        assert_eq!(registry.provider_ids(), vec![Some("b".to_string())]);
        assert!(registry.get("b").is_some());
        assert!(registry.get("a").is_none());
    }

    #[test]
    fn clones_share_state() {
        let registry = ProviderRegistry::new();
        let source = registry.clone();
        assert!(source.list_chat_providers().unwrap().is_empty());
        registry.register(named("late"));
        assert_eq!(source.list_chat_providers().unwrap().len(), 1);
    }
}
