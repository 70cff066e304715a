//! Builds the order in which providers are attempted.

use core::fmt;
use failover_models::{ChatProvider, same_provider};
use std::sync::Arc;

/// Id reported for providers that do not expose one.
pub const UNKNOWN_PROVIDER_ID: &str = "unknown";

/// Returns the provider's id, or [`UNKNOWN_PROVIDER_ID`].
#[must_use]
pub fn provider_id(provider: &dyn ChatProvider) -> &str {
    provider.id().unwrap_or(UNKNOWN_PROVIDER_ID)
}

/// Providers in the order a call attempts them.
///
/// The primary comes first, followed by the registry snapshot in its given
/// order, with duplicate instances removed. An order with no primary and an
/// empty registry is empty; executors report it as
/// [`NoProviderAvailable`](crate::FailoverError::NoProviderAvailable).
#[derive(Clone, Default)]
pub struct AttemptOrder {
    providers: Vec<Arc<dyn ChatProvider>>,
}

impl AttemptOrder {
    /// Builds the attempt order for `primary` over a registry snapshot.
    ///
    /// Deterministic and free of I/O.
    #[must_use]
    pub fn build(
        primary: Option<&Arc<dyn ChatProvider>>,
        registry: &[Arc<dyn ChatProvider>],
    ) -> Self {
        let mut providers: Vec<Arc<dyn ChatProvider>> = Vec::with_capacity(registry.len() + 1);
        for provider in primary.into_iter().chain(registry) {
            if !providers.iter().any(|p| same_provider(p, provider)) {
                providers.push(Arc::clone(provider));
            }
        }
        Self { providers }
    }

    /// Number of providers to attempt.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns `true` if there is nothing to attempt.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// The providers in attempt order.
    #[must_use]
    pub fn providers(&self) -> &[Arc<dyn ChatProvider>] {
        &self.providers
    }

    /// Provider ids in attempt order.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.providers
            .iter()
            .map(|p| provider_id(p.as_ref()).to_string())
            .collect()
    }
}

impl IntoIterator for AttemptOrder {
    type Item = Arc<dyn ChatProvider>;
    type IntoIter = std::vec::IntoIter<Arc<dyn ChatProvider>>;

    fn into_iter(self) -> Self::IntoIter {
        self.providers.into_iter()
    }
}

impl fmt::Debug for AttemptOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}
