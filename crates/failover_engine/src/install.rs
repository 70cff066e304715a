//! Wrapping a host's chat providers with failover.

use crate::engine::FailoverEngine;
use crate::error::FailoverError;
use crate::events::FailoverEvent;
use crate::order::provider_id;
use crate::provider::FailoverProvider;
use failover_models::{ChatProvider, ProviderRegistry};
use std::sync::Arc;

/// Creates [`FailoverProvider`]s for every chat provider of an engine's
/// source.
///
/// The engine's source must list the raw providers. Installing into the same
/// registry the engine reads from would make wrappers fail over to wrappers.
///
/// ```
/// use failover_engine::{FailoverEngine, FailoverInstaller, NoopSink};
/// use failover_models::ProviderRegistry;
/// use std::sync::Arc;
///
/// let raw = ProviderRegistry::new();
/// let engine = FailoverEngine::new(Arc::new(raw), Arc::new(NoopSink));
/// let installed = FailoverInstaller::new(engine).install().unwrap();
/// assert!(installed.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct FailoverInstaller {
    engine: FailoverEngine,
}

impl FailoverInstaller {
    /// Creates an installer whose wrappers share `engine`.
    #[must_use]
    pub fn new(engine: FailoverEngine) -> Self {
        Self { engine }
    }

    /// Wraps every chat provider of the engine's source.
    ///
    /// Returns no wrappers when fewer than
    /// [`min_providers`](crate::FailoverConfig::min_providers) providers exist.
    ///
    /// # Errors
    ///
    /// Returns [`FailoverError::Source`] if the source cannot list providers.
    pub fn install(&self) -> Result<Vec<FailoverProvider>, FailoverError> {
        let providers = match self.engine.source().list_chat_providers() {
            Ok(providers) => providers,
            Err(error) => {
                self.engine.emit(&FailoverEvent::InstallFailed { error: &error });
                return Err(error.into());
            }
        };

        let min_providers = self.engine.config().min_providers;
        if providers.len() < min_providers {
            self.engine.emit(&FailoverEvent::InstallSkipped {
                provider_count: providers.len(),
                min_providers,
            });
            return Ok(Vec::new());
        }

        let provider_ids: Vec<String> = providers
            .iter()
            .map(|p| provider_id(p.as_ref()).to_string())
            .collect();
        let wrappers = providers
            .into_iter()
            .map(|inner| FailoverProvider::new(inner, self.engine.clone()))
            .collect();
        self.engine.emit(&FailoverEvent::Installed {
            provider_ids: &provider_ids,
        });
        Ok(wrappers)
    }

    /// Installs the wrappers into `registry`, replacing entries with the same
    /// id. Running it again replaces the previous wrappers.
    ///
    /// Returns the ids of the installed wrappers.
    ///
    /// # Errors
    ///
    /// Returns [`FailoverError::Source`] if the source cannot list providers.
    pub fn install_into(&self, registry: &ProviderRegistry) -> Result<Vec<String>, FailoverError> {
        let wrappers = self.install()?;
        let mut ids = Vec::with_capacity(wrappers.len());
        for wrapper in wrappers {
            ids.push(provider_id(&wrapper).to_string());
            registry.upsert(Arc::new(wrapper) as Arc<dyn ChatProvider>);
        }
        Ok(ids)
    }
}
