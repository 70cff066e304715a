//! [`FailoverProvider`], a provider decorator that adds failover.

use crate::engine::FailoverEngine;
use async_trait::async_trait;
use failover_models::{
    Capabilities, ChatProvider, ChatRequest, ChatResponse, ChunkStream, ProviderError,
};
use futures::StreamExt;
use std::sync::Arc;

/// Wraps a provider so that its calls fail over to the engine's other
/// providers.
///
/// The wrapper reports the inner provider's id and capabilities, and always
/// offers streaming since the engine can stream through providers that only
/// complete. Engine-level errors are converted back into [`ProviderError`]:
/// a provider's own error is surfaced unchanged.
#[derive(Clone)]
pub struct FailoverProvider {
    inner: Arc<dyn ChatProvider>,
    engine: FailoverEngine,
}

impl FailoverProvider {
    /// Wraps `inner`, which becomes the primary of every call.
    #[must_use]
    pub fn new(inner: Arc<dyn ChatProvider>, engine: FailoverEngine) -> Self {
        Self { inner, engine }
    }

    /// The wrapped provider.
    #[must_use]
    pub fn inner(&self) -> &Arc<dyn ChatProvider> {
        &self.inner
    }

    /// The engine running this provider's calls.
    #[must_use]
    pub fn engine(&self) -> &FailoverEngine {
        &self.engine
    }
}

#[async_trait]
impl ChatProvider for FailoverProvider {
    fn id(&self) -> Option<&str> {
        self.inner.id()
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            stream: true,
            ..self.inner.capabilities()
        }
    }

    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        self.engine
            .complete(Some(&self.inner), request)
            .await
            .map_err(ProviderError::from)
    }

    async fn stream(&self, request: ChatRequest) -> Result<ChunkStream, ProviderError> {
        Ok(self
            .engine
            .stream(Some(&self.inner), request)
            .map(|item| item.map_err(ProviderError::from))
            .boxed())
    }
}

impl core::fmt::Debug for FailoverProvider {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FailoverProvider")
            .field("id", &self.inner.id())
            .field("engine", &self.engine)
            .finish()
    }
}
