//! The [`FailoverEngine`] facade.

use crate::config::FailoverConfig;
use crate::error::FailoverError;
use crate::events::{EventSink, FailoverEvent};
use crate::executor::{AtomicExecutor, ExecutorContext, StreamingExecutor};
use crate::order::AttemptOrder;
use failover_models::{ChatProvider, ChatRequest, ChatResponse, ProviderSource};
use futures::StreamExt;
use futures::stream::{self, BoxStream};
use std::sync::Arc;

/// Runs chat requests across the providers of a [`ProviderSource`].
///
/// The source is queried on every call, so providers added to or removed from
/// it take effect immediately. Calls are independent: each owns its own
/// failure records, and the engine itself is cheap to clone and share.
///
/// ```
/// use failover_engine::{FailoverEngine, NoopSink};
/// use failover_models::ProviderRegistry;
/// use std::sync::Arc;
///
/// let registry = ProviderRegistry::new();
/// let engine = FailoverEngine::new(Arc::new(registry), Arc::new(NoopSink));
/// assert!(engine.attempt_order(None).unwrap().is_empty());
/// ```
#[derive(Clone)]
pub struct FailoverEngine {
    source: Arc<dyn ProviderSource>,
    sink: Arc<dyn EventSink>,
    config: FailoverConfig,
    ctx: ExecutorContext,
}

impl FailoverEngine {
    /// Creates an engine with the default configuration.
    #[must_use]
    pub fn new(source: Arc<dyn ProviderSource>, sink: Arc<dyn EventSink>) -> Self {
        let config = FailoverConfig::default();
        let ctx = ExecutorContext::new(&config, Arc::clone(&sink));
        Self {
            source,
            sink,
            config,
            ctx,
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: FailoverConfig) -> Self {
        self.ctx = ExecutorContext::new(&config, Arc::clone(&self.sink));
        self.config = config;
        self
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &FailoverConfig {
        &self.config
    }

    /// The provider source queried on every call.
    #[must_use]
    pub fn source(&self) -> &Arc<dyn ProviderSource> {
        &self.source
    }

    pub(crate) fn emit(&self, event: &FailoverEvent<'_>) {
        self.ctx.emit(event);
    }

    /// Builds the attempt order for `primary` from a fresh source snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`FailoverError::Source`] if the source cannot list providers.
    pub fn attempt_order(
        &self,
        primary: Option<&Arc<dyn ChatProvider>>,
    ) -> Result<AttemptOrder, FailoverError> {
        let providers = self.source.list_chat_providers()?;
        let order = AttemptOrder::build(primary, &providers);
        tracing::debug!(?order, "built attempt order");
        Ok(order)
    }

    /// Completes `request`, starting with `primary` and failing over to the
    /// source's other providers.
    ///
    /// # Errors
    ///
    /// See [`AtomicExecutor::run`]. A source failure is returned as
    /// [`FailoverError::Source`] before any provider is attempted.
    pub async fn complete(
        &self,
        primary: Option<&Arc<dyn ChatProvider>>,
        request: ChatRequest,
    ) -> Result<ChatResponse, FailoverError> {
        let order = self.attempt_order(primary)?;
        AtomicExecutor::new(self.ctx.clone())
            .run(&order, request)
            .await
    }

    /// Streams `request`, starting with `primary` and failing over to the
    /// source's other providers until one produces output.
    ///
    /// Errors are delivered as the stream's final item.
    pub fn stream(
        &self,
        primary: Option<&Arc<dyn ChatProvider>>,
        request: ChatRequest,
    ) -> BoxStream<'static, Result<ChatResponse, FailoverError>> {
        match self.attempt_order(primary) {
            Ok(order) => StreamingExecutor::new(self.ctx.clone()).run(order, request),
            Err(err) => stream::once(async move { Err(err) }).boxed(),
        }
    }
}

impl core::fmt::Debug for FailoverEngine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FailoverEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
