//! The [`ChatProvider`] trait for chat-completion backends.

use crate::error::ProviderError;
use crate::types::{ChatRequest, ChatResponse};
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::sync::Arc;

/// A stream of response chunks produced by [`ChatProvider::stream`].
pub type ChunkStream = BoxStream<'static, Result<ChatResponse, ProviderError>>;

/// The chat operations a provider implements.
///
/// This is a static property of the provider, not a per-call choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// The provider implements [`ChatProvider::complete`].
    pub complete: bool,
    /// The provider implements [`ChatProvider::stream`].
    pub stream: bool,
}

impl Capabilities {
    /// Atomic completion only.
    pub const COMPLETE: Self = Self {
        complete: true,
        stream: false,
    };

    /// Streaming only.
    pub const STREAM: Self = Self {
        complete: false,
        stream: true,
    };

    /// Both completion and streaming.
    pub const ALL: Self = Self {
        complete: true,
        stream: true,
    };

    /// Neither operation.
    pub const NONE: Self = Self {
        complete: false,
        stream: false,
    };
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::COMPLETE
    }
}

/// Trait implemented by chat-completion providers.
///
/// Providers are shared, read-mostly handles: the same `Arc<dyn ChatProvider>`
/// may serve many concurrent calls. Identity (pointer equality) is what the
/// failover engine uses to deduplicate providers; [`id`](Self::id) is only used
/// for logs and failure records.
///
/// Operations a provider does not support keep their default bodies, which
/// return [`ProviderError::Unsupported`]. Advertise what is supported through
/// [`capabilities`](Self::capabilities).
#[async_trait]
pub trait ChatProvider: Send + Sync + 'static {
    /// Stable identifier of this provider, if it has one.
    fn id(&self) -> Option<&str>;

    /// The chat operations this provider implements.
    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    /// Sends a request and waits for the whole response.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] if the request fails.
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let _ = request;
        Err(ProviderError::Unsupported("complete"))
    }

    /// Sends a request and returns the response as a stream of chunks.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] if the stream cannot be opened. Failures
    /// after the stream is opened are yielded as stream items.
    async fn stream(&self, request: ChatRequest) -> Result<ChunkStream, ProviderError> {
        let _ = request;
        Err(ProviderError::Unsupported("stream"))
    }
}

/// Returns `true` if both handles point at the same provider instance.
#[must_use]
pub fn same_provider(a: &Arc<dyn ChatProvider>, b: &Arc<dyn ChatProvider>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
