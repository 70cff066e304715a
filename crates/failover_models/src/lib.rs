//! Chat provider interface and registry.
//!
//! Defines the vocabulary shared by chat-completion backends and the failover
//! engine that drives them:
//!
//! - [`ChatProvider`]: an object-safe provider handle with atomic and streaming
//!   operations, advertised through [`Capabilities`].
//! - [`ChatRequest`] / [`ChatResponse`]: the payload forwarded to providers and
//!   what comes back, including structured [`MessageChain`] replies.
//! - [`ProviderSource`] / [`ProviderRegistry`]: how the host exposes its current
//!   set of chat providers.
//!
//! # Example
//!
//! ```
//! use async_trait::async_trait;
//! use failover_models::{ChatProvider, ChatRequest, ChatResponse, ProviderError};
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl ChatProvider for Echo {
//!     fn id(&self) -> Option<&str> {
//!         Some("echo")
//!     }
//!
//!     async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
//!         Ok(ChatResponse::completion(request.prompt.unwrap_or_default()))
//!     }
//! }
//! ```

mod error;
mod provider;
mod registry;
mod types;

pub use error::{ContentError, ProviderError, SourceError};
pub use provider::{Capabilities, ChatProvider, ChunkStream, same_provider};
pub use registry::{ProviderRegistry, ProviderSource};
pub use types::{
    ChatRequest, ChatResponse, Component, Message, MessageChain, PlainText, Usage, truncate_chars,
};
