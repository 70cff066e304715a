//! Failover orchestration across interchangeable chat providers.
//!
//! A call is tried against a primary provider first, then against the other
//! providers of a [`ProviderSource`](failover_models::ProviderSource) in
//! order, one at a time, until one answers:
//!
//! - [`ErrorClassifier`] decides which failures allow moving on. Failures that
//!   would reproduce on every provider (bad requests, for instance) end the
//!   call immediately.
//! - [`AttemptOrder`] puts the primary first and removes duplicate instances.
//! - [`AtomicExecutor`] runs single-shot completions.
//! - [`StreamingExecutor`] forwards chunks as they arrive and locks in the
//!   first provider that produces output.
//! - [`FailoverEvent`]s describe every attempt and outcome to an [`EventSink`].
//!
//! [`FailoverEngine`] ties these together, and [`FailoverProvider`] /
//! [`FailoverInstaller`] expose the engine as ordinary providers.
//!
//! # Example
//!
//! ```
//! use async_trait::async_trait;
//! use failover_engine::{FailoverEngine, NoopSink};
//! use failover_models::{
//!     ChatProvider, ChatRequest, ChatResponse, ProviderError, ProviderRegistry,
//! };
//! use std::sync::Arc;
//!
//! struct Down;
//!
//! #[async_trait]
//! impl ChatProvider for Down {
//!     fn id(&self) -> Option<&str> {
//!         Some("down")
//!     }
//!
//!     async fn complete(&self, _: ChatRequest) -> Result<ChatResponse, ProviderError> {
//!         Err(ProviderError::status(503, "service unavailable"))
//!     }
//! }
//!
//! struct Up;
//!
//! #[async_trait]
//! impl ChatProvider for Up {
//!     fn id(&self) -> Option<&str> {
//!         Some("up")
//!     }
//!
//!     async fn complete(&self, _: ChatRequest) -> Result<ChatResponse, ProviderError> {
//!         Ok(ChatResponse::completion("hello"))
//!     }
//! }
//!
//! # futures::executor::block_on(async {
//! let down: Arc<dyn ChatProvider> = Arc::new(Down);
//! let up: Arc<dyn ChatProvider> = Arc::new(Up);
//! let registry = ProviderRegistry::from_providers([down.clone(), up]);
//! let engine = FailoverEngine::new(Arc::new(registry), Arc::new(NoopSink));
//!
//! let response = engine.complete(Some(&down), ChatRequest::new("hi")).await.unwrap();
//! assert_eq!(response, ChatResponse::completion("hello"));
//! # });
//! ```

mod classifier;
mod config;
mod engine;
mod error;
mod events;
mod executor;
mod extract;
mod install;
mod order;
mod provider;

pub use classifier::ErrorClassifier;
pub use config::{DEFAULT_RETRY_KEYWORDS, DEFAULT_RETRY_STATUS_CODES, FailoverConfig};
pub use engine::FailoverEngine;
pub use error::{FailoverError, FailureCause, FailureRecord, summarize};
pub use events::{EventSink, FailoverEvent, NoopSink};
pub use executor::{AtomicExecutor, ExecutorContext, StreamingExecutor};
pub use extract::response_text;
pub use install::FailoverInstaller;
pub use order::{AttemptOrder, UNKNOWN_PROVIDER_ID, provider_id};
pub use provider::FailoverProvider;
