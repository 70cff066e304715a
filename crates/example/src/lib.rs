//! Simulated chat providers for the failover demo.
//!
//! ```text
//! ┌──────────────┐   503    ┌──────────────┐  1st call fails  ┌──────────────┐
//! │   primary    │─────────▶│    flaky     │─────────────────▶│   streamer   │
//! │ (always down)│          │ (recovers)   │                  │ (word stream)│
//! └──────────────┘          └──────────────┘                  └──────────────┘
//! ```

use async_trait::async_trait;
use core::time::Duration;
use failover_models::{
    Capabilities, ChatProvider, ChatRequest, ChatResponse, ChunkStream, ProviderError,
    ProviderRegistry,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// How a [`SimulatedProvider`] behaves.
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Always answers with the given text.
    Healthy(String),
    /// Always fails with the given status code.
    Down(u16),
    /// Fails with `status` for the first `failures` calls, then answers.
    Flaky {
        /// Calls that fail before the provider recovers.
        failures: usize,
        /// Status code of the failures.
        status: u16,
        /// Answer once recovered.
        reply: String,
    },
    /// Streams the words of the given text.
    Streaming(String),
    /// Streams `words_before_failure` words, then fails.
    BrokenStream {
        /// Text to stream.
        text: String,
        /// Words delivered before the failure.
        words_before_failure: usize,
    },
}

/// A provider with scripted behavior and simulated latency.
#[derive(Debug)]
pub struct SimulatedProvider {
    id: String,
    behavior: Behavior,
    latency: Duration,
    calls: AtomicUsize,
}

impl SimulatedProvider {
    /// Creates a provider with 20ms latency.
    #[must_use]
    pub fn new(id: impl Into<String>, behavior: Behavior) -> Self {
        Self {
            id: id.into(),
            behavior,
            latency: Duration::from_millis(20),
            calls: AtomicUsize::new(0),
        }
    }

    /// Sets the simulated latency per call and per streamed word.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of calls received.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn words(text: &str) -> Vec<String> {
        text.split_inclusive(' ').map(str::to_owned).collect()
    }
}

#[async_trait]
impl ChatProvider for SimulatedProvider {
    fn id(&self) -> Option<&str> {
        Some(self.id.as_str())
    }

    fn capabilities(&self) -> Capabilities {
        match self.behavior {
            Behavior::Streaming(_) | Behavior::BrokenStream { .. } => Capabilities::STREAM,
            Behavior::Healthy(_) | Behavior::Down(_) | Behavior::Flaky { .. } => {
                Capabilities::COMPLETE
            }
        }
    }

    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;
        match &self.behavior {
            Behavior::Healthy(reply) => Ok(ChatResponse::completion(format!(
                "{reply} (re: {})",
                request.preview(40)
            ))),
            Behavior::Down(status) => Err(ProviderError::status(*status, "service unavailable")),
            Behavior::Flaky {
                failures,
                status,
                reply,
            } => {
                if call < *failures {
                    Err(ProviderError::status(*status, "upstream overloaded"))
                } else {
                    Ok(ChatResponse::completion(reply.clone()))
                }
            }
            Behavior::Streaming(_) | Behavior::BrokenStream { .. } => {
                Err(ProviderError::Unsupported("complete"))
            }
        }
    }

    async fn stream(&self, _request: ChatRequest) -> Result<ChunkStream, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (words, fail_after) = match &self.behavior {
            Behavior::Streaming(text) => (Self::words(text), None),
            Behavior::BrokenStream {
                text,
                words_before_failure,
            } => (Self::words(text), Some(*words_before_failure)),
            _ => return Err(ProviderError::Unsupported("stream")),
        };
        let latency = self.latency;
        Ok(Box::pin(async_stream::stream! {
            for (index, word) in words.into_iter().enumerate() {
                if fail_after == Some(index) {
                    yield Err(ProviderError::Http("connection reset by peer".into()));
                    break;
                }
                tokio::time::sleep(latency).await;
                yield Ok(ChatResponse::text(word));
            }
        }))
    }
}

/// Builds the demo's raw provider set, in priority order.
#[must_use]
pub fn demo_registry() -> ProviderRegistry {
    let providers: [Arc<dyn ChatProvider>; 4] = [
        Arc::new(SimulatedProvider::new("primary", Behavior::Down(503))),
        Arc::new(SimulatedProvider::new(
            "flaky",
            Behavior::Flaky {
                failures: 1,
                status: 429,
                reply: "recovered answer".into(),
            },
        )),
        Arc::new(SimulatedProvider::new(
            "streamer",
            Behavior::Streaming("failover keeps the conversation going".into()),
        )),
        Arc::new(SimulatedProvider::new(
            "backup",
            Behavior::Healthy("backup answer".into()),
        )),
    ];
    ProviderRegistry::from_providers(providers)
}
