//! Shared test helpers for failover integration tests.

#![expect(dead_code, reason = "each test binary uses a different subset of helpers")]

use async_trait::async_trait;
use failover_engine::{EventSink, FailoverEngine, FailoverEvent};
use failover_models::{
    Capabilities, ChatProvider, ChatRequest, ChatResponse, ChunkStream, ProviderError,
    ProviderRegistry,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

// ═══════════════════════════════════════════════════════════════════════════════
// SCRIPTED PROVIDERS
// ═══════════════════════════════════════════════════════════════════════════════

/// What a scripted `complete` call does.
#[derive(Debug, Clone, Copy)]
pub enum Reply {
    Text(&'static str),
    Status(u16, &'static str),
    Message(&'static str),
    Hang,
}

/// One step of a scripted stream.
#[derive(Debug, Clone, Copy)]
pub enum Step {
    Chunk(&'static str),
    Status(u16, &'static str),
    Message(&'static str),
    Hang,
}

/// A provider whose behavior is fixed up front.
pub struct ScriptedProvider {
    id: &'static str,
    capabilities: Capabilities,
    reply: Reply,
    open_error: Option<(u16, &'static str)>,
    steps: Vec<Step>,
    calls: AtomicUsize,
    dropped: Arc<AtomicBool>,
}

impl ScriptedProvider {
    fn with(id: &'static str, capabilities: Capabilities) -> Self {
        Self {
            id,
            capabilities,
            reply: Reply::Text(""),
            open_error: None,
            steps: Vec::new(),
            calls: AtomicUsize::new(0),
            dropped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Completes successfully with `text`.
    pub fn replying(id: &'static str, text: &'static str) -> Arc<Self> {
        Arc::new(Self {
            reply: Reply::Text(text),
            ..Self::with(id, Capabilities::COMPLETE)
        })
    }

    /// Fails every completion with `status`.
    pub fn failing(id: &'static str, status: u16) -> Arc<Self> {
        Arc::new(Self {
            reply: Reply::Status(status, "upstream failure"),
            ..Self::with(id, Capabilities::COMPLETE)
        })
    }

    /// Completes with the given scripted reply.
    pub fn completing(id: &'static str, reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            ..Self::with(id, Capabilities::COMPLETE)
        })
    }

    /// Streams the given steps.
    pub fn streaming(id: &'static str, steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            steps,
            ..Self::with(id, Capabilities::STREAM)
        })
    }

    /// Fails to open its stream with `status`.
    pub fn refusing_stream(id: &'static str, status: u16) -> Arc<Self> {
        Arc::new(Self {
            open_error: Some((status, "stream refused")),
            ..Self::with(id, Capabilities::STREAM)
        })
    }

    /// Implements no chat operation.
    pub fn inert(id: &'static str) -> Arc<Self> {
        Arc::new(Self::with(id, Capabilities::NONE))
    }

    /// Number of times any operation was called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Whether an in-flight call was dropped before finishing.
    pub fn was_dropped(&self) -> bool {
        self.dropped.load(Ordering::SeqCst)
    }
}

/// Flags its owner as dropped unless disarmed.
struct DropFlag {
    flag: Arc<AtomicBool>,
    armed: bool,
}

impl DropFlag {
    fn new(flag: &Arc<AtomicBool>) -> Self {
        Self {
            flag: Arc::clone(flag),
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for DropFlag {
    fn drop(&mut self) {
        if self.armed {
            self.flag.store(true, Ordering::SeqCst);
        }
    }
}

#[async_trait]
impl ChatProvider for ScriptedProvider {
    fn id(&self) -> Option<&str> {
        Some(self.id)
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    async fn complete(&self, _request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut guard = DropFlag::new(&self.dropped);
        let result = match self.reply {
            Reply::Text(text) => Ok(ChatResponse::completion(text)),
            Reply::Status(status, message) => Err(ProviderError::status(status, message)),
            Reply::Message(message) => Err(ProviderError::message(message)),
            Reply::Hang => futures::future::pending().await,
        };
        guard.disarm();
        result
    }

    async fn stream(&self, _request: ChatRequest) -> Result<ChunkStream, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some((status, message)) = self.open_error {
            return Err(ProviderError::status(status, message));
        }
        let steps = self.steps.clone();
        let mut guard = DropFlag::new(&self.dropped);
        Ok(Box::pin(async_stream::stream! {
            for step in steps {
                match step {
                    Step::Chunk(text) => yield Ok(ChatResponse::text(text)),
                    Step::Status(status, message) => yield Err(ProviderError::status(status, message)),
                    Step::Message(message) => yield Err(ProviderError::message(message)),
                    Step::Hang => futures::future::pending::<()>().await,
                }
            }
            guard.disarm();
        }))
    }
}

/// Promotes generated text to the `'static` lifetime scripted replies use.
pub fn leaked(text: String) -> &'static str {
    Box::leak(text.into_boxed_str())
}

/// Views a scripted provider as a trait object sharing its identity.
pub fn dyn_provider(provider: &Arc<ScriptedProvider>) -> Arc<dyn ChatProvider> {
    Arc::clone(provider) as Arc<dyn ChatProvider>
}

// ═══════════════════════════════════════════════════════════════════════════════
// EVENT RECORDING
// ═══════════════════════════════════════════════════════════════════════════════

/// An owned summary of a [`FailoverEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded {
    Attempting {
        provider: String,
        prompt: String,
    },
    Succeeded {
        provider: String,
        preview: String,
        prior_failures: Vec<String>,
    },
    FailedRetrying(String),
    FailedTerminal {
        provider: String,
        locked_in: bool,
    },
    Skipped(String),
    AllExhausted(Vec<String>),
    Installed(Vec<String>),
    InstallSkipped {
        provider_count: usize,
        min_providers: usize,
    },
    InstallFailed,
}

impl Recorded {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Succeeded { .. } | Self::FailedTerminal { .. } | Self::AllExhausted(_)
        )
    }
}

/// Sink that keeps every event it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<Recorded>>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<Recorded> {
        self.events.lock().clone()
    }

    /// Ids of the providers that received an `attempting` event.
    pub fn attempted(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                Recorded::Attempting { provider, .. } => Some(provider.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn terminal(&self) -> Vec<Recorded> {
        self.events
            .lock()
            .iter()
            .filter(|event| event.is_terminal())
            .cloned()
            .collect()
    }
}

fn ids(failures: &[failover_engine::FailureRecord]) -> Vec<String> {
    failures.iter().map(|r| r.provider_id.clone()).collect()
}

impl EventSink for RecordingSink {
    fn record(&self, event: &FailoverEvent<'_>) {
        let recorded = match *event {
            FailoverEvent::Attempting {
                provider_id,
                prompt_preview,
            } => Recorded::Attempting {
                provider: provider_id.to_string(),
                prompt: prompt_preview.to_string(),
            },
            FailoverEvent::Succeeded {
                provider_id,
                response_preview,
                prior_failures,
            } => Recorded::Succeeded {
                provider: provider_id.to_string(),
                preview: response_preview.to_string(),
                prior_failures: ids(prior_failures),
            },
            FailoverEvent::FailedRetrying { provider_id, .. } => {
                Recorded::FailedRetrying(provider_id.to_string())
            }
            FailoverEvent::FailedTerminal {
                provider_id,
                locked_in,
                ..
            } => Recorded::FailedTerminal {
                provider: provider_id.to_string(),
                locked_in,
            },
            FailoverEvent::Skipped { provider_id } => Recorded::Skipped(provider_id.to_string()),
            FailoverEvent::AllExhausted { failures } => Recorded::AllExhausted(ids(failures)),
            FailoverEvent::Installed { provider_ids } => Recorded::Installed(provider_ids.to_vec()),
            FailoverEvent::InstallSkipped {
                provider_count,
                min_providers,
            } => Recorded::InstallSkipped {
                provider_count,
                min_providers,
            },
            FailoverEvent::InstallFailed { .. } => Recorded::InstallFailed,
        };
        self.events.lock().push(recorded);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// FIXTURES
// ═══════════════════════════════════════════════════════════════════════════════

/// Builds an engine over `providers` in the given order.
pub fn engine_over(providers: &[&Arc<ScriptedProvider>]) -> (FailoverEngine, RecordingSink) {
    let registry = ProviderRegistry::from_providers(providers.iter().map(|p| dyn_provider(p)));
    let sink = RecordingSink::default();
    let engine = FailoverEngine::new(Arc::new(registry), Arc::new(sink.clone()));
    (engine, sink)
}
