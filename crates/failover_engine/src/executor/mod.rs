//! Failover executors.
//!
//! Both executors walk an [`AttemptOrder`](crate::AttemptOrder) one provider
//! at a time and never race providers concurrently. They share the per-call
//! bookkeeping in [`Session`], which owns the call's failure records and
//! guarantees that exactly one terminal event is emitted.

mod atomic;
mod streaming;

pub use atomic::AtomicExecutor;
pub use streaming::StreamingExecutor;

use crate::classifier::ErrorClassifier;
use crate::config::FailoverConfig;
use crate::error::{FailoverError, FailureCause, FailureRecord};
use crate::events::{EventSink, FailoverEvent};
use crate::extract::response_text;
use failover_models::{ChatRequest, ChatResponse, ProviderError, truncate_chars};
use std::sync::Arc;

/// Shared, immutable state used by every call an executor runs.
#[derive(Clone)]
pub struct ExecutorContext {
    classifier: ErrorClassifier,
    sink: Arc<dyn EventSink>,
    prompt_preview_chars: usize,
    response_preview_chars: usize,
}

impl ExecutorContext {
    /// Creates a context from `config`, reporting events to `sink`.
    #[must_use]
    pub fn new(config: &FailoverConfig, sink: Arc<dyn EventSink>) -> Self {
        Self {
            classifier: ErrorClassifier::from_config(config),
            sink,
            prompt_preview_chars: config.prompt_preview_chars,
            response_preview_chars: config.response_preview_chars,
        }
    }

    /// The classifier deciding which failures may fail over.
    #[must_use]
    pub fn classifier(&self) -> &ErrorClassifier {
        &self.classifier
    }

    /// Emits an event that is not tied to a call.
    pub fn emit(&self, event: &FailoverEvent<'_>) {
        self.sink.record(event);
    }

    pub(crate) fn session(&self, request: &ChatRequest) -> Session<'_> {
        Session {
            ctx: self,
            prompt_preview: request.preview(self.prompt_preview_chars),
            failures: Vec::new(),
        }
    }
}

impl core::fmt::Debug for ExecutorContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ExecutorContext")
            .field("classifier", &self.classifier)
            .field("prompt_preview_chars", &self.prompt_preview_chars)
            .field("response_preview_chars", &self.response_preview_chars)
            .finish_non_exhaustive()
    }
}

/// Bookkeeping for a single call.
pub(crate) struct Session<'a> {
    ctx: &'a ExecutorContext,
    prompt_preview: String,
    failures: Vec<FailureRecord>,
}

impl Session<'_> {
    pub(crate) fn attempting(&self, provider_id: &str) {
        self.ctx.emit(&FailoverEvent::Attempting {
            provider_id,
            prompt_preview: &self.prompt_preview,
        });
    }

    /// Truncated plain-text preview of a response or chunk.
    pub(crate) fn response_preview(&self, response: &ChatResponse) -> String {
        truncate_chars(&response_text(Some(response)), self.ctx.response_preview_chars)
    }

    pub(crate) fn succeeded(&self, provider_id: &str, response_preview: &str) {
        self.ctx.emit(&FailoverEvent::Succeeded {
            provider_id,
            response_preview,
            prior_failures: &self.failures,
        });
    }

    /// Passes over a provider that has no usable chat operation.
    pub(crate) fn skip(&mut self, provider_id: &str) {
        self.ctx.emit(&FailoverEvent::Skipped { provider_id });
        self.failures.push(FailureRecord {
            provider_id: provider_id.to_string(),
            cause: FailureCause::MissingCapability,
        });
    }

    /// Handles a failure that happened before the provider produced output.
    ///
    /// Returns `Ok(())` when the next provider should be tried. Otherwise the
    /// terminal event has been emitted and the returned error ends the call.
    pub(crate) fn fail(
        &mut self,
        provider_id: &str,
        error: ProviderError,
        is_last: bool,
    ) -> Result<(), FailoverError> {
        if !self.ctx.classifier.should_failover(&error) {
            self.ctx.emit(&FailoverEvent::FailedTerminal {
                provider_id,
                error: &error,
                locked_in: false,
            });
            return Err(FailoverError::Provider {
                provider_id: provider_id.to_string(),
                source: error,
            });
        }

        if !is_last {
            self.ctx.emit(&FailoverEvent::FailedRetrying {
                provider_id,
                error: &error,
            });
        }
        self.failures.push(FailureRecord {
            provider_id: provider_id.to_string(),
            cause: FailureCause::Provider(error),
        });
        if is_last {
            return Err(self.exhausted());
        }
        Ok(())
    }

    /// Handles a failure after the provider already produced output.
    pub(crate) fn locked_in(&self, provider_id: &str, error: ProviderError) -> FailoverError {
        self.ctx.emit(&FailoverEvent::FailedTerminal {
            provider_id,
            error: &error,
            locked_in: true,
        });
        FailoverError::Provider {
            provider_id: provider_id.to_string(),
            source: error,
        }
    }

    /// Ends a call in which no provider answered.
    pub(crate) fn exhausted(&mut self) -> FailoverError {
        self.ctx.emit(&FailoverEvent::AllExhausted {
            failures: &self.failures,
        });
        if self.failures.is_empty() {
            FailoverError::NoProviderAvailable
        } else {
            FailoverError::Exhausted {
                failures: std::mem::take(&mut self.failures),
            }
        }
    }
}
