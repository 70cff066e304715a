//! Structured events emitted while a failover call runs.
//!
//! Every call emits exactly one [`Attempting`](FailoverEvent::Attempting) per
//! provider it actually tries and exactly one terminal event:
//! [`Succeeded`](FailoverEvent::Succeeded),
//! [`FailedTerminal`](FailoverEvent::FailedTerminal) or
//! [`AllExhausted`](FailoverEvent::AllExhausted).
//!
//! # Example
//!
//! ```
//! use failover_engine::{EventSink, FailoverEvent};
//!
//! fn handle_event(event: &FailoverEvent<'_>) {
//!     match event {
//!         FailoverEvent::Attempting { provider_id, .. } => {
//!             println!("trying {provider_id}");
//!         }
//!         FailoverEvent::Succeeded { provider_id, prior_failures, .. } => {
//!             println!("{provider_id} answered after {} failures", prior_failures.len());
//!         }
//!         _ => {}
//!     }
//! }
//!
//! let sink: &dyn EventSink = &handle_event;
//! # let _ = sink;
//! ```

use crate::error::FailureRecord;
use failover_models::{ProviderError, SourceError};

/// Unified event enum for failover calls and installation.
#[derive(Debug, Clone, Copy)]
pub enum FailoverEvent<'a> {
    // ─────────────────────────────────────────────────────────────────────────
    // Call Events
    // ─────────────────────────────────────────────────────────────────────────
    /// A provider is about to be called.
    Attempting {
        /// The provider being tried.
        provider_id: &'a str,
        /// The first characters of the prompt.
        prompt_preview: &'a str,
    },

    /// A provider returned a response, or finished its stream. Terminal.
    Succeeded {
        /// The provider that answered.
        provider_id: &'a str,
        /// The first characters of the response (or first chunk).
        response_preview: &'a str,
        /// Failures recorded before this provider answered.
        prior_failures: &'a [FailureRecord],
    },

    /// A provider failed with a retry-eligible error; the next one will be tried.
    FailedRetrying {
        /// The provider that failed.
        provider_id: &'a str,
        /// Its error.
        error: &'a ProviderError,
    },

    /// A provider failed and the call ends with its error. Terminal.
    FailedTerminal {
        /// The provider that failed.
        provider_id: &'a str,
        /// Its error.
        error: &'a ProviderError,
        /// The provider had already streamed output, so failover was disallowed.
        locked_in: bool,
    },

    /// A provider exposes no usable chat operation and was passed over.
    Skipped {
        /// The skipped provider.
        provider_id: &'a str,
    },

    /// Every provider failed or was skipped. Terminal.
    ///
    /// `failures` is empty when there was no provider to attempt at all.
    AllExhausted {
        /// Failures in attempt order.
        failures: &'a [FailureRecord],
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Installation Events
    // ─────────────────────────────────────────────────────────────────────────
    /// Failover wrappers were created for these providers.
    Installed {
        /// Wrapped provider ids, in registry order.
        provider_ids: &'a [String],
    },

    /// Too few chat providers exist for failover to be useful.
    InstallSkipped {
        /// Chat providers found.
        provider_count: usize,
        /// Chat providers required.
        min_providers: usize,
    },

    /// The provider source could not be queried during installation.
    InstallFailed {
        /// The source's error.
        error: &'a SourceError,
    },
}

impl FailoverEvent<'_> {
    /// Returns `true` for events that end a call.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Succeeded { .. } | Self::FailedTerminal { .. } | Self::AllExhausted { .. }
        )
    }

    /// Short, stable name of the event kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Attempting { .. } => "attempting",
            Self::Succeeded { .. } => "succeeded",
            Self::FailedRetrying { .. } => "failed_retrying",
            Self::FailedTerminal { .. } => "failed_terminal",
            Self::Skipped { .. } => "skipped",
            Self::AllExhausted { .. } => "all_exhausted",
            Self::Installed { .. } => "installed",
            Self::InstallSkipped { .. } => "install_skipped",
            Self::InstallFailed { .. } => "install_failed",
        }
    }
}

/// Receives failover events.
///
/// Sinks are called synchronously on the calling task and must not block for
/// long. Closures taking `&FailoverEvent` implement this trait.
pub trait EventSink: Send + Sync + 'static {
    /// Records one event.
    fn record(&self, event: &FailoverEvent<'_>);
}

impl<F> EventSink for F
where
    F: Fn(&FailoverEvent<'_>) + Send + Sync + 'static,
{
    fn record(&self, event: &FailoverEvent<'_>) {
        self(event);
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn record(&self, _event: &FailoverEvent<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn terminal_classification() {
        let error = ProviderError::message("x");
        assert!(
            FailoverEvent::Succeeded {
                provider_id: "a",
                response_preview: "",
                prior_failures: &[],
            }
            .is_terminal()
        );
        assert!(
            FailoverEvent::FailedTerminal {
                provider_id: "a",
                error: &error,
                locked_in: false,
            }
            .is_terminal()
        );
        assert!(FailoverEvent::AllExhausted { failures: &[] }.is_terminal());
        assert!(
            !FailoverEvent::FailedRetrying {
                provider_id: "a",
                error: &error,
            }
            .is_terminal()
        );
        assert!(!FailoverEvent::Skipped { provider_id: "a" }.is_terminal());
    }

    #[test]
    fn closures_are_sinks() {
        static SEEN: AtomicUsize = AtomicUsize::new(0);
        let sink = |_: &FailoverEvent<'_>| {
            SEEN.fetch_add(1, Ordering::SeqCst);
        };
        sink.record(&FailoverEvent::Skipped { provider_id: "a" });
        EventSink::record(&sink, &FailoverEvent::Skipped { provider_id: "b" });
        assert_eq!(SEEN.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn kinds_are_distinct() {
        let error = ProviderError::message("x");
        let kinds: Vec<_> = [
            FailoverEvent::Attempting {
                provider_id: "a",
                prompt_preview: "",
            },
            FailoverEvent::FailedRetrying {
                provider_id: "a",
                error: &error,
            },
            FailoverEvent::InstallSkipped {
                provider_count: 1,
                min_providers: 2,
            },
        ]
        .iter()
        .map(FailoverEvent::kind)
        .collect();
        assert_eq!(kinds, vec!["attempting", "failed_retrying", "install_skipped"]);
        NoopSink.record(&FailoverEvent::AllExhausted { failures: &[] });
    }
}
