//! Failure bookkeeping and the errors surfaced by failover calls.

use core::fmt;
use failover_models::{ProviderError, SourceError};

/// Why a provider was passed over during a failover sequence.
#[derive(Debug, thiserror::Error)]
pub enum FailureCause {
    /// The provider call failed with a retry-eligible error.
    #[error(transparent)]
    Provider(ProviderError),

    /// The provider exposes no chat operation usable for this call.
    #[error("provider exposes no usable chat operation")]
    MissingCapability,
}

/// A provider id paired with the failure it produced.
///
/// Records are kept for diagnostics only; they never influence whether a
/// later provider's failure is retried.
#[derive(Debug)]
pub struct FailureRecord {
    /// Identifier of the provider that failed.
    pub provider_id: String,
    /// What went wrong.
    pub cause: FailureCause,
}

impl FailureRecord {
    /// Returns the provider error, unless the provider was skipped for lack of
    /// a chat operation.
    #[must_use]
    pub fn provider_error(&self) -> Option<&ProviderError> {
        match &self.cause {
            FailureCause::Provider(err) => Some(err),
            FailureCause::MissingCapability => None,
        }
    }
}

impl fmt::Display for FailureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.provider_id, self.cause)
    }
}

/// Joins failure records as `id: error` pairs.
#[must_use]
pub fn summarize(failures: &[FailureRecord], separator: &str) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

/// The error returned by a failover call.
#[derive(Debug, thiserror::Error)]
pub enum FailoverError {
    /// A provider failed and failover was not allowed: the error was not
    /// retry-eligible, or the provider had already streamed output.
    #[error("provider '{provider_id}' failed: {source}")]
    Provider {
        /// Identifier of the failing provider.
        provider_id: String,
        /// The provider's error, unchanged.
        #[source]
        source: ProviderError,
    },

    /// The attempt order contained no provider.
    #[error("no chat provider available")]
    NoProviderAvailable,

    /// Every provider in the attempt order failed or was skipped.
    ///
    /// `failures` is never empty; its last entry is the failure being raised.
    #[error("all providers failed; last failure from {}", last_summary(.failures))]
    Exhausted {
        /// Failures in attempt order.
        failures: Vec<FailureRecord>,
    },

    /// The provider source could not list chat providers.
    #[error(transparent)]
    Source(#[from] SourceError),
}

fn last_summary(failures: &[FailureRecord]) -> String {
    failures
        .last()
        .map_or_else(|| "<none>".to_string(), ToString::to_string)
}

impl FailoverError {
    /// Returns the provider error that ended the call.
    ///
    /// For [`Exhausted`](Self::Exhausted) this is the last recorded failure.
    #[must_use]
    pub fn provider_error(&self) -> Option<&ProviderError> {
        match self {
            Self::Provider { source, .. } => Some(source),
            Self::Exhausted { failures } => failures.last().and_then(FailureRecord::provider_error),
            Self::NoProviderAvailable | Self::Source(_) => None,
        }
    }

    /// Returns the id of the provider whose failure ended the call.
    #[must_use]
    pub fn provider_id(&self) -> Option<&str> {
        match self {
            Self::Provider { provider_id, .. } => Some(provider_id),
            Self::Exhausted { failures } => failures.last().map(|r| r.provider_id.as_str()),
            Self::NoProviderAvailable | Self::Source(_) => None,
        }
    }

    /// Returns the failures accumulated before the call ended.
    #[must_use]
    pub fn failures(&self) -> &[FailureRecord] {
        match self {
            Self::Exhausted { failures } => failures,
            _ => &[],
        }
    }
}

/// Surfaces provider-originated failures unchanged; everything else is
/// wrapped as an opaque [`ProviderError::Provider`].
impl From<FailoverError> for ProviderError {
    fn from(err: FailoverError) -> Self {
        match err {
            FailoverError::Provider { source, .. } => source,
            FailoverError::Exhausted { mut failures } => match failures.pop() {
                Some(FailureRecord {
                    cause: FailureCause::Provider(source),
                    ..
                }) => source,
                last => {
                    failures.extend(last);
                    wrap(FailoverError::Exhausted { failures })
                }
            },
            other => wrap(other),
        }
    }
}

fn wrap(err: FailoverError) -> ProviderError {
    ProviderError::Provider {
        status: None,
        message: err.to_string(),
        source: Some(Box::new(err)),
    }
}
