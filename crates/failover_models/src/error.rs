//! Error types for chat providers and provider sources.

use core::time::Duration;

/// Errors raised by a chat provider call.
///
/// Providers map their transport and API failures onto these variants. The
/// failover engine only inspects [`status_code`](Self::status_code) and the
/// rendered message; everything else is carried through untouched.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Http error (e.g.: connection error, connection reset, etc.)
    #[error("http error: {0}")]
    Http(String),

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Authentication failed.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Rate limited by the provider.
    #[error("rate limited{}", .retry_after.map(|d| format!(", retry after {d:?}")).unwrap_or_default())]
    RateLimited {
        /// Suggested time to wait before retrying.
        retry_after: Option<Duration>,
    },

    /// The provider did not answer in time.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The request was rejected as malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Error parsing the response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The provider does not implement the requested operation.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    /// Error returned by the model provider.
    #[error("provider error: {message}")]
    Provider {
        /// HTTP status code if available.
        status: Option<u16>,
        /// Error message.
        message: String,
        /// The underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ProviderError {
    /// Creates a [`ProviderError::Provider`] carrying an HTTP status code.
    #[must_use]
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Provider {
            status: Some(status),
            message: message.into(),
            source: None,
        }
    }

    /// Creates a [`ProviderError::Provider`] without a status code.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Provider {
            status: None,
            message: message.into(),
            source: None,
        }
    }

    /// Returns the numeric status code carried by this error, if any.
    ///
    /// [`RateLimited`](Self::RateLimited) always reports `429`.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Provider { status, .. } => *status,
            Self::RateLimited { .. } => Some(429),
            _ => None,
        }
    }
}

/// Failure to enumerate the chat providers known to a host.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The host has not finished loading its providers.
    #[error("provider source is not ready: {0}")]
    NotReady(String),

    /// Any other failure reported by the host.
    #[error("failed to list chat providers: {0}")]
    Other(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A message chain component could not be rendered as plain text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("component '{kind}' has no plain-text rendering")]
pub struct ContentError {
    /// The kind of the offending component.
    pub kind: String,
}
