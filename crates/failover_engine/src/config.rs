//! Failover configuration.

use serde::{Deserialize, Serialize};

/// Status codes that make a provider failure retry-eligible.
pub const DEFAULT_RETRY_STATUS_CODES: [u16; 10] =
    [401, 402, 403, 408, 409, 429, 500, 502, 503, 504];

/// Message fragments that make a provider failure retry-eligible.
pub const DEFAULT_RETRY_KEYWORDS: [&str; 8] = [
    "rate limit",
    "too many requests",
    "429",
    "401",
    "invalid api key",
    "timeout",
    "timed out",
    "connection reset",
];

/// Configuration for the failover engine.
///
/// Every field has a default, so partial documents deserialize:
///
/// ```
/// use failover_engine::FailoverConfig;
///
/// let config = FailoverConfig::from_json(r#"{ "response_preview_chars": 40 }"#).unwrap();
/// assert_eq!(config.response_preview_chars, 40);
/// assert_eq!(config.prompt_preview_chars, 80);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FailoverConfig {
    /// Provider status codes that allow failing over to the next provider.
    pub retry_status_codes: Vec<u16>,
    /// Case-insensitive message fragments that allow failing over.
    pub retry_keywords: Vec<String>,
    /// Characters of the prompt included in `attempting` events.
    pub prompt_preview_chars: usize,
    /// Characters of the response included in `succeeded` events.
    pub response_preview_chars: usize,
    /// Minimum number of chat providers required before failover is installed.
    pub min_providers: usize,
}

impl Default for FailoverConfig {
    fn default() -> Self {
        Self {
            retry_status_codes: DEFAULT_RETRY_STATUS_CODES.to_vec(),
            retry_keywords: DEFAULT_RETRY_KEYWORDS.iter().map(|k| (*k).to_string()).collect(),
            prompt_preview_chars: 80,
            response_preview_chars: 120,
            min_providers: 2,
        }
    }
}

impl FailoverConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON, defaulting missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid JSON or a field has the
    /// wrong type.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Replaces the retry-eligible status codes.
    #[must_use]
    pub fn with_retry_status_codes(mut self, codes: impl IntoIterator<Item = u16>) -> Self {
        self.retry_status_codes = codes.into_iter().collect();
        self
    }

    /// Replaces the retry-eligible message fragments.
    #[must_use]
    pub fn with_retry_keywords<S: Into<String>>(
        mut self,
        keywords: impl IntoIterator<Item = S>,
    ) -> Self {
        self.retry_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the prompt preview length.
    #[must_use]
    pub fn with_prompt_preview_chars(mut self, chars: usize) -> Self {
        self.prompt_preview_chars = chars;
        self
    }

    /// Sets the response preview length.
    #[must_use]
    pub fn with_response_preview_chars(mut self, chars: usize) -> Self {
        self.response_preview_chars = chars;
        self
    }

    /// Sets the minimum provider count for installation.
    #[must_use]
    pub fn with_min_providers(mut self, count: usize) -> Self {
        self.min_providers = count;
        self
    }
}
