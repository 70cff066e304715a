//! Decides which provider failures are safe to fail over from.

use crate::config::FailoverConfig;
use failover_models::ProviderError;

/// Classifies provider errors as retry-eligible or not.
///
/// A failure is retry-eligible when its status code is in the configured set,
/// or when its rendered message contains one of the configured keywords
/// (case-insensitive). Anything else likely reflects a caller bug that would
/// reproduce on every provider, so the engine fails fast on it.
///
/// ```
/// use failover_engine::ErrorClassifier;
/// use failover_models::ProviderError;
///
/// let classifier = ErrorClassifier::default();
/// assert!(classifier.should_failover(&ProviderError::status(503, "unavailable")));
/// assert!(classifier.should_failover(&ProviderError::message("Connection reset by peer")));
/// assert!(!classifier.should_failover(&ProviderError::InvalidRequest("bad schema".into())));
/// ```
#[derive(Debug, Clone)]
pub struct ErrorClassifier {
    status_codes: Vec<u16>,
    // Stored lowercased.
    keywords: Vec<String>,
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::from_config(&FailoverConfig::default())
    }
}

impl ErrorClassifier {
    /// Builds a classifier from the retry settings of `config`.
    #[must_use]
    pub fn from_config(config: &FailoverConfig) -> Self {
        Self {
            status_codes: config.retry_status_codes.clone(),
            keywords: config
                .retry_keywords
                .iter()
                .filter(|k| !k.is_empty())
                .map(|k| k.to_lowercase())
                .collect(),
        }
    }

    /// Returns `true` if the engine may try the next provider after `err`.
    #[must_use]
    pub fn should_failover(&self, err: &ProviderError) -> bool {
        if err
            .status_code()
            .is_some_and(|code| self.status_codes.contains(&code))
        {
            return true;
        }
        let message = err.to_string().to_lowercase();
        self.keywords.iter().any(|keyword| message.contains(keyword))
    }
}
