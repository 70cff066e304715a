//! Human-readable rendering of failover events.

use failover_engine::{FailoverEvent, summarize};

/// Shown in place of an empty prompt preview.
pub const EMPTY_PREVIEW: &str = "[empty]";

/// Renders an event as a single log message.
///
/// ```
/// use failover_engine::FailoverEvent;
/// use failover_log::render_event;
///
/// let message = render_event(&FailoverEvent::Attempting {
///     provider_id: "openai",
///     prompt_preview: "",
/// });
/// assert_eq!(message, "attempting provider openai, prompt: [empty]");
/// ```
#[must_use]
pub fn render_event(event: &FailoverEvent<'_>) -> String {
    match *event {
        FailoverEvent::Attempting {
            provider_id,
            prompt_preview,
        } => {
            let prompt = if prompt_preview.is_empty() {
                EMPTY_PREVIEW
            } else {
                prompt_preview
            };
            format!("attempting provider {provider_id}, prompt: {prompt}")
        }
        FailoverEvent::Succeeded {
            provider_id,
            response_preview,
            prior_failures,
        } => {
            let mut message = format!("provider {provider_id} succeeded");
            if !prior_failures.is_empty() {
                message.push_str("; earlier failures: ");
                message.push_str(&summarize(prior_failures, ", "));
            }
            if !response_preview.is_empty() {
                message.push_str("; preview: ");
                message.push_str(response_preview);
            }
            message
        }
        FailoverEvent::FailedRetrying { provider_id, error } => {
            format!("provider {provider_id} failed: {error}; trying next provider")
        }
        FailoverEvent::FailedTerminal {
            provider_id,
            error,
            locked_in: false,
        } => format!("provider {provider_id} failed and cannot fail over: {error}"),
        FailoverEvent::FailedTerminal {
            provider_id,
            error,
            locked_in: true,
        } => format!("provider {provider_id} failed after streaming output: {error}"),
        FailoverEvent::Skipped { provider_id } => {
            format!("provider {provider_id} has no usable chat operation; skipping")
        }
        FailoverEvent::AllExhausted { failures: [] } => "no chat provider available".to_string(),
        FailoverEvent::AllExhausted { failures } => {
            format!("all providers failed: {}", summarize(failures, "; "))
        }
        FailoverEvent::Installed { provider_ids } => {
            format!("failover enabled, provider order: {}", provider_ids.join(", "))
        }
        FailoverEvent::InstallSkipped {
            provider_count,
            min_providers,
        } => format!(
            "found {provider_count} chat provider(s), need {min_providers}; failover not enabled"
        ),
        FailoverEvent::InstallFailed { error } => {
            format!("failed to install failover, cannot list providers: {error}")
        }
    }
}
