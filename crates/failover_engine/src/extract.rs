//! Best-effort plain-text previews of provider responses.

use failover_models::{ChatResponse, PlainText};
use serde_json::Value;

/// Renders a response as plain text for logging.
///
/// Resolution order, first hit wins:
/// 1. the structured chain's plain-text rendering,
/// 2. the completion text (empty when absent),
/// 3. a bare text response,
/// 4. a JSON rendering of any other payload.
///
/// Never fails: anything that cannot be rendered falls through to the next
/// step, ending at an empty string. Truncation is left to the caller.
#[must_use]
pub fn response_text(response: Option<&ChatResponse>) -> String {
    let Some(response) = response else {
        return String::new();
    };
    match response {
        ChatResponse::Completion {
            chain,
            completion_text,
            ..
        } => chain
            .as_ref()
            .and_then(PlainText::plain_text)
            .or_else(|| completion_text.clone())
            .unwrap_or_default(),
        ChatResponse::Text { text } => text.clone(),
        ChatResponse::Raw { value } => render_value(value),
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use failover_models::{Component, MessageChain, Usage};
    use serde_json::json;

    #[test]
    fn none_is_empty() {
        assert_eq!(response_text(None), "");
    }

    #[test]
    fn chain_wins_over_completion_text() {
        let response = ChatResponse::Completion {
            chain: Some(MessageChain::new().plain("from chain")),
            completion_text: Some("from text".into()),
            usage: Usage::default(),
        };
        assert_eq!(response_text(Some(&response)), "from chain");
    }

    #[test]
    fn unrenderable_chain_falls_through() {
        let response = ChatResponse::Completion {
            chain: Some(MessageChain::new().with(Component::Unknown {
                kind: "voice".into(),
            })),
            completion_text: Some("fallback".into()),
            usage: Usage::default(),
        };
        assert_eq!(response_text(Some(&response)), "fallback");
    }

    #[test]
    fn empty_chain_falls_through() {
        let response = ChatResponse::Completion {
            chain: Some(MessageChain::new()),
            completion_text: Some("text".into()),
            usage: Usage::default(),
        };
        assert_eq!(response_text(Some(&response)), "text");
    }

    #[test]
    fn missing_completion_text_is_empty() {
        let response = ChatResponse::Completion {
            chain: None,
            completion_text: None,
            usage: Usage::default(),
        };
        assert_eq!(response_text(Some(&response)), "");
    }

    #[test]
    fn bare_text() {
        assert_eq!(response_text(Some(&ChatResponse::text("hi"))), "hi");
    }

    #[test]
    fn raw_values() {
        assert_eq!(response_text(Some(&ChatResponse::raw(json!("s")))), "s");
        assert_eq!(response_text(Some(&ChatResponse::raw(Value::Null))), "");
        assert_eq!(
            response_text(Some(&ChatResponse::raw(json!({"delta": "x"})))),
            r#"{"delta":"x"}"#
        );
    }
}
