//! Request and response types exchanged with chat providers.

use crate::error::ContentError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ─────────────────────
// Request
// ─────────────────────

/// A chat completion request.
///
/// The request is forwarded verbatim to every provider tried during a
/// failover sequence. The engine only reads it to build a short prompt preview.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user prompt for this turn.
    pub prompt: Option<String>,
    /// Conversation session the request belongs to.
    pub session_id: Option<String>,
    /// Images attached to the prompt.
    #[serde(default)]
    pub image_urls: Vec<String>,
    /// Prior conversation turns.
    #[serde(default)]
    pub contexts: Vec<Message>,
    /// System prompt for the model.
    pub system_prompt: Option<String>,
    /// Model override, if the caller wants a specific model.
    pub model: Option<String>,
    /// Provider-specific named arguments.
    #[serde(default)]
    pub extra: Map<String, Value>,
}

impl ChatRequest {
    /// Creates a request carrying only a prompt.
    ///
    /// # Example
    ///
    /// ```rust
    /// use failover_models::ChatRequest;
    ///
    /// let request = ChatRequest::new("What's the weather like?");
    /// assert_eq!(request.prompt.as_deref(), Some("What's the weather like?"));
    /// ```
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            ..Self::default()
        }
    }

    /// Sets the session identifier.
    #[must_use]
    pub fn session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Sets the system prompt.
    #[must_use]
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system_prompt = Some(system.into());
        self
    }

    /// Adds conversation history before the current prompt.
    #[must_use]
    pub fn history(mut self, mut messages: Vec<Message>) -> Self {
        messages.append(&mut self.contexts);
        self.contexts = messages;
        self
    }

    /// Attaches an image URL.
    #[must_use]
    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.image_urls.push(url.into());
        self
    }

    /// Sets a named provider argument.
    #[must_use]
    pub fn arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Returns the first `max_chars` characters of the prompt.
    ///
    /// Falls back to a `prompt` named argument when no prompt is set, and to
    /// an empty string when neither exists.
    #[must_use]
    pub fn preview(&self, max_chars: usize) -> String {
        let source = match (&self.prompt, self.extra.get("prompt")) {
            (Some(prompt), _) => prompt.clone(),
            (None, Some(Value::String(prompt))) => prompt.clone(),
            (None, Some(Value::Null)) | (None, None) => return String::new(),
            (None, Some(other)) => other.to_string(),
        };
        truncate_chars(&source, max_chars)
    }
}

/// Returns the first `max_chars` characters of `text`.
///
/// Counts Unicode scalar values, never splitting a character.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}

// ─────────────────────
// Messages
// ─────────────────────

/// A prior turn in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    /// A message from the user.
    User {
        /// The message text.
        content: String,
    },
    /// A message from the assistant.
    Assistant {
        /// The message text.
        content: String,
    },
    /// A system instruction.
    System {
        /// The message text.
        content: String,
    },
}

impl Message {
    /// Creates a user message.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self::User {
            content: text.into(),
        }
    }

    /// Creates an assistant message.
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::Assistant {
            content: text.into(),
        }
    }

    /// Creates a system message.
    #[must_use]
    pub fn system(text: impl Into<String>) -> Self {
        Self::System {
            content: text.into(),
        }
    }
}

// ─────────────────────
// Message Chain
// ─────────────────────

/// One component of a structured reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Component {
    /// Plain text.
    Plain {
        /// The text content.
        text: String,
    },
    /// An image reference. Renders as nothing.
    Image {
        /// Where the image lives.
        url: String,
    },
    /// A mention of a user. Renders as `@name`.
    At {
        /// Display name of the mentioned user.
        name: String,
    },
    /// A quote of an earlier message. Renders as nothing.
    Reply {
        /// Identifier of the quoted message.
        message_id: String,
    },
    /// A component this crate does not understand.
    Unknown {
        /// The component kind reported by the provider.
        kind: String,
    },
}

/// A structured reply made of ordered components.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageChain {
    /// The components in display order.
    pub components: Vec<Component>,
}

impl MessageChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a plain-text component.
    #[must_use]
    pub fn plain(mut self, text: impl Into<String>) -> Self {
        self.components.push(Component::Plain { text: text.into() });
        self
    }

    /// Appends an arbitrary component.
    #[must_use]
    pub fn with(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    /// Returns `true` if the chain has no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Renders the chain as plain text.
    ///
    /// # Errors
    ///
    /// Returns a [`ContentError`] if the chain contains an
    /// [`Unknown`](Component::Unknown) component.
    pub fn to_plain_text(&self) -> Result<String, ContentError> {
        let mut out = String::new();
        for component in &self.components {
            match component {
                Component::Plain { text } => out.push_str(text),
                Component::At { name } => {
                    out.push('@');
                    out.push_str(name);
                }
                Component::Image { .. } | Component::Reply { .. } => {}
                Component::Unknown { kind } => {
                    return Err(ContentError { kind: kind.clone() });
                }
            }
        }
        Ok(out)
    }
}

// ─────────────────────
// Response
// ─────────────────────

/// A response (or a single streamed chunk) produced by a chat provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChatResponse {
    /// A completion with an optional structured chain and completion text.
    Completion {
        /// Structured reply, when the provider produces one.
        chain: Option<MessageChain>,
        /// The raw completion text.
        completion_text: Option<String>,
        /// Token usage information.
        #[serde(default)]
        usage: Usage,
    },
    /// A bare text value.
    Text {
        /// The text content.
        text: String,
    },
    /// Any other provider payload.
    Raw {
        /// The payload as JSON.
        value: Value,
    },
}

impl ChatResponse {
    /// Creates a completion carrying only completion text.
    #[must_use]
    pub fn completion(text: impl Into<String>) -> Self {
        Self::Completion {
            chain: None,
            completion_text: Some(text.into()),
            usage: Usage::default(),
        }
    }

    /// Creates a completion carrying a structured chain.
    #[must_use]
    pub fn chain(chain: MessageChain) -> Self {
        Self::Completion {
            chain: Some(chain),
            completion_text: None,
            usage: Usage::default(),
        }
    }

    /// Creates a bare text response.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Creates a raw JSON response.
    #[must_use]
    pub fn raw(value: Value) -> Self {
        Self::Raw { value }
    }
}

/// Token usage information.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Number of tokens in the input.
    pub input_tokens: Option<u64>,
    /// Number of tokens in the output.
    pub output_tokens: Option<u64>,
}

/// Typed access to the plain-text rendering of a value.
///
/// `None` means the value has no rendering at this level; callers fall back
/// to coarser renderings.
pub trait PlainText {
    /// Returns the plain-text rendering, if any.
    fn plain_text(&self) -> Option<String>;
}

impl PlainText for MessageChain {
    fn plain_text(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        self.to_plain_text().ok()
    }
}
