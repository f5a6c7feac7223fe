//! Request and response types for the messages endpoint.

use serde::{Deserialize, Serialize};

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The calling application / end user.
    User,
    /// The model.
    Assistant,
}

/// One role-tagged turn in a conversation. Turn order is significant and is
/// preserved as given; turns are never deduplicated or reordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role of the speaker.
    pub role: Role,
    /// Text content of the turn.
    pub content: String,
}

impl Message {
    /// A user turn.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// An assistant turn (for priming multi-turn conversations).
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A request against the messages endpoint.
///
/// The streaming flag is not part of this type — [`crate::Client::stream`]
/// injects it on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct MessageRequest {
    /// Model identifier, e.g. `claude-3-5-sonnet-20241022`.
    pub model: String,
    /// Maximum number of output tokens.
    pub max_tokens: u32,
    /// Ordered conversation turns.
    pub messages: Vec<Message>,
    /// Optional system instruction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// Optional sampling temperature (lower = more deterministic).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl MessageRequest {
    /// Create a request for `model` with the given conversation.
    #[must_use]
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            max_tokens: 1024,
            messages,
            system: None,
            temperature: None,
        }
    }

    /// Set the output token limit.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set a system instruction.
    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// One content block of a response.
///
/// Text is the only kind produced today; blocks of other kinds deserialize
/// with `text: None` and are skipped by [`MessagesResponse::text`] instead of
/// failing the whole response.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentBlock {
    /// Block kind as reported by the service.
    #[serde(rename = "type")]
    pub kind: String,
    /// Text payload, when present.
    #[serde(default)]
    pub text: Option<String>,
}

/// Token accounting reported by the service.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Usage {
    /// Tokens consumed by the request.
    #[serde(default)]
    pub input_tokens: u64,
    /// Tokens generated in the response.
    #[serde(default)]
    pub output_tokens: u64,
}

/// A completed (non-streamed) response.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
    /// Server-assigned message ID.
    pub id: String,
    /// Model that produced the response.
    pub model: String,
    /// Ordered content blocks.
    pub content: Vec<ContentBlock>,
    /// Why generation stopped (`end_turn`, `max_tokens`, …).
    #[serde(default)]
    pub stop_reason: Option<String>,
    /// Token accounting.
    #[serde(default)]
    pub usage: Usage,
}

impl MessagesResponse {
    /// Concatenate the text of all blocks that carry text.
    #[must_use]
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| block.text.as_deref())
            .collect()
    }
}
