//! Completion backends.
//!
//! Classification is a single-shot exchange: an optional system prompt, one
//! user prompt and a short completion back. Backends speak whatever wire
//! format their provider needs behind [`LlmBackend`].

use crate::error::LlmError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmRequest {
    pub prompt: String,
    pub system: Option<String>,
    /// Sampling temperature; provider default when unset.
    pub temperature: Option<f32>,
    /// Completion length cap; provider default when unset.
    pub max_tokens: Option<u32>,
}

impl LlmRequest {
    /// Creates a request carrying only the user prompt.
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system: None,
            temperature: None,
            max_tokens: None,
        }
    }

    #[must_use]
    pub fn with_system(self, system: impl Into<String>) -> Self {
        Self {
            system: Some(system.into()),
            ..self
        }
    }

    #[must_use]
    pub fn with_temperature(self, temperature: f32) -> Self {
        Self {
            temperature: Some(temperature),
            ..self
        }
    }

    #[must_use]
    pub fn with_max_tokens(self, max_tokens: u32) -> Self {
        Self {
            max_tokens: Some(max_tokens),
            ..self
        }
    }

    /// Chat transcript for chat-style providers: system first when present.
    #[must_use]
    pub fn messages(&self) -> Vec<LlmMessage> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &self.system {
            messages.push(LlmMessage::system(system.as_str()));
        }
        messages.push(LlmMessage::user(self.prompt.as_str()));
        messages
    }
}

/// A chat message as sent to chat-style providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmMessage {
    pub role: MessageRole,
    pub content: String,
}

impl LlmMessage {
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Who a chat message is from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
}

/// The completion a backend produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmResponse {
    pub content: String,
    /// Model the provider says answered, which may be more specific than
    /// the one requested.
    pub model: Option<String>,
    pub usage: TokenUsage,
}

/// Tokens billed for one exchange. Zero when the provider does not report
/// usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl TokenUsage {
    #[must_use]
    pub fn total(&self) -> u32 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

/// A provider able to complete prompts.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Runs one completion.
    ///
    /// # Errors
    ///
    /// Returns an error for transport failures, non-success statuses and
    /// unreadable responses.
    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError>;

    /// Model requests are sent to.
    fn model(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_fill_optional_fields() {
        let request = LlmRequest::new("Intent:")
            .with_system("classify")
            .with_temperature(0.0)
            .with_max_tokens(10);

        assert_eq!(request.system.as_deref(), Some("classify"));
        assert_eq!(request.temperature, Some(0.0));
        assert_eq!(request.max_tokens, Some(10));
        assert_eq!(request.prompt, "Intent:");
    }

    #[test]
    fn messages_put_system_first() {
        let request = LlmRequest::new("hello").with_system("rules");
        let messages = request.messages();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], LlmMessage::system("rules"));
        assert_eq!(messages[1], LlmMessage::user("hello"));
    }

    #[test]
    fn messages_without_system() {
        let messages = LlmRequest::new("hello").messages();
        assert_eq!(messages, vec![LlmMessage::user("hello")]);
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&MessageRole::System).expect("serialize");
        assert_eq!(json, "\"system\"");
    }

    #[test]
    fn usage_total_saturates() {
        let usage = TokenUsage {
            input_tokens: u32::MAX,
            output_tokens: 3,
        };
        assert_eq!(usage.total(), u32::MAX);
    }
}
