//! OpenAI-compatible chat-completions backend.

use crate::backend::{LlmBackend, LlmMessage, LlmRequest, LlmResponse, TokenUsage};
use crate::error::LlmError;
use async_trait::async_trait;
use chatflow_core::Result;
use reqwest::Client;
use reqwest::header::RETRY_AFTER;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Connection settings for an OpenAI-compatible API.
#[derive(Clone, Deserialize)]
pub struct OpenAiConfig {
    /// Bearer token. Blank disables classification.
    #[serde(default)]
    pub api_key: String,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Full chat-completions endpoint URL.
    #[serde(default = "default_url")]
    pub url: String,

    /// Upper bound on a single classification, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            url: default_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl OpenAiConfig {
    /// Returns true if an API key is present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Returns the request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &if self.is_configured() { "<redacted>" } else { "" })
            .field("model", &self.model)
            .field("url", &self.url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Backend speaking the chat-completions protocol.
#[derive(Debug, Clone)]
pub struct OpenAiBackend {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiBackend {
    /// Creates a backend from its configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: OpenAiConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| LlmError::InvalidConfig {
                reason: e.to_string(),
            })?;
        Ok(Self { client, config })
    }

    fn chat_body<'a>(&'a self, request: &LlmRequest) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.config.model,
            messages: request.messages(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

#[async_trait]
impl LlmBackend for OpenAiBackend {
    async fn generate(&self, request: &LlmRequest) -> std::result::Result<LlmResponse, LlmError> {
        let response = self
            .client
            .post(&self.config.url)
            .bearer_auth(&self.config.api_key)
            .json(&self.chat_body(request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout {
                        after_secs: self.config.timeout_secs,
                    }
                } else {
                    LlmError::Transport {
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        let retry_after_secs = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok());
        let body = response.text().await.map_err(|e| LlmError::Transport {
            reason: e.to_string(),
        })?;

        if status.as_u16() == 429 {
            return Err(LlmError::RateLimited { retry_after_secs });
        }
        if !status.is_success() {
            return Err(LlmError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        let parsed = parse_completion(&body)?;
        debug!(
            model = parsed.model.as_deref().unwrap_or(self.config.model.as_str()),
            total_tokens = parsed.usage.total(),
            "chat completion received"
        );
        Ok(parsed)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<LlmMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    model: Option<String>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
    /// Legacy completions put the answer here.
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// Extracts the first choice's text from a completion body.
fn parse_completion(body: &str) -> std::result::Result<LlmResponse, LlmError> {
    let response: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| LlmError::ResponseParseFailed {
            reason: e.to_string(),
        })?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(LlmError::EmptyResponse)?;
    let content = match choice.message {
        Some(message) => message.content.unwrap_or_default(),
        None => choice.text.unwrap_or_default(),
    };

    Ok(LlmResponse {
        content,
        model: response.model,
        usage: response
            .usage
            .map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default(),
    })
}
