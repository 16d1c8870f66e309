//! Intent classification for chatflow.
//!
//! This crate provides:
//!
//! - **Intent Classifier**: maps free text and a candidate label set to at
//!   most one label, never failing
//! - **LLM Backend**: the provider-neutral completion interface classifiers
//!   are built on
//! - **OpenAI**: a chat-completions backend for OpenAI-compatible APIs
//!
//! Classifiers swallow every failure. A timeout, transport error or an
//! answer outside the candidate set all read as "no intent detected".

pub mod backend;
pub mod classifier;
pub mod error;
pub mod openai;
pub mod prompt;

pub use backend::{LlmBackend, LlmMessage, LlmRequest, LlmResponse, MessageRole, TokenUsage};
pub use classifier::{IntentClassifier, LlmIntentClassifier, NoopIntentClassifier};
pub use error::LlmError;
pub use openai::{OpenAiBackend, OpenAiConfig};

use std::sync::Arc;
use tracing::{info, warn};

/// Builds the classifier described by the configuration.
///
/// Without an API key, or if the HTTP client cannot be built, the
/// unconfigured classifier is returned and every detection yields none.
#[must_use]
pub fn build_classifier(config: &OpenAiConfig) -> Arc<dyn IntentClassifier> {
    if !config.is_configured() {
        info!("no classifier API key configured, intent detection disabled");
        return Arc::new(NoopIntentClassifier);
    }

    match OpenAiBackend::new(config.clone()) {
        Ok(backend) => {
            info!(model = %config.model, url = %config.url, "intent classifier enabled");
            Arc::new(LlmIntentClassifier::new(backend).with_timeout(config.timeout()))
        }
        Err(report) => {
            warn!(error = %report, "failed to build classifier backend, intent detection disabled");
            Arc::new(NoopIntentClassifier)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn blank_key_builds_unconfigured_classifier() {
        let config = OpenAiConfig {
            api_key: "   ".to_string(),
            ..OpenAiConfig::default()
        };
        let classifier = build_classifier(&config);

        let candidates = vec!["price".to_string()];
        assert_eq!(classifier.detect(Some("price?"), &candidates).await, None);
    }
}
