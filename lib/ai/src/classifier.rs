//! Intent classifiers.
//!
//! A classifier maps an utterance and a set of candidate labels to at most
//! one of those labels. It never fails: an unconfigured classifier, missing
//! input, a backend error, a timeout and an answer outside the candidate set
//! all come back as `None`.

use crate::backend::LlmBackend;
use crate::prompt::{NO_INTENT, classification_request, match_candidate};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

/// Detects which of a set of intents an utterance expresses.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    /// Returns the candidate the text best matches, if any.
    ///
    /// Implementations return `None` when `text` is absent or `candidates`
    /// is empty, and never surface errors to the caller.
    async fn detect(&self, text: Option<&str>, candidates: &[String]) -> Option<String>;
}

/// The unconfigured classifier. Never detects anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopIntentClassifier;

#[async_trait]
impl IntentClassifier for NoopIntentClassifier {
    async fn detect(&self, _text: Option<&str>, _candidates: &[String]) -> Option<String> {
        None
    }
}

/// Classifier that asks an LLM to pick a label.
#[derive(Debug, Clone)]
pub struct LlmIntentClassifier<B> {
    backend: B,
    timeout: Duration,
}

impl<B: LlmBackend> LlmIntentClassifier<B> {
    /// Creates a classifier with the default ten second timeout.
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            timeout: Duration::from_secs(10),
        }
    }

    /// Sets the upper bound on a single classification.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl<B: LlmBackend> IntentClassifier for LlmIntentClassifier<B> {
    async fn detect(&self, text: Option<&str>, candidates: &[String]) -> Option<String> {
        let text = text?;
        if candidates.is_empty() {
            return None;
        }

        let request = classification_request(text, candidates);
        let response =
            match tokio::time::timeout(self.timeout, self.backend.generate(&request)).await {
                Ok(Ok(response)) => response,
                Ok(Err(e)) => {
                    warn!(model = self.backend.model(), error = %e, "intent detection failed");
                    return None;
                }
                Err(_) => {
                    warn!(
                        model = self.backend.model(),
                        timeout_ms = self.timeout.as_millis() as u64,
                        "intent detection timed out"
                    );
                    return None;
                }
            };

        let answer = response.content.trim();
        let detected = match_candidate(answer, candidates).map(str::to_string);
        match &detected {
            Some(intent) => debug!(%intent, "intent detected"),
            None if answer.eq_ignore_ascii_case(NO_INTENT) => debug!("no intent applies"),
            None => debug!(%answer, "classifier answered outside the candidate set"),
        }
        detected
    }
}
