//! The flow engine.
//!
//! The engine walks the active flow on behalf of sessions. A turn emits the
//! text of every message block it passes and stops at the first suspension
//! block, which becomes the session's cursor. The next user utterance
//! resumes from that cursor.
//!
//! Dead ends never reset a conversation: a turn that runs into an unknown
//! block id, or into a message block with no successor, leaves the cursor
//! where it was. Only a cursor that no longer resolves in the active flow
//! restarts the conversation.

use crate::config::EngineConfig;
use crate::intent::IntentResolver;
use crate::keyword::KeywordMatcher;
use crate::locks::SessionLocks;
use chatflow_ai::IntentClassifier;
use chatflow_conversation::{SessionStore, TranscriptRecorder};
use chatflow_core::{BlockId, SessionId};
use chatflow_flow::{BlockKind, Flow, FlowProvider};
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, error, info, instrument, warn};

/// Interprets the active flow for any number of sessions.
///
/// Transcript writes are awaited inside the turn, so recorders are expected
/// to return quickly; a slow recorder delays the reply. Recorder errors are
/// logged and never change a turn's outcome.
pub struct FlowEngine {
    flows: Arc<FlowProvider>,
    sessions: Arc<dyn SessionStore>,
    transcript: Arc<dyn TranscriptRecorder>,
    keywords: KeywordMatcher,
    intents: IntentResolver,
    locks: SessionLocks,
    config: EngineConfig,
}

impl FlowEngine {
    /// Creates an engine with the default configuration.
    #[must_use]
    pub fn new(
        flows: Arc<FlowProvider>,
        sessions: Arc<dyn SessionStore>,
        transcript: Arc<dyn TranscriptRecorder>,
        classifier: Arc<dyn IntentClassifier>,
    ) -> Self {
        Self {
            flows,
            sessions,
            transcript,
            keywords: KeywordMatcher,
            intents: IntentResolver::new(classifier),
            locks: SessionLocks::new(),
            config: EngineConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Starts, or restarts, the session's conversation at the start block.
    ///
    /// Any existing cursor is ignored. Returns the messages to deliver, in
    /// order; empty when no flow is active.
    #[instrument(skip_all, fields(session_id = %session_id))]
    pub async fn start(&self, session_id: &SessionId) -> Vec<String> {
        let turn = self.begin_turn(session_id).await;
        let messages = match self.flows.current() {
            Some(flow) => self.start_in(&flow, session_id).await,
            None => {
                debug!("no active flow");
                Vec::new()
            }
        };
        self.end_turn(session_id, turn);
        messages
    }

    /// Advances the session's conversation with a user utterance.
    ///
    /// Returns the messages to deliver, in order; empty when no flow is
    /// active. A session without a usable cursor is started instead.
    #[instrument(skip_all, fields(session_id = %session_id))]
    pub async fn on_user_message(
        &self,
        session_id: &SessionId,
        text: Option<&str>,
    ) -> Vec<String> {
        let turn = self.begin_turn(session_id).await;
        let messages = match self.flows.current() {
            Some(flow) => self.advance_in(&flow, session_id, text).await,
            None => {
                debug!("no active flow");
                Vec::new()
            }
        };
        self.end_turn(session_id, turn);
        messages
    }

    async fn advance_in(
        &self,
        flow: &Flow,
        session_id: &SessionId,
        text: Option<&str>,
    ) -> Vec<String> {
        let cursor = self.sessions.get(session_id);
        let Some(current) = cursor.as_ref().and_then(|id| flow.by_id(id.as_str())) else {
            info!(cursor = ?cursor, "no usable cursor, restarting conversation");
            return self.start_in(flow, session_id).await;
        };

        self.record_user(session_id, text.unwrap_or_default(), &current.id)
            .await;

        let next = match &current.kind {
            BlockKind::WaitForResponse { .. } => self.keywords.resolve_next(current, text),
            BlockKind::DetectResponseIntent { .. } => self.intents.resolve(current, text).await,
            BlockKind::WriteMessage { .. } => None,
        };
        debug!(block_id = %current.id, next = ?next, "resolved user message");

        self.emit_from(flow, session_id, next).await
    }

    async fn begin_turn(&self, session_id: &SessionId) -> Option<OwnedMutexGuard<()>> {
        if self.config.serialize_sessions {
            Some(self.locks.acquire(session_id).await)
        } else {
            None
        }
    }

    fn end_turn(&self, session_id: &SessionId, turn: Option<OwnedMutexGuard<()>>) {
        if let Some(guard) = turn {
            drop(guard);
            self.locks.release(session_id);
        }
    }

    async fn start_in(&self, flow: &Flow, session_id: &SessionId) -> Vec<String> {
        self.emit_from(flow, session_id, flow.start_block_id().cloned())
            .await
    }

    /// Runs message blocks from `next` until the flow suspends or dead-ends.
    async fn emit_from(
        &self,
        flow: &Flow,
        session_id: &SessionId,
        mut next: Option<BlockId>,
    ) -> Vec<String> {
        let mut messages = Vec::new();
        let mut hops = 0usize;

        while let Some(id) = next.take() {
            let Some(block) = flow.by_id(id.as_str()) else {
                warn!(block_id = %id, "block not found, conversation stays in place");
                break;
            };

            match &block.kind {
                BlockKind::WriteMessage {
                    text,
                    next: following,
                } => {
                    if self.config.max_message_hops.is_some_and(|max| hops >= max) {
                        error!(
                            block_id = %block.id,
                            hops,
                            "message hop limit reached, flow likely loops without suspending"
                        );
                        break;
                    }
                    hops += 1;

                    if let Some(text) = text.as_deref().filter(|t| !t.is_empty()) {
                        messages.push(text.to_string());
                        self.record_bot(session_id, text, &block.id).await;
                    }
                    next = following.clone();
                }
                BlockKind::WaitForResponse { .. } | BlockKind::DetectResponseIntent { .. } => {
                    debug!(block_id = %block.id, "session suspended");
                    self.sessions.set(session_id, block.id.clone());
                    break;
                }
            }
        }

        messages
    }

    async fn record_user(&self, session_id: &SessionId, text: &str, block_id: &BlockId) {
        if let Err(e) = self.transcript.record_user(session_id, text, block_id).await {
            warn!(error = %e, block_id = %block_id, "failed to record user message");
        }
    }

    async fn record_bot(&self, session_id: &SessionId, text: &str, block_id: &BlockId) {
        if let Err(e) = self.transcript.record_bot(session_id, text, block_id).await {
            warn!(error = %e, block_id = %block_id, "failed to record bot message");
        }
    }
}
