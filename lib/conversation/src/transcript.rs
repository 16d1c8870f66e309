//! Conversation transcripts.
//!
//! Every user utterance and every emitted bot message is reported to a
//! [`TranscriptRecorder`] together with the block it belongs to.

use crate::error::TranscriptError;
use async_trait::async_trait;
use chatflow_core::{BlockId, MessageId, SessionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Who produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sender {
    /// The end user.
    User,
    /// The flow.
    Bot,
}

impl Sender {
    /// Returns the wire tag.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Bot => "BOT",
        }
    }
}

/// One line of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptEntry {
    /// Unique entry identifier.
    pub id: MessageId,
    /// The session the entry belongs to.
    pub session_id: SessionId,
    /// Who said it.
    pub sender: Sender,
    /// What was said.
    pub content: String,
    /// The block the entry is associated with.
    pub block_id: BlockId,
    /// When the entry was created.
    pub created_at: DateTime<Utc>,
}

impl TranscriptEntry {
    /// Creates an entry stamped with the current time.
    #[must_use]
    pub fn new(
        session_id: SessionId,
        sender: Sender,
        content: impl Into<String>,
        block_id: BlockId,
    ) -> Self {
        Self {
            id: MessageId::new(),
            session_id,
            sender,
            content: content.into(),
            block_id,
            created_at: Utc::now(),
        }
    }
}

/// Sink for transcript entries.
#[async_trait]
pub trait TranscriptRecorder: Send + Sync {
    /// Records an entry.
    async fn record(&self, entry: TranscriptEntry) -> Result<(), TranscriptError>;

    /// Records a user utterance against the block the session was waiting at.
    async fn record_user(
        &self,
        session_id: &SessionId,
        content: &str,
        block_id: &BlockId,
    ) -> Result<(), TranscriptError> {
        self.record(TranscriptEntry::new(
            session_id.clone(),
            Sender::User,
            content,
            block_id.clone(),
        ))
        .await
    }

    /// Records a bot message against the block that emitted it.
    async fn record_bot(
        &self,
        session_id: &SessionId,
        content: &str,
        block_id: &BlockId,
    ) -> Result<(), TranscriptError> {
        self.record(TranscriptEntry::new(
            session_id.clone(),
            Sender::Bot,
            content,
            block_id.clone(),
        ))
        .await
    }
}

/// Transcript kept in process memory.
///
/// Cloning shares the underlying entries.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTranscript {
    entries: Arc<RwLock<Vec<TranscriptEntry>>>,
}

impl InMemoryTranscript {
    /// Creates an empty transcript.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every entry in recording order.
    #[must_use]
    pub fn entries(&self) -> Vec<TranscriptEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the entries of one session in recording order.
    #[must_use]
    pub fn entries_for(&self, session_id: &SessionId) -> Vec<TranscriptEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| &e.session_id == session_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl TranscriptRecorder for InMemoryTranscript {
    async fn record(&self, entry: TranscriptEntry) -> Result<(), TranscriptError> {
        debug!(
            session_id = %entry.session_id,
            sender = entry.sender.as_str(),
            block_id = %entry.block_id,
            "recorded transcript entry"
        );
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
        Ok(())
    }
}
