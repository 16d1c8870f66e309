//! Block types for flow graphs.
//!
//! Blocks are the nodes of a flow. Each block has an id unique within its
//! flow and a kind:
//! - `WriteMessage` emits text and continues unconditionally
//! - `WaitForResponse` suspends and is resolved by keyword routes
//! - `DetectResponseIntent` suspends and is resolved by intent detection

use crate::route::{IntentOption, Route, null_as_default};
use chatflow_core::BlockId;
use serde::{Deserialize, Serialize};

/// A node in the conversation graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Identifier, unique within a flow.
    pub id: BlockId,
    /// What the block does.
    #[serde(flatten)]
    pub kind: BlockKind,
}

/// The behaviour of a block, tagged by the document's `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockKind {
    /// Emits a message and continues to `next`, or stops if absent.
    WriteMessage {
        /// The text to emit.
        #[serde(rename = "message", default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        /// The block to continue at.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        next: Option<BlockId>,
    },
    /// Suspends until the user replies; resolved by keyword routes.
    WaitForResponse {
        /// Routes in declaration order.
        #[serde(rename = "on", default, deserialize_with = "null_as_default")]
        routes: Vec<Route>,
    },
    /// Suspends until the user replies; resolved by intent detection.
    DetectResponseIntent {
        /// Legacy routes, ignored when `intent_options` is non-empty.
        #[serde(rename = "on", default, deserialize_with = "null_as_default")]
        routes: Vec<Route>,
        /// Named intents, in declaration order.
        #[serde(rename = "intents", default, deserialize_with = "null_as_default")]
        intent_options: Vec<IntentOption>,
        /// Target when no option matched.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fallback: Option<BlockId>,
    },
}

impl Block {
    /// Creates a message block.
    #[must_use]
    pub fn write_message(
        id: impl Into<BlockId>,
        text: impl Into<String>,
        next: Option<BlockId>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: BlockKind::WriteMessage {
                text: Some(text.into()),
                next,
            },
        }
    }

    /// Creates a wait-for-response block.
    #[must_use]
    pub fn wait_for_response(id: impl Into<BlockId>, routes: Vec<Route>) -> Self {
        Self {
            id: id.into(),
            kind: BlockKind::WaitForResponse { routes },
        }
    }

    /// Creates an intent-detection block.
    #[must_use]
    pub fn detect_response_intent(
        id: impl Into<BlockId>,
        routes: Vec<Route>,
        intent_options: Vec<IntentOption>,
        fallback: Option<BlockId>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: BlockKind::DetectResponseIntent {
                routes,
                intent_options,
                fallback,
            },
        }
    }

    /// Returns true if traversal suspends at this block.
    #[must_use]
    pub fn is_suspension(&self) -> bool {
        !matches!(self.kind, BlockKind::WriteMessage { .. })
    }

    /// Returns the block's routes (empty for message blocks).
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        match &self.kind {
            BlockKind::WriteMessage { .. } => &[],
            BlockKind::WaitForResponse { routes }
            | BlockKind::DetectResponseIntent { routes, .. } => routes,
        }
    }

    /// Returns every block id this block can continue at, in declaration order.
    #[must_use]
    pub fn targets(&self) -> Vec<&BlockId> {
        match &self.kind {
            BlockKind::WriteMessage { next, .. } => next.iter().collect(),
            BlockKind::WaitForResponse { routes } => {
                routes.iter().filter_map(|r| r.next.as_ref()).collect()
            }
            BlockKind::DetectResponseIntent {
                routes,
                intent_options,
                fallback,
            } => routes
                .iter()
                .filter_map(|r| r.next.as_ref())
                .chain(intent_options.iter().filter_map(|o| o.next.as_ref()))
                .chain(fallback.iter())
                .collect(),
        }
    }

    /// Returns the document tag for this block's kind.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self.kind {
            BlockKind::WriteMessage { .. } => "WRITE_MESSAGE",
            BlockKind::WaitForResponse { .. } => "WAIT_FOR_RESPONSE",
            BlockKind::DetectResponseIntent { .. } => "DETECT_RESPONSE_INTENT",
        }
    }
}
