//! Flow definition.
//!
//! A flow is the full declarative conversation graph: the id of the block
//! every conversation starts at, plus the blocks in declaration order.
//! Flows are immutable once built; replacing the active flow swaps the whole
//! value (see [`crate::provider::FlowProvider`]).

use crate::block::Block;
use crate::error::FlowError;
use crate::route::null_as_default;
use chatflow_core::{BlockId, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The conversation graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "FlowDocument", rename_all = "camelCase")]
pub struct Flow {
    /// Where every conversation starts.
    #[serde(skip_serializing_if = "Option::is_none")]
    start_block_id: Option<BlockId>,
    /// Blocks in declaration order.
    blocks: Vec<Block>,
    /// Map from block id to position in `blocks` for O(1) lookup.
    #[serde(skip)]
    index: HashMap<BlockId, usize>,
}

/// Wire layout of a flow document.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlowDocument {
    #[serde(default)]
    start_block_id: Option<BlockId>,
    #[serde(default, deserialize_with = "null_as_default")]
    blocks: Vec<Block>,
}

impl From<FlowDocument> for Flow {
    fn from(document: FlowDocument) -> Self {
        Self::new(document.start_block_id, document.blocks)
    }
}

impl Flow {
    /// Creates a flow from its start block id and blocks.
    ///
    /// The start id and route targets are not checked here; unresolved
    /// references only matter when traversal reaches them.
    #[must_use]
    pub fn new(start_block_id: Option<BlockId>, blocks: Vec<Block>) -> Self {
        let mut index = HashMap::with_capacity(blocks.len());
        for (position, block) in blocks.iter().enumerate() {
            // first declaration wins
            index.entry(block.id.clone()).or_insert(position);
        }
        Self {
            start_block_id,
            blocks,
            index,
        }
    }

    /// Parses a flow from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid JSON or names an
    /// unknown block or match type. Unknown fields are ignored.
    pub fn from_json(json: &str) -> Result<Self, FlowError> {
        let flow = serde_json::from_str(json).map_err(|e| FlowError::InvalidDocument {
            reason: e.to_string(),
        })?;
        Ok(flow)
    }

    /// Parses a flow from JSON bytes.
    ///
    /// # Errors
    ///
    /// See [`Flow::from_json`].
    pub fn from_slice(bytes: &[u8]) -> Result<Self, FlowError> {
        let flow = serde_json::from_slice(bytes).map_err(|e| FlowError::InvalidDocument {
            reason: e.to_string(),
        })?;
        Ok(flow)
    }

    /// Serializes the flow back to its document layout.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, FlowError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| FlowError::SerializeFailed {
            reason: e.to_string(),
        })?;
        Ok(json)
    }

    /// Returns the id of the block conversations start at.
    #[must_use]
    pub fn start_block_id(&self) -> Option<&BlockId> {
        self.start_block_id.as_ref()
    }

    /// Looks up a block by id.
    #[must_use]
    pub fn by_id(&self, id: &str) -> Option<&Block> {
        let position = self.index.get(id)?;
        self.blocks.get(*position)
    }

    /// Returns true if the id resolves to a block.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Returns all blocks in declaration order.
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Returns the number of blocks.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}
