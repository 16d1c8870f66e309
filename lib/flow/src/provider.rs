//! The active flow.
//!
//! Exactly one flow is active at a time and every session reads it. Reads
//! take a snapshot (`Arc<Flow>`) so a traversal that started before a swap
//! finishes against the flow it started with; replacement never blocks
//! readers.

use crate::definition::Flow;
use crate::error::FlowError;
use crate::graph::FlowGraph;
use arc_swap::ArcSwapOption;
use chatflow_core::Result;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Holds the currently active flow.
#[derive(Debug, Default)]
pub struct FlowProvider {
    active: ArcSwapOption<Flow>,
}

impl FlowProvider {
    /// Creates a provider with no active flow.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a provider with the given flow already active.
    #[must_use]
    pub fn with_flow(flow: Flow) -> Self {
        let provider = Self::new();
        provider.activate(flow);
        provider
    }

    /// Returns a snapshot of the active flow, if any.
    #[must_use]
    pub fn current(&self) -> Option<Arc<Flow>> {
        self.active.load_full()
    }

    /// Replaces the active flow.
    ///
    /// Structural problems are logged but never prevent activation.
    pub fn activate(&self, flow: Flow) -> Arc<Flow> {
        let flow = Arc::new(flow);

        info!(
            start_block_id = flow.start_block_id().map(|id| id.as_str()),
            block_count = flow.block_count(),
            "activated flow"
        );
        for diagnostic in FlowGraph::build(&flow).diagnostics() {
            warn!(%diagnostic, "flow diagnostic");
        }

        self.active.store(Some(Arc::clone(&flow)));
        flow
    }

    /// Deactivates the current flow.
    pub fn clear(&self) {
        self.active.store(None);
        info!("cleared active flow");
    }

    /// Parses and activates a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not parse; the previously
    /// active flow stays in place.
    pub fn activate_json(&self, json: &str) -> Result<Arc<Flow>, FlowError> {
        let flow = Flow::from_json(json)?;
        Ok(self.activate(flow))
    }

    /// Reads, parses and activates a JSON document from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse; the
    /// previously active flow stays in place.
    pub async fn load_file(&self, path: impl AsRef<Path>) -> Result<Arc<Flow>, FlowError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| FlowError::ReadFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let flow = Flow::from_slice(&bytes)?;
        info!(path = %path.display(), "loaded flow document");
        Ok(self.activate(flow))
    }
}
