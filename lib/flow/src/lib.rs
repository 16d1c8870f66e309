//! Flow graph model for chatflow.
//!
//! This crate provides:
//!
//! - **Blocks**: message emission and suspension points, as a closed sum type
//! - **Routes**: keyword, intent and fallback edges out of suspension blocks
//! - **Flow**: the immutable conversation graph with O(1) lookup by id
//! - **Diagnostics**: advisory structural checks backed by petgraph
//! - **Provider**: the hot-swappable active flow shared by all sessions

pub mod block;
pub mod definition;
pub mod error;
pub mod graph;
pub mod provider;
pub mod route;

pub use block::{Block, BlockKind};
pub use definition::Flow;
pub use error::FlowError;
pub use graph::{FlowDiagnostic, FlowGraph};
pub use provider::FlowProvider;
pub use route::{IntentOption, MatchSpec, Route};
