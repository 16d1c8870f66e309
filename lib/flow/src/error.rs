//! Error types for the flow crate.
//!
//! Errors are designed for layered context using rootcause. Only loading a
//! document can fail; unresolved references are tolerated until traversal
//! actually dereferences them.

use std::fmt;
use std::path::PathBuf;

/// Errors from loading or activating a flow document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// The document is not a well-formed flow.
    InvalidDocument { reason: String },
    /// The document could not be read from disk.
    ReadFailed { path: PathBuf, reason: String },
    /// The flow could not be serialized.
    SerializeFailed { reason: String },
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDocument { reason } => {
                write!(f, "invalid flow document: {reason}")
            }
            Self::ReadFailed { path, reason } => {
                write!(f, "failed to read flow document {}: {reason}", path.display())
            }
            Self::SerializeFailed { reason } => {
                write!(f, "failed to serialize flow: {reason}")
            }
        }
    }
}

impl std::error::Error for FlowError {}
