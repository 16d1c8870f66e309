//! Error types for the conversation crate.

use chatflow_core::SessionId;
use std::fmt;

/// Errors from recording transcript entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptError {
    /// The backing store rejected the write.
    StorageFailed { reason: String },
    /// The entry cannot be recorded for this session.
    Rejected { session_id: SessionId, reason: String },
}

impl fmt::Display for TranscriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StorageFailed { reason } => {
                write!(f, "transcript storage failed: {reason}")
            }
            Self::Rejected { session_id, reason } => {
                write!(f, "transcript entry rejected for session {session_id}: {reason}")
            }
        }
    }
}

impl std::error::Error for TranscriptError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_failed_display() {
        let err = TranscriptError::StorageFailed {
            reason: "disk full".to_string(),
        };
        assert_eq!(err.to_string(), "transcript storage failed: disk full");
    }

    #[test]
    fn rejected_display_includes_session() {
        let err = TranscriptError::Rejected {
            session_id: SessionId::from("s1"),
            reason: "closed".to_string(),
        };
        assert!(err.to_string().contains("s1"));
        assert!(err.to_string().contains("closed"));
    }
}
