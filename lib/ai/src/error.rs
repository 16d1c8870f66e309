//! Error types for the AI crate.
//!
//! Errors are designed for layered context using rootcause. Backends return
//! `LlmError` directly; classifiers turn every error into "no intent".

use std::fmt;

/// Why a completion could not be obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// No HTTP response was received.
    Transport { reason: String },
    /// The provider answered with a non-success status other than 429.
    RequestFailed { status: u16, body: String },
    /// The body was not a completion document.
    ResponseParseFailed { reason: String },
    /// The completion document held no choice with text.
    EmptyResponse,
    /// No answer within the configured window.
    Timeout { after_secs: u64 },
    /// The provider answered 429.
    RateLimited { retry_after_secs: Option<u64> },
    /// The backend could not be constructed from its configuration.
    InvalidConfig { reason: String },
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport { reason } => {
                write!(f, "completion request failed: {reason}")
            }
            Self::RequestFailed { status, body } => {
                write!(f, "completion endpoint returned {status}: {body}")
            }
            Self::ResponseParseFailed { reason } => {
                write!(f, "unreadable completion response: {reason}")
            }
            Self::EmptyResponse => write!(f, "completion response had no text"),
            Self::Timeout { after_secs } => {
                write!(f, "no completion after {after_secs}s")
            }
            Self::RateLimited { retry_after_secs } => {
                if let Some(secs) = retry_after_secs {
                    write!(f, "rate limited, retry after {secs}s")
                } else {
                    write!(f, "rate limited")
                }
            }
            Self::InvalidConfig { reason } => {
                write!(f, "invalid completion backend configuration: {reason}")
            }
        }
    }
}

impl std::error::Error for LlmError {}
