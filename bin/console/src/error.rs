//! Console errors.

use std::fmt;

/// Failures that stop the console before or while it runs.
#[derive(Debug)]
pub enum ConsoleError {
    /// Configuration could not be loaded.
    Config { reason: String },
    /// The flow document could not be loaded at startup.
    FlowLoad { path: String, reason: String },
    /// Reading input or writing output failed.
    Io { reason: String },
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { reason } => write!(f, "invalid configuration: {}", reason),
            Self::FlowLoad { path, reason } => {
                write!(f, "failed to load flow '{}': {}", path, reason)
            }
            Self::Io { reason } => write!(f, "console I/O failed: {}", reason),
        }
    }
}

impl std::error::Error for ConsoleError {}

impl From<std::io::Error> for ConsoleError {
    fn from(e: std::io::Error) -> Self {
        Self::Io {
            reason: e.to_string(),
        }
    }
}
