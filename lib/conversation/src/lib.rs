//! Conversation state for chatflow.
//!
//! This crate provides:
//!
//! - **Session Store**: which block each session is suspended at
//! - **Transcript**: the record of every user utterance and bot message

pub mod error;
pub mod session;
pub mod transcript;

pub use error::TranscriptError;
pub use session::{InMemorySessionStore, SessionStore};
pub use transcript::{InMemoryTranscript, Sender, TranscriptEntry, TranscriptRecorder};
