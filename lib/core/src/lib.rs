//! Core types shared by every chatflow crate.
//!
//! This crate provides the `Result` alias used for layered error reporting
//! and the strongly-typed identifiers that flow through the interpreter:
//! block ids, session ids and transcript message ids.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{BlockId, MessageId, ParseIdError, SessionId};
