//! Dialog flow interpreter for chatflow.
//!
//! This crate provides:
//!
//! - **Keyword Matcher**: resolves a suspension block's routes by substring
//! - **Intent Resolution**: the classifier, keyword and fallback chain for
//!   intent-detection blocks
//! - **Flow Engine**: starts conversations, advances session cursors on user
//!   input and emits the resulting bot messages
//!
//! No engine operation fails. Missing configuration, dangling references and
//! classifier problems all degrade to fewer messages or an unchanged cursor.

pub mod config;
pub mod engine;
pub mod intent;
pub mod keyword;
pub mod locks;

pub use config::EngineConfig;
pub use engine::FlowEngine;
pub use intent::IntentResolver;
pub use keyword::KeywordMatcher;
pub use locks::SessionLocks;
