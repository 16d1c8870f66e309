//! Engine configuration.

use serde::Deserialize;

/// Tuning for the flow engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Most message blocks a single turn may pass through.
    /// Guards against message blocks that loop into each other. `None`
    /// removes the bound.
    #[serde(default = "default_max_message_hops")]
    pub max_message_hops: Option<usize>,

    /// Whether turns of the same session run one at a time.
    /// Without this, two concurrent messages from one session may both
    /// decide from the same cursor and the last write wins.
    #[serde(default = "default_serialize_sessions")]
    pub serialize_sessions: bool,
}

fn default_max_message_hops() -> Option<usize> {
    Some(256)
}

fn default_serialize_sessions() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_message_hops: default_max_message_hops(),
            serialize_sessions: default_serialize_sessions(),
        }
    }
}

impl EngineConfig {
    /// Sets the hop bound.
    #[must_use]
    pub fn with_max_message_hops(mut self, max: Option<usize>) -> Self {
        self.max_message_hops = max;
        self
    }

    /// Sets per-session serialization.
    #[must_use]
    pub fn with_serialize_sessions(mut self, serialize: bool) -> Self {
        self.serialize_sessions = serialize;
        self
    }
}
