//! Console configuration.
//!
//! Loaded via the `config` crate from environment variables prefixed with
//! `CHATFLOW_`. Nested sections use `__`, so the classifier model is set with
//! `CHATFLOW_CLASSIFIER__MODEL`.
//!
//! See [`EngineConfig`] and [`OpenAiConfig`] for the library settings.

use chatflow_ai::OpenAiConfig;
use chatflow_engine::EngineConfig;
use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::path::PathBuf;

/// Console configuration composed from library configs.
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Path of the flow document to serve.
    pub flow_path: PathBuf,

    /// Session id the console converses as.
    #[serde(default = "default_session_id")]
    pub session_id: String,

    /// Engine tuning.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Intent classifier backend. Intent detection is disabled without an
    /// API key.
    #[serde(default)]
    pub classifier: OpenAiConfig,
}

fn default_session_id() -> String {
    "console".to_string()
}

fn environment() -> Environment {
    Environment::with_prefix("CHATFLOW")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl AppConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the flow path is missing or a value is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_environment(environment())
    }

    fn from_environment(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(environment)
            .build()?
            .try_deserialize()
    }
}
