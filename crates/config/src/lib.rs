//! Configuration management for the concierge
//!
//! Supports loading configuration from:
//! - YAML files (`config/default.yaml`, `config/{env}.yaml`)
//! - Environment variables (`CONCIERGE__` prefix, `__` separator)
//!
//! Chatbot copy and intent rules live in [`ChatbotContent`], which carries
//! the built-in website copy and can be overridden from a YAML file named
//! by `agent.content_path`.

pub mod agent;
pub mod constants;
pub mod content;
pub mod leads;
pub mod settings;

pub use agent::AgentConfig;
pub use content::{
    default_intent_rules, CaptureContent, ChatbotContent, FaqContent, IntentRuleConfig,
};
pub use leads::{LeadStoreKind, LeadsConfig, ScyllaConfig, WebhookConfig};
pub use settings::{
    load_settings, load_settings_from, ObservabilityConfig, RuntimeEnvironment, ServerConfig,
    Settings, ENV_PREFIX, ENV_VAR,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
