//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{server, sessions, timing};
use crate::{AgentConfig, ConfigError, LeadStoreKind, LeadsConfig};

/// Environment variable selecting `config/{env}`
pub const ENV_VAR: &str = "CONCIERGE_ENV";

/// Prefix for environment overrides (`CONCIERGE__SERVER__PORT=9000`)
pub const ENV_PREFIX: &str = "CONCIERGE";

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Relaxed validation, warnings only
    #[default]
    Development,
    Staging,
    /// All validations enforced
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if strict validation should be applied
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub agent: AgentConfig,

    #[serde(default)]
    pub leads: LeadsConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_agent()?;
        self.validate_leads()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        let server = &self.server;

        if server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }

        if server.max_sessions == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.max_sessions".to_string(),
                message: "Must allow at least one session".to_string(),
            });
        }

        if server.session_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.session_timeout_secs".to_string(),
                message: "Session timeout cannot be 0".to_string(),
            });
        }

        if server.cleanup_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.cleanup_interval_secs".to_string(),
                message: "Cleanup interval cannot be 0".to_string(),
            });
        }

        if self.environment.is_production() && server.cors_enabled && server.cors_origins.is_empty()
        {
            tracing::warn!(
                "CORS is enabled in production but no origins are configured. \
                 The chat widget will be blocked on other origins."
            );
        }

        Ok(())
    }

    fn validate_agent(&self) -> Result<(), ConfigError> {
        let agent = &self.agent;

        if agent.typing_delay_min_ms > agent.typing_delay_max_ms {
            return Err(ConfigError::InvalidValue {
                field: "agent.typing_delay_min_ms".to_string(),
                message: format!(
                    "Must not exceed typing_delay_max_ms ({} > {})",
                    agent.typing_delay_min_ms, agent.typing_delay_max_ms
                ),
            });
        }

        for (field, value) in [
            ("agent.typing_delay_max_ms", agent.typing_delay_max_ms),
            ("agent.quick_reply_delay_ms", agent.quick_reply_delay_ms),
        ] {
            if value > timing::MAX_DELAY_MS {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: format!("Must be at most {}ms, got {}", timing::MAX_DELAY_MS, value),
                });
            }
        }

        Ok(())
    }

    fn validate_leads(&self) -> Result<(), ConfigError> {
        let leads = &self.leads;

        if leads.channel_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "leads.channel_capacity".to_string(),
                message: "Channel capacity cannot be 0".to_string(),
            });
        }

        match leads.store {
            LeadStoreKind::Webhook if leads.webhook.url.is_none() => {
                return Err(ConfigError::MissingField("leads.webhook.url".to_string()));
            },
            LeadStoreKind::Jsonl if leads.jsonl_path.trim().is_empty() => {
                return Err(ConfigError::MissingField("leads.jsonl_path".to_string()));
            },
            LeadStoreKind::Scylla if leads.scylla.hosts.is_empty() => {
                return Err(ConfigError::MissingField("leads.scylla.hosts".to_string()));
            },
            LeadStoreKind::Log if self.environment.is_strict() => {
                tracing::warn!(
                    environment = ?self.environment,
                    "Lead store is 'log'; completed leads will only appear in logs"
                );
            },
            _ => {},
        }

        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds; must cover the typing delay
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// CORS allowed origins (empty = any origin outside production)
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Maximum concurrent visitor sessions
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Inactivity after which a session is discarded
    #[serde(default = "default_session_timeout")]
    pub session_timeout_secs: u64,

    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_secs: u64,
}

fn default_host() -> String {
    server::HOST.to_string()
}
fn default_port() -> u16 {
    server::PORT
}
fn default_timeout() -> u64 {
    server::REQUEST_TIMEOUT_SECS
}
fn default_true() -> bool {
    true
}
fn default_max_sessions() -> usize {
    sessions::MAX_SESSIONS
}
fn default_session_timeout() -> u64 {
    sessions::SESSION_TIMEOUT_SECS
}
fn default_cleanup_interval() -> u64 {
    sessions::CLEANUP_INTERVAL_SECS
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_seconds: default_timeout(),
            cors_enabled: default_true(),
            cors_origins: Vec::new(),
            max_sessions: default_max_sessions(),
            session_timeout_secs: default_session_timeout(),
            cleanup_interval_secs: default_cleanup_interval(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,

    /// Serve Prometheus metrics at /metrics
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (CONCIERGE__ prefix)
/// 2. config/{env}.yaml (if env specified)
/// 3. config/default.yaml
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from("config", env)
}

/// Same as [`load_settings`] with an explicit config directory
pub fn load_settings_from(dir: &str, env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name(&format!("{}/default", dir)).required(false));

    if let Some(env_name) = env {
        builder = builder
            .add_source(File::with_name(&format!("{}/{}", dir, env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.agent.typing_delay_min_ms, 1000);
        assert_eq!(settings.agent.typing_delay_max_ms, 2000);
        assert_eq!(settings.leads.store, LeadStoreKind::Log);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_server_validation() {
        let mut settings = Settings::default();

        settings.server.port = 0;
        assert!(settings.validate_server().is_err());
        settings.server.port = 8080;

        settings.server.max_sessions = 0;
        assert!(settings.validate_server().is_err());
        settings.server.max_sessions = 10;

        settings.server.session_timeout_secs = 0;
        assert!(settings.validate_server().is_err());
        settings.server.session_timeout_secs = 60;

        assert!(settings.validate_server().is_ok());
    }

    #[test]
    fn test_typing_delay_bounds() {
        let mut settings = Settings::default();

        settings.agent.typing_delay_min_ms = 3000;
        assert!(settings.validate_agent().is_err());

        settings.agent.typing_delay_max_ms = 60_000;
        assert!(settings.validate_agent().is_err());

        settings.agent = AgentConfig::without_delays();
        assert!(settings.validate_agent().is_ok());
    }

    #[test]
    fn test_webhook_requires_url() {
        let mut settings = Settings::default();
        settings.leads.store = LeadStoreKind::Webhook;
        assert!(matches!(
            settings.validate_leads(),
            Err(ConfigError::MissingField(_))
        ));

        settings.leads.webhook.url = Some("https://crm.example.com/hooks/lead".to_string());
        assert!(settings.validate_leads().is_ok());
    }

    #[test]
    fn test_load_from_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("default.yaml")).unwrap();
        writeln!(
            file,
            "server:\n  port: 9100\nagent:\n  typing_delay_min_ms: 0\n  typing_delay_max_ms: 10\nleads:\n  store: jsonl\n  jsonl_path: /tmp/leads.jsonl"
        )
        .unwrap();

        let settings = load_settings_from(dir.path().to_str().unwrap(), None).unwrap();
        assert_eq!(settings.server.port, 9100);
        assert_eq!(settings.agent.typing_delay_max_ms, 10);
        assert_eq!(settings.leads.store, LeadStoreKind::Jsonl);
        assert_eq!(settings.leads.jsonl_path, "/tmp/leads.jsonl");
        // untouched sections keep defaults
        assert_eq!(settings.server.max_sessions, sessions::MAX_SESSIONS);
    }

    #[test]
    fn test_invalid_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("default.yaml"),
            "agent:\n  typing_delay_min_ms: 500\n  typing_delay_max_ms: 100\n",
        )
        .unwrap();

        assert!(load_settings_from(dir.path().to_str().unwrap(), None).is_err());
    }
}
