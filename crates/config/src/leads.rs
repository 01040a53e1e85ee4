//! Lead store configuration

use serde::{Deserialize, Serialize};

use crate::constants::leads;

/// Where completed leads are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LeadStoreKind {
    /// Structured log line only
    #[default]
    Log,
    /// Append to a JSON-lines file
    Jsonl,
    /// ScyllaDB `leads` table
    Scylla,
    /// POST to a CRM webhook
    Webhook,
}

/// Lead hand-off configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadsConfig {
    #[serde(default)]
    pub store: LeadStoreKind,

    /// Source tag stored with each lead
    #[serde(default = "default_source")]
    pub source: String,

    /// File used by the `jsonl` store
    #[serde(default = "default_jsonl_path")]
    pub jsonl_path: String,

    /// Capacity of the hand-off channel
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    #[serde(default)]
    pub webhook: WebhookConfig,

    #[serde(default)]
    pub scylla: ScyllaConfig,
}

fn default_source() -> String {
    leads::SOURCE.to_string()
}
fn default_jsonl_path() -> String {
    leads::JSONL_PATH.to_string()
}
fn default_channel_capacity() -> usize {
    leads::CHANNEL_CAPACITY
}

impl Default for LeadsConfig {
    fn default() -> Self {
        Self {
            store: LeadStoreKind::default(),
            source: default_source(),
            jsonl_path: default_jsonl_path(),
            channel_capacity: default_channel_capacity(),
            webhook: WebhookConfig::default(),
            scylla: ScyllaConfig::default(),
        }
    }
}

/// CRM webhook target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    #[serde(default)]
    pub url: Option<String>,

    /// Sent as a bearer token when set
    #[serde(default)]
    pub auth_token: Option<String>,

    #[serde(default = "default_webhook_timeout")]
    pub timeout_ms: u64,
}

fn default_webhook_timeout() -> u64 {
    leads::WEBHOOK_TIMEOUT_MS
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: None,
            auth_token: None,
            timeout_ms: default_webhook_timeout(),
        }
    }
}

/// ScyllaDB connection for the `scylla` store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScyllaConfig {
    #[serde(default = "default_scylla_hosts")]
    pub hosts: Vec<String>,

    #[serde(default = "default_scylla_keyspace")]
    pub keyspace: String,

    #[serde(default = "default_replication_factor")]
    pub replication_factor: u8,
}

fn default_scylla_hosts() -> Vec<String> {
    vec![leads::SCYLLA_HOST.to_string()]
}
fn default_scylla_keyspace() -> String {
    leads::SCYLLA_KEYSPACE.to_string()
}
fn default_replication_factor() -> u8 {
    1
}

impl Default for ScyllaConfig {
    fn default() -> Self {
        Self {
            hosts: default_scylla_hosts(),
            keyspace: default_scylla_keyspace(),
            replication_factor: default_replication_factor(),
        }
    }
}
