//! Conversation agent configuration

use serde::{Deserialize, Serialize};

use crate::constants::timing;

/// Agent configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Lower bound of the randomized typing delay (ms)
    #[serde(default = "default_typing_delay_min")]
    pub typing_delay_min_ms: u64,

    /// Upper bound of the randomized typing delay (ms)
    #[serde(default = "default_typing_delay_max")]
    pub typing_delay_max_ms: u64,

    /// Fixed delay used when the visitor taps a quick reply (ms)
    #[serde(default = "default_quick_reply_delay")]
    pub quick_reply_delay_ms: u64,

    /// Optional YAML file overriding the built-in chatbot content
    #[serde(default)]
    pub content_path: Option<String>,
}

fn default_typing_delay_min() -> u64 {
    timing::TYPING_DELAY_MIN_MS
}
fn default_typing_delay_max() -> u64 {
    timing::TYPING_DELAY_MAX_MS
}
fn default_quick_reply_delay() -> u64 {
    timing::QUICK_REPLY_DELAY_MS
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            typing_delay_min_ms: default_typing_delay_min(),
            typing_delay_max_ms: default_typing_delay_max(),
            quick_reply_delay_ms: default_quick_reply_delay(),
            content_path: None,
        }
    }
}

impl AgentConfig {
    /// Config with every delay set to zero
    pub fn without_delays() -> Self {
        Self {
            typing_delay_min_ms: 0,
            typing_delay_max_ms: 0,
            quick_reply_delay_ms: 0,
            content_path: None,
        }
    }
}
