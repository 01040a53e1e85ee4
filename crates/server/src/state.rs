//! Application State
//!
//! Shared state across all handlers.

use std::sync::Arc;
use std::time::Duration;

use concierge_agent::ConversationConfig;
use concierge_config::Settings;
use metrics_exporter_prometheus::PrometheusHandle;

use crate::session::SessionManager;
use crate::sink::LeadQueue;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    /// Content and compiled intent rules shared by every conversation
    pub conversation: ConversationConfig,
    pub sessions: Arc<SessionManager>,
    /// Completed leads go here
    pub leads: LeadQueue,
    /// Absent when metrics are disabled or the recorder was already taken
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(config: Settings, conversation: ConversationConfig, leads: LeadQueue) -> Self {
        let server = &config.server;
        let sessions = SessionManager::with_config(
            server.max_sessions,
            Duration::from_secs(server.session_timeout_secs),
            Duration::from_secs(server.cleanup_interval_secs),
        );

        Self {
            config: Arc::new(config),
            conversation,
            sessions: Arc::new(sessions),
            leads,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
