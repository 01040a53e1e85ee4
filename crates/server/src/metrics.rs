//! Prometheus metrics

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use concierge_agent::ConversationEvent;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

use crate::state::AppState;

const TURNS_TOTAL: &str = "concierge_turns_total";
const LEADS_COMPLETED_TOTAL: &str = "concierge_leads_completed_total";
const LEAD_STORE_FAILURES_TOTAL: &str = "concierge_lead_store_failures_total";
const LEADS_DROPPED_TOTAL: &str = "concierge_leads_dropped_total";
const INTENTS_TOTAL: &str = "concierge_intents_total";
const CAPTURES_STARTED_TOTAL: &str = "concierge_captures_started_total";
const FIELDS_REJECTED_TOTAL: &str = "concierge_fields_rejected_total";
const ACTIVE_SESSIONS: &str = "concierge_active_sessions";

/// Install the global Prometheus recorder
///
/// Returns `None` if a recorder is already installed (e.g. a second call in
/// the same process).
pub fn init_metrics() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!(error = %e, "Prometheus recorder not installed");
            None
        },
    }
}

/// `GET /metrics`
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics disabled".to_string()),
    }
}

/// One visitor turn, labelled with the capture state it left behind
pub fn record_turn(capture_state: &'static str) {
    ::metrics::counter!(TURNS_TOTAL, "capture_state" => capture_state).increment(1);
}

pub fn record_lead_completed() {
    ::metrics::counter!(LEADS_COMPLETED_TOTAL).increment(1);
}

pub fn record_store_failure(store: &'static str) {
    ::metrics::counter!(LEAD_STORE_FAILURES_TOTAL, "store" => store).increment(1);
}

/// A completed lead that never reached the store worker
pub fn record_lead_dropped(reason: &'static str) {
    ::metrics::counter!(LEADS_DROPPED_TOTAL, "reason" => reason).increment(1);
}

/// Count the conversation events worth graphing
pub fn record_event(event: &ConversationEvent) {
    match event {
        ConversationEvent::IntentMatched(topic) => {
            ::metrics::counter!(INTENTS_TOTAL, "topic" => topic.as_str()).increment(1);
        },
        ConversationEvent::CaptureStarted => {
            ::metrics::counter!(CAPTURES_STARTED_TOTAL).increment(1);
        },
        ConversationEvent::FieldRejected(field) => {
            ::metrics::counter!(FIELDS_REJECTED_TOTAL, "field" => field.as_str()).increment(1);
        },
        _ => {},
    }
}

/// Feed one conversation's events into [`record_event`]
///
/// The task ends when the conversation is dropped.
pub fn spawn_event_recorder(mut rx: broadcast::Receiver<ConversationEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => record_event(&event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Event recorder lagged");
                },
                Err(RecvError::Closed) => break,
            }
        }
    })
}

pub fn set_active_sessions(count: usize) {
    ::metrics::gauge!(ACTIVE_SESSIONS).set(count as f64);
}
