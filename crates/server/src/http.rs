//! HTTP Endpoints
//!
//! REST API for the chat widget.

use std::time::Duration;

use axum::{
    extract::{Json, Path, State},
    http::{HeaderValue, Method, StatusCode},
    routing::{get, post},
    Router,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use concierge_agent::Conversation;
use concierge_config::AgentConfig;
use concierge_core::{CaptureState, ConversationMode, TranscriptEntry};

use crate::metrics::{self, metrics_handler};
use crate::state::AppState;

const DEFAULT_ORIGIN: &str = "http://localhost:3000";

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let server = &state.config.server;
    let cors_layer = build_cors_layer(&server.cors_origins, server.cors_enabled);
    let timeout = Duration::from_secs(server.timeout_seconds);

    Router::new()
        .route("/api/sessions", post(create_session).get(list_sessions))
        .route("/api/sessions/:id", get(get_session).delete(delete_session))
        .route("/api/sessions/:id/reset", post(reset_session))
        .route("/api/chat/:session_id", post(chat))
        .route("/api/quick-replies", get(quick_replies))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// Disabled CORS is permissive; no valid origins falls back to localhost.
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins");
        return CorsLayer::permissive();
    }

    let mut parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    if parsed_origins.is_empty() {
        tracing::info!("No valid CORS origins configured, defaulting to {}", DEFAULT_ORIGIN);
        parsed_origins.push(HeaderValue::from_static(DEFAULT_ORIGIN));
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}

/// Session snapshot
#[derive(Debug, Serialize)]
struct SessionView {
    session_id: String,
    active: bool,
    mode: ConversationMode,
    capture_state: CaptureState,
    leads_completed: u64,
    created_at: chrono::DateTime<chrono::Utc>,
    transcript: Vec<TranscriptEntry>,
    quick_replies: Vec<String>,
}

impl SessionView {
    fn new(active: bool, conversation: &Conversation) -> Self {
        Self {
            session_id: conversation.session_id().to_string(),
            active,
            mode: conversation.mode(),
            capture_state: conversation.capture_state(),
            leads_completed: conversation.leads_completed(),
            created_at: conversation.created_at(),
            transcript: conversation.transcript().to_vec(),
            quick_replies: conversation.quick_replies().to_vec(),
        }
    }
}

/// Create a session
async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionView>), StatusCode> {
    let session = state
        .sessions
        .create(&state.conversation, &state.leads)
        .map_err(StatusCode::from)?;

    let conversation = session.conversation.lock().await;
    metrics::spawn_event_recorder(conversation.subscribe());
    Ok((
        StatusCode::CREATED,
        Json(SessionView::new(session.is_active(), &conversation)),
    ))
}

/// Get session info
async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, StatusCode> {
    let session = state.sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    let conversation = session.conversation.lock().await;
    Ok(Json(SessionView::new(session.is_active(), &conversation)))
}

/// Delete session, abandoning any partial lead
async fn delete_session(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    if state.sessions.remove(&id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// Reset a conversation to its welcome entry
async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, StatusCode> {
    let session = state.sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    session.touch();

    let mut conversation = session.conversation.lock().await;
    conversation.reset();
    Ok(Json(SessionView::new(session.is_active(), &conversation)))
}

/// List sessions
async fn list_sessions(State(state): State<AppState>) -> Json<serde_json::Value> {
    let sessions = state.sessions.list();
    Json(serde_json::json!({
        "sessions": sessions,
        "count": sessions.len(),
    }))
}

/// Chat request
#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
    /// Set when the visitor tapped a quick-reply chip
    #[serde(default)]
    quick_reply: bool,
}

/// Chat response
#[derive(Debug, Serialize)]
struct ChatResponse {
    /// Visitor entry then agent entry; empty for blank input
    entries: Vec<TranscriptEntry>,
    mode: ConversationMode,
    capture_state: CaptureState,
    lead_completed: bool,
}

/// Chat endpoint
///
/// The session's conversation lock is held across the typing delay, so
/// concurrent messages for one visitor are processed strictly in order.
async fn chat(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, StatusCode> {
    let session = state
        .sessions
        .get(&session_id)
        .ok_or(StatusCode::NOT_FOUND)?;

    let mut conversation = session.conversation.lock().await;
    session.touch();

    let outcome = conversation.submit_turn(&request.message);
    let capture_state = conversation.capture_state();

    if !outcome.is_empty() {
        metrics::record_turn(capture_state.as_str());
        let delay = typing_delay(&state.config.agent, request.quick_reply);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    Ok(Json(ChatResponse {
        lead_completed: outcome.completed_lead.is_some(),
        entries: outcome.entries,
        mode: conversation.mode(),
        capture_state,
    }))
}

/// Delay before the agent reply is revealed
fn typing_delay(config: &AgentConfig, quick_reply: bool) -> Duration {
    let ms = if quick_reply {
        config.quick_reply_delay_ms
    } else if config.typing_delay_max_ms > config.typing_delay_min_ms {
        rand::thread_rng().gen_range(config.typing_delay_min_ms..=config.typing_delay_max_ms)
    } else {
        config.typing_delay_min_ms
    };
    Duration::from_millis(ms)
}

/// Suggested opening utterances
async fn quick_replies(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "quick_replies": state.conversation.content.quick_replies,
    }))
}

/// Health check
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let count = state.sessions.count();
    let at_capacity = count >= state.sessions.max_sessions();

    let status = if at_capacity { "degraded" } else { "healthy" };
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": status,
            "version": env!("CARGO_PKG_VERSION"),
            "environment": state.config.environment,
            "sessions": {
                "active": count,
                "max": state.sessions.max_sessions(),
            },
            "lead_store": state.config.leads.store,
            "metrics_enabled": state.metrics.is_some(),
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use concierge_agent::ConversationConfig;
    use concierge_config::Settings;

    use crate::sink::LeadQueue;

    #[test]
    fn test_router_creation() {
        let (leads, _rx) = LeadQueue::new(4, "chatbot");
        let state = AppState::new(Settings::default(), ConversationConfig::default(), leads);
        let _ = create_router(state);
    }

    #[test]
    fn test_typing_delay_bounds() {
        let config = AgentConfig::default();
        for _ in 0..50 {
            let delay = typing_delay(&config, false).as_millis() as u64;
            assert!((config.typing_delay_min_ms..=config.typing_delay_max_ms).contains(&delay));
        }
        assert_eq!(
            typing_delay(&config, true),
            Duration::from_millis(config.quick_reply_delay_ms)
        );
        assert!(typing_delay(&AgentConfig::without_delays(), false).is_zero());
    }

    #[test]
    fn test_cors_layer_variants() {
        let _ = build_cors_layer(&[], false);
        let _ = build_cors_layer(&[], true);
        let _ = build_cors_layer(&["https://studio.example".to_string()], true);
    }
}
