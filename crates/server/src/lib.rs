//! Studio Concierge Server
//!
//! HTTP host for the chat widget: per-visitor sessions, the typing delay,
//! background lead hand-off and Prometheus metrics.

pub mod http;
pub mod metrics;
pub mod session;
pub mod sink;
pub mod state;

pub use http::create_router;
pub use metrics::{init_metrics, metrics_handler};
pub use session::{Session, SessionManager};
pub use sink::{spawn_lead_worker, ChannelLeadSink, LeadQueue};
pub use state::AppState;

use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Session not found: {0}")]
    Session(String),

    #[error("Max sessions reached ({0})")]
    Capacity(usize),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] concierge_persistence::PersistenceError),
}

impl From<ServerError> for axum::http::StatusCode {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::Session(_) => axum::http::StatusCode::NOT_FOUND,
            ServerError::Capacity(_) => axum::http::StatusCode::SERVICE_UNAVAILABLE,
            ServerError::InvalidRequest(_) => axum::http::StatusCode::BAD_REQUEST,
            ServerError::Internal(_) => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Persistence(_) => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
