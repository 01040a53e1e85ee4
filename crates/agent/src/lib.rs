//! Conversational agent for the studio concierge
//!
//! Features:
//! - Lead capture state machine (name → email → contact → service → budget)
//! - Response composer rendering FAQ answers and capture prompts
//! - Conversation controller routing each turn to capture or FAQ matching
//! - Lead hand-off to a [`LeadSink`](concierge_core::LeadSink)

pub mod capture;
pub mod composer;
pub mod conversation;

pub use capture::{advance, Advance, CapturePrompt, CaptureStep, LeadCapture};
pub use composer::{Reply, ResponseComposer};
pub use conversation::{Conversation, ConversationConfig, ConversationEvent, TurnOutcome};

use concierge_core::CaptureState;
use thiserror::Error;

/// Agent errors
///
/// Never surfaced to a visitor; `Conversation::submit_turn` recovers from
/// all of them by re-prompting.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Capture machine cannot take input in state {0}")]
    CaptureInactive(CaptureState),

    #[error("Lead record error: {0}")]
    Lead(#[from] concierge_core::Error),

    #[error("Intent rules error: {0}")]
    Intent(#[from] concierge_text_processing::TextProcessingError),

    #[error("Content error: {0}")]
    Content(#[from] concierge_config::ConfigError),
}

pub type Result<T> = std::result::Result<T, AgentError>;
