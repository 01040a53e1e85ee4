//! Core traits and types for the studio concierge
//!
//! This crate provides foundational types used across all other crates:
//! - Transcript entries and their origin (agent / visitor)
//! - The lead record and the capture state that drives its collection
//! - FAQ topics the intent matcher resolves utterances to
//! - The `LeadSink` trait at the boundary to external persistence
//! - Error types

pub mod conversation;
pub mod error;
pub mod lead;
pub mod topic;
pub mod traits;

pub use conversation::{ConversationMode, Origin, TranscriptEntry};
pub use error::{Error, Result};
pub use lead::{CaptureState, LeadField, LeadRecord};
pub use topic::ResponseKey;
pub use traits::{LeadSink, NoopLeadSink, SinkError};
