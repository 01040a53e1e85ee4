//! Transcript types and conversation mode

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who produced a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// The concierge
    Agent,
    /// The website visitor
    Visitor,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Agent => "agent",
            Origin::Visitor => "visitor",
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One line of the conversation transcript
///
/// Entries are append-only; insertion order is conversational order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub id: Uuid,
    pub origin: Origin,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl TranscriptEntry {
    pub fn new(origin: Origin, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            origin,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn agent(text: impl Into<String>) -> Self {
        Self::new(Origin::Agent, text)
    }

    pub fn visitor(text: impl Into<String>) -> Self {
        Self::new(Origin::Visitor, text)
    }

    pub fn is_agent(&self) -> bool {
        self.origin == Origin::Agent
    }
}

/// What the controller does with the next utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConversationMode {
    /// Only the greeting has been shown
    #[default]
    Idle,
    /// Utterances go to the intent matcher
    InFaqMode,
    /// Utterances go to the lead capture machine
    InCaptureMode,
}

impl ConversationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationMode::Idle => "idle",
            ConversationMode::InFaqMode => "in_faq_mode",
            ConversationMode::InCaptureMode => "in_capture_mode",
        }
    }
}

impl std::fmt::Display for ConversationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_constructors() {
        let a = TranscriptEntry::agent("Hello");
        let v = TranscriptEntry::visitor("hi");
        assert!(a.is_agent());
        assert!(!v.is_agent());
        assert_ne!(a.id, v.id);
        assert!(a.timestamp <= v.timestamp);
    }

    #[test]
    fn test_origin_serde() {
        let entry = TranscriptEntry::visitor("hi");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["origin"], "visitor");
        assert_eq!(json["text"], "hi");
    }

    #[test]
    fn test_default_mode() {
        assert_eq!(ConversationMode::default(), ConversationMode::Idle);
        assert_eq!(
            serde_json::to_value(ConversationMode::InCaptureMode).unwrap(),
            "in_capture_mode"
        );
    }

    #[test]
    fn test_mode_str_matches_serde() {
        for mode in [
            ConversationMode::Idle,
            ConversationMode::InFaqMode,
            ConversationMode::InCaptureMode,
        ] {
            assert_eq!(serde_json::to_value(mode).unwrap(), mode.as_str());
            assert_eq!(mode.to_string(), mode.as_str());
        }
    }
}
