//! Conversation Management
//!
//! One [`Conversation`] per visitor. Each call to
//! [`Conversation::submit_turn`] appends the visitor entry, routes the
//! utterance to the capture machine or the intent matcher, appends the
//! agent reply and returns both new entries plus any lead completed on
//! this turn. Turns are strictly sequential; the controller takes
//! `&mut self` and the host serializes access.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use concierge_config::ChatbotContent;
use concierge_core::{
    CaptureState, ConversationMode, LeadField, LeadRecord, LeadSink, Origin, ResponseKey,
    TranscriptEntry,
};
use concierge_text_processing::{is_blank, IntentMatcher};
use tokio::sync::broadcast;

use crate::capture::{CapturePrompt, LeadCapture};
use crate::composer::{Reply, ResponseComposer};
use crate::Result;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Shared, immutable resources for building conversations
///
/// Cheap to clone; one instance is shared by every session in a process.
#[derive(Debug, Clone)]
pub struct ConversationConfig {
    pub content: Arc<ChatbotContent>,
    pub matcher: Arc<IntentMatcher>,
}

impl ConversationConfig {
    /// Build from content, compiling its intent rules
    pub fn from_content(content: ChatbotContent) -> Result<Self> {
        let matcher = IntentMatcher::from_config(&content.intent_rules)?;
        Ok(Self {
            content: Arc::new(content),
            matcher: Arc::new(matcher),
        })
    }

    /// Load content from an optional YAML path
    pub fn load(content_path: Option<&str>) -> Result<Self> {
        let content = ChatbotContent::load_or_default(content_path)?;
        Self::from_content(content)
    }
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            content: Arc::new(ChatbotContent::default()),
            matcher: Arc::new(IntentMatcher::new()),
        }
    }
}

/// Conversation events
#[derive(Debug, Clone)]
pub enum ConversationEvent {
    TurnAdded { origin: Origin, text: String },
    IntentMatched(ResponseKey),
    CaptureStarted,
    FieldCaptured(LeadField),
    FieldRejected(LeadField),
    LeadCompleted(LeadRecord),
    Reset,
}

/// Result of one visitor turn
#[derive(Debug, Clone, Default)]
pub struct TurnOutcome {
    /// New entries in order: visitor, then agent. Empty for blank input.
    pub entries: Vec<TranscriptEntry>,
    /// The lead completed by this turn, if any
    pub completed_lead: Option<LeadRecord>,
}

impl TurnOutcome {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The agent reply added this turn
    pub fn reply(&self) -> Option<&TranscriptEntry> {
        self.entries.iter().find(|e| e.is_agent())
    }
}

/// Per-visitor conversation controller
pub struct Conversation {
    session_id: String,
    transcript: Vec<TranscriptEntry>,
    mode: ConversationMode,
    capture: LeadCapture,
    matcher: Arc<IntentMatcher>,
    composer: ResponseComposer,
    sink: Arc<dyn LeadSink>,
    event_tx: broadcast::Sender<ConversationEvent>,
    leads_completed: u64,
    created_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a conversation seeded with the welcome entry
    pub fn new(
        session_id: impl Into<String>,
        config: &ConversationConfig,
        sink: Arc<dyn LeadSink>,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let composer = ResponseComposer::new(config.content.clone());
        let welcome = TranscriptEntry::agent(composer.welcome());

        Self {
            session_id: session_id.into(),
            transcript: vec![welcome],
            mode: ConversationMode::Idle,
            capture: LeadCapture::new(),
            matcher: config.matcher.clone(),
            composer,
            sink,
            event_tx,
            leads_completed: 0,
            created_at: Utc::now(),
        }
    }

    /// Subscribe to conversation events
    pub fn subscribe(&self) -> broadcast::Receiver<ConversationEvent> {
        self.event_tx.subscribe()
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Full transcript, welcome entry first
    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn mode(&self) -> ConversationMode {
        self.mode
    }

    pub fn capture_state(&self) -> CaptureState {
        self.capture.state()
    }

    /// Partial lead while capture is active
    pub fn pending_lead(&self) -> &LeadRecord {
        self.capture.lead()
    }

    pub fn leads_completed(&self) -> u64 {
        self.leads_completed
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Suggested opening utterances
    pub fn quick_replies(&self) -> &[String] {
        self.composer.quick_replies()
    }

    /// Process one visitor utterance.
    ///
    /// Blank input is ignored and yields an empty outcome.
    pub fn submit_turn(&mut self, utterance: &str) -> TurnOutcome {
        if is_blank(utterance) {
            return TurnOutcome::default();
        }

        let visitor = self.append(TranscriptEntry::visitor(utterance));

        let (reply, completed_lead) = if self.capture.is_active() {
            self.capture_turn(utterance)
        } else {
            (self.faq_turn(utterance), None)
        };

        self.mode = if self.capture.is_active() {
            ConversationMode::InCaptureMode
        } else {
            ConversationMode::InFaqMode
        };

        let text = self.composer.compose(&reply);
        let agent = self.append(TranscriptEntry::agent(text));

        if let Some(lead) = &completed_lead {
            self.hand_off(lead);
        }

        TurnOutcome {
            entries: vec![visitor, agent],
            completed_lead,
        }
    }

    /// Back to the welcome entry; any partial lead is abandoned
    pub fn reset(&mut self) {
        if self.capture.is_active() {
            tracing::info!(
                session_id = %self.session_id,
                state = %self.capture.state(),
                "Abandoning partial lead on reset"
            );
        }
        self.capture.abandon();
        self.transcript.truncate(1);
        self.mode = ConversationMode::Idle;
        let _ = self.event_tx.send(ConversationEvent::Reset);
    }

    fn faq_turn(&mut self, utterance: &str) -> Reply {
        let topic = self.matcher.classify(utterance);
        let _ = self.event_tx.send(ConversationEvent::IntentMatched(topic));

        if topic.activates_capture() {
            tracing::info!(session_id = %self.session_id, "Lead capture started");
            let _ = self.event_tx.send(ConversationEvent::CaptureStarted);
            return Reply::Capture(self.capture.activate());
        }

        Reply::Topic(topic)
    }

    fn capture_turn(&mut self, utterance: &str) -> (Reply, Option<LeadRecord>) {
        let awaited = self.capture.state().awaited_field();

        match self.capture.submit(utterance) {
            Ok(step) => {
                match (&step.prompt, awaited) {
                    (CapturePrompt::Retry { field }, _) => {
                        let _ = self.event_tx.send(ConversationEvent::FieldRejected(*field));
                    },
                    (_, Some(field)) => {
                        let _ = self.event_tx.send(ConversationEvent::FieldCaptured(field));
                    },
                    _ => {},
                }
                (Reply::Capture(step.prompt), step.completed)
            },
            Err(e) => {
                // Capture is reset by the failed step; answer as an FAQ turn
                tracing::warn!(session_id = %self.session_id, error = %e, "Capture step failed");
                (self.faq_turn(utterance), None)
            },
        }
    }

    fn hand_off(&mut self, lead: &LeadRecord) {
        self.leads_completed += 1;
        tracing::info!(
            session_id = %self.session_id,
            service = lead.service_interest.as_deref().unwrap_or_default(),
            email = lead.masked_email().as_deref().unwrap_or_default(),
            contact = lead.masked_contact().as_deref().unwrap_or_default(),
            "Lead completed"
        );
        let _ = self
            .event_tx
            .send(ConversationEvent::LeadCompleted(lead.clone()));

        if let Err(e) = self.sink.on_lead_complete(lead) {
            tracing::warn!(
                session_id = %self.session_id,
                error = %e,
                "Lead sink failed; capture state unaffected"
            );
        }
    }

    fn append(&mut self, entry: TranscriptEntry) -> TranscriptEntry {
        let _ = self.event_tx.send(ConversationEvent::TurnAdded {
            origin: entry.origin,
            text: entry.text.clone(),
        });
        self.transcript.push(entry.clone());
        entry
    }
}

impl std::fmt::Debug for Conversation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Conversation")
            .field("session_id", &self.session_id)
            .field("mode", &self.mode)
            .field("capture_state", &self.capture.state())
            .field("entries", &self.transcript.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concierge_core::NoopLeadSink;

    fn conversation() -> Conversation {
        Conversation::new("test", &ConversationConfig::default(), Arc::new(NoopLeadSink))
    }

    #[test]
    fn test_seeded_with_welcome() {
        let conv = conversation();
        assert_eq!(conv.transcript().len(), 1);
        assert!(conv.transcript()[0].is_agent());
        assert!(conv.transcript()[0].text.starts_with("Hi! I'm Adi's Creative Assistant"));
        assert_eq!(conv.mode(), ConversationMode::Idle);
        assert_eq!(conv.quick_replies().len(), 4);
    }

    #[test]
    fn test_blank_input_ignored() {
        let mut conv = conversation();
        let outcome = conv.submit_turn("   ");
        assert!(outcome.is_empty());
        assert_eq!(conv.transcript().len(), 1);
        assert_eq!(conv.mode(), ConversationMode::Idle);
    }

    #[test]
    fn test_faq_turn() {
        let mut conv = conversation();
        let outcome = conv.submit_turn("How much does a logo cost?");
        assert_eq!(outcome.entries.len(), 2);
        assert_eq!(outcome.entries[0].origin, Origin::Visitor);
        assert_eq!(outcome.entries[0].text, "How much does a logo cost?");
        assert!(outcome.reply().unwrap().text.starts_with("My pricing is transparent"));
        assert_eq!(conv.mode(), ConversationMode::InFaqMode);
        assert_eq!(conv.transcript().len(), 3);
    }

    #[test]
    fn test_start_trigger_asks_name_immediately() {
        let mut conv = conversation();
        let outcome = conv.submit_turn("I want to hire you");
        assert!(outcome.reply().unwrap().text.ends_with("First, what's your name?"));
        assert_eq!(conv.mode(), ConversationMode::InCaptureMode);
        assert_eq!(conv.capture_state(), CaptureState::AwaitingName);
    }

    #[test]
    fn test_capture_takes_precedence_over_faq() {
        let mut conv = conversation();
        conv.submit_turn("let's start");
        // Looks like a pricing question but capture is waiting for a name
        conv.submit_turn("Price");
        assert_eq!(conv.pending_lead().name.as_deref(), Some("Price"));
        assert_eq!(conv.capture_state(), CaptureState::AwaitingEmail);
    }

    #[test]
    fn test_reset() {
        let mut conv = conversation();
        conv.submit_turn("hire");
        conv.submit_turn("Jane");
        conv.reset();
        assert_eq!(conv.transcript().len(), 1);
        assert_eq!(conv.capture_state(), CaptureState::Inactive);
        assert!(conv.pending_lead().is_empty());
        assert_eq!(conv.mode(), ConversationMode::Idle);
    }

    #[tokio::test]
    async fn test_events_emitted() {
        let mut conv = conversation();
        let mut rx = conv.subscribe();
        conv.submit_turn("hire");

        let mut events = vec![];
        while let Ok(e) = rx.try_recv() {
            events.push(e);
        }
        assert!(matches!(events[0], ConversationEvent::TurnAdded { origin: Origin::Visitor, .. }));
        assert!(events
            .iter()
            .any(|e| matches!(e, ConversationEvent::IntentMatched(ResponseKey::StartProject))));
        assert!(events.iter().any(|e| matches!(e, ConversationEvent::CaptureStarted)));
    }
}
