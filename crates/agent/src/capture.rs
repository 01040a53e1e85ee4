//! Lead Capture State Machine
//!
//! Once activated, elicits the lead fields one at a time:
//!
//! ```text
//! AwaitingName ─► AwaitingEmail ─► AwaitingContact ─► AwaitingService ─► AwaitingBudget ─► Complete
//!      ▲ │             ▲ │              ▲ │
//!      └─┘ retry       └─┘ retry        └─┘ retry
//! ```
//!
//! Name, email and contact are validated and re-asked on failure with no
//! retry cap. Service interest and budget accept any non-empty answer.
//! `Complete` is transient: [`LeadCapture`] hands the lead out and resets
//! to `Inactive` in the same step.

use concierge_core::{CaptureState, LeadField, LeadRecord};
use concierge_text_processing::{FieldValidator, Validation};

use crate::{AgentError, Result};

/// What the agent should say after a capture step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapturePrompt {
    /// Ask for `field`; `name` is the visitor's name once known, for echoing
    Ask {
        field: LeadField,
        name: Option<String>,
    },
    /// The answer for `field` was rejected; ask again
    Retry { field: LeadField },
    /// All five fields captured
    Confirmation,
}

/// Result of one pure transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advance {
    pub state: CaptureState,
    pub lead: LeadRecord,
    pub prompt: CapturePrompt,
}

/// Run one capture transition.
///
/// Takes the current state and lead by value and returns the next pair.
/// On a rejected answer the state and lead come back unchanged.
pub fn advance(
    state: CaptureState,
    mut lead: LeadRecord,
    utterance: &str,
    validator: &FieldValidator,
) -> Result<Advance> {
    let field = state
        .awaited_field()
        .ok_or(AgentError::CaptureInactive(state))?;

    let value = match validator.validate(field, utterance) {
        Validation::Accepted(value) => value,
        Validation::Rejected => {
            return Ok(Advance {
                state,
                lead,
                prompt: CapturePrompt::Retry { field },
            });
        },
    };

    lead.fill(field, value)?;
    let next = state.next();

    let prompt = match next.awaited_field() {
        Some(next_field) => CapturePrompt::Ask {
            field: next_field,
            name: lead.name.clone(),
        },
        None => CapturePrompt::Confirmation,
    };

    debug_assert!(next.is_consistent_with(&lead));

    Ok(Advance {
        state: next,
        lead,
        prompt,
    })
}

/// Outcome of feeding one utterance to [`LeadCapture`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureStep {
    pub prompt: CapturePrompt,
    /// Set exactly once per activation, on the step that completes the lead
    pub completed: Option<LeadRecord>,
}

/// Stateful wrapper owning the capture state and the lead being built
#[derive(Debug, Clone, Default)]
pub struct LeadCapture {
    state: CaptureState,
    lead: LeadRecord,
    validator: FieldValidator,
    /// Number of times capture has been activated
    activations: u64,
}

impl LeadCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// The partial lead being captured
    pub fn lead(&self) -> &LeadRecord {
        &self.lead
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn activations(&self) -> u64 {
        self.activations
    }

    /// Start capture with a fresh, empty lead
    pub fn activate(&mut self) -> CapturePrompt {
        if self.is_active() {
            tracing::debug!(state = %self.state, "Capture re-activated; discarding partial lead");
        }
        self.state = CaptureState::AwaitingName;
        self.lead = LeadRecord::new();
        self.activations += 1;

        CapturePrompt::Ask {
            field: LeadField::Name,
            name: None,
        }
    }

    /// Feed one answer into the machine
    pub fn submit(&mut self, utterance: &str) -> Result<CaptureStep> {
        let lead = std::mem::take(&mut self.lead);
        let from = self.state;

        let step = match advance(from, lead, utterance, &self.validator) {
            Ok(step) => step,
            Err(e) => {
                // The partial lead is dropped with the failed step
                self.state = CaptureState::Inactive;
                return Err(e);
            },
        };

        if step.state != from {
            tracing::debug!(from = %from, to = %step.state, "Capture advanced");
        }

        if step.state == CaptureState::Complete {
            self.state = CaptureState::Inactive;
            return Ok(CaptureStep {
                prompt: step.prompt,
                completed: Some(step.lead),
            });
        }

        self.state = step.state;
        self.lead = step.lead;
        Ok(CaptureStep {
            prompt: step.prompt,
            completed: None,
        })
    }

    /// Drop any partial lead and deactivate
    pub fn abandon(&mut self) {
        self.state = CaptureState::Inactive;
        self.lead = LeadRecord::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(capture: &mut LeadCapture, answers: &[&str]) -> Vec<CaptureStep> {
        answers
            .iter()
            .map(|a| capture.submit(a).unwrap())
            .collect()
    }

    #[test]
    fn test_pure_advance_fills_in_order() {
        let v = FieldValidator::new();
        let step = advance(CaptureState::AwaitingName, LeadRecord::new(), "Jane", &v).unwrap();
        assert_eq!(step.state, CaptureState::AwaitingEmail);
        assert_eq!(step.lead.name.as_deref(), Some("Jane"));
        assert_eq!(
            step.prompt,
            CapturePrompt::Ask {
                field: LeadField::Email,
                name: Some("Jane".to_string())
            }
        );
    }

    #[test]
    fn test_pure_advance_rejects_without_change() {
        let v = FieldValidator::new();
        let mut lead = LeadRecord::new();
        lead.fill(LeadField::Name, "Jane").unwrap();

        let step = advance(CaptureState::AwaitingEmail, lead.clone(), "testatx.com", &v).unwrap();
        assert_eq!(step.state, CaptureState::AwaitingEmail);
        assert_eq!(step.lead, lead);
        assert_eq!(
            step.prompt,
            CapturePrompt::Retry {
                field: LeadField::Email
            }
        );
    }

    #[test]
    fn test_advance_inactive_is_error() {
        let v = FieldValidator::new();
        let err = advance(CaptureState::Inactive, LeadRecord::new(), "x", &v).unwrap_err();
        assert!(matches!(err, AgentError::CaptureInactive(CaptureState::Inactive)));
    }

    #[test]
    fn test_full_capture() {
        let mut capture = LeadCapture::new();
        assert!(!capture.is_active());
        assert_eq!(
            capture.activate(),
            CapturePrompt::Ask {
                field: LeadField::Name,
                name: None
            }
        );

        let steps = run(
            &mut capture,
            &["Jane Doe", "jane@x.com", "5551234567", "Logo Design", "Under $500"],
        );

        assert!(steps[..4].iter().all(|s| s.completed.is_none()));
        let lead = steps[4].completed.clone().unwrap();
        assert_eq!(steps[4].prompt, CapturePrompt::Confirmation);
        assert_eq!(lead.name.as_deref(), Some("Jane Doe"));
        assert_eq!(lead.budget_range.as_deref(), Some("Under $500"));
        assert_eq!(capture.state(), CaptureState::Inactive);
        assert!(capture.lead().is_empty());
    }

    #[test]
    fn test_name_rejects_email() {
        let mut capture = LeadCapture::new();
        capture.activate();
        let step = capture.submit("jane@x.com").unwrap();
        assert_eq!(
            step.prompt,
            CapturePrompt::Retry {
                field: LeadField::Name
            }
        );
        assert_eq!(capture.state(), CaptureState::AwaitingName);
    }

    #[test]
    fn test_unbounded_retries() {
        let mut capture = LeadCapture::new();
        capture.activate();
        capture.submit("Jane").unwrap();
        capture.submit("jane@x.com").unwrap();

        for _ in 0..25 {
            let step = capture.submit("call me").unwrap();
            assert_eq!(
                step.prompt,
                CapturePrompt::Retry {
                    field: LeadField::Contact
                }
            );
        }
        assert_eq!(capture.state(), CaptureState::AwaitingContact);
        assert!(capture.state().is_consistent_with(capture.lead()));

        capture.submit("+1 (555) 123-4567").unwrap();
        assert_eq!(capture.state(), CaptureState::AwaitingService);
    }

    #[test]
    fn test_reactivation_starts_fresh() {
        let mut capture = LeadCapture::new();
        capture.activate();
        run(&mut capture, &["Jane", "jane@x.com"]);
        assert_eq!(capture.state(), CaptureState::AwaitingContact);

        capture.activate();
        assert_eq!(capture.state(), CaptureState::AwaitingName);
        assert!(capture.lead().is_empty());
        assert_eq!(capture.activations(), 2);
    }

    #[test]
    fn test_abandon() {
        let mut capture = LeadCapture::new();
        capture.activate();
        capture.submit("Jane").unwrap();
        capture.abandon();
        assert!(!capture.is_active());
        assert!(capture.lead().is_empty());
        assert!(capture.submit("anything").is_err());
    }
}
