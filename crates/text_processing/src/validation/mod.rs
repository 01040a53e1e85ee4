//! Lead field validation
//!
//! Deliberately loose checks: the goal is to catch obvious slips (an email
//! typed where the name was asked, a number without enough digits), not to
//! verify deliverability.
//!
//! Static patterns are compiled once using `once_cell::sync::Lazy`.

use concierge_core::LeadField;
use once_cell::sync::Lazy;
use regex::Regex;

/// Ten or more consecutive digits
static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{10,}").unwrap());

/// Minimum digits a contact number must contain
pub const MIN_CONTACT_DIGITS: usize = 10;

/// Outcome of validating one answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// Accepted; carries the value to store, exactly as the visitor typed it
    Accepted(String),
    /// Rejected; the field should be asked again
    Rejected,
}

impl Validation {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Validation::Accepted(_))
    }
}

/// True if the text contains an `@`, which is enough to reject it as a name
pub fn looks_like_email(text: &str) -> bool {
    text.contains('@')
}

/// True if the text contains an `@` anywhere
pub fn is_valid_email(text: &str) -> bool {
    text.contains('@')
}

/// True if the text holds a phone-like digit run.
///
/// Every non-alphanumeric character is removed first, so
/// `+1 (555) 123-4567` counts as the run `15551234567` and so do numbers
/// separated by en-dashes or non-breaking hyphens.
pub fn is_valid_contact(text: &str) -> bool {
    let compact: String = text.chars().filter(|c| c.is_alphanumeric()).collect();
    DIGIT_RUN.is_match(&compact)
}

/// True if the text can be stored as a name
pub fn is_valid_name(text: &str) -> bool {
    !text.trim().is_empty() && !looks_like_email(text)
}

/// Per-field validation used by the capture machine
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldValidator;

impl FieldValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate an answer for `field`.
    ///
    /// Name, email and contact have format checks. Service interest and
    /// budget accept any non-blank text. Accepted values are returned
    /// untrimmed.
    pub fn validate(&self, field: LeadField, utterance: &str) -> Validation {
        if utterance.trim().is_empty() {
            return Validation::Rejected;
        }

        let ok = match field {
            LeadField::Name => is_valid_name(utterance),
            LeadField::Email => is_valid_email(utterance),
            LeadField::Contact => is_valid_contact(utterance),
            LeadField::ServiceInterest | LeadField::BudgetRange => true,
        };

        if ok {
            Validation::Accepted(utterance.to_string())
        } else {
            tracing::debug!(field = %field, "Answer rejected by validation");
            Validation::Rejected
        }
    }
}
