//! Lead record and capture state
//!
//! The lead record is filled one field at a time in a fixed order
//! (name → email → contact → service interest → budget). `CaptureState`
//! names the field currently being elicited; the two are kept consistent
//! by only ever filling the field the state is waiting for.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A field of the lead record, in capture order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadField {
    Name,
    Email,
    Contact,
    ServiceInterest,
    BudgetRange,
}

impl LeadField {
    /// All fields in the order they are captured
    pub const ORDER: [LeadField; 5] = [
        LeadField::Name,
        LeadField::Email,
        LeadField::Contact,
        LeadField::ServiceInterest,
        LeadField::BudgetRange,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadField::Name => "name",
            LeadField::Email => "email",
            LeadField::Contact => "contact",
            LeadField::ServiceInterest => "service_interest",
            LeadField::BudgetRange => "budget_range",
        }
    }

    /// Position in the capture sequence (0-based)
    pub fn position(&self) -> usize {
        match self {
            LeadField::Name => 0,
            LeadField::Email => 1,
            LeadField::Contact => 2,
            LeadField::ServiceInterest => 3,
            LeadField::BudgetRange => 4,
        }
    }

    /// Whether the field is a contact channel that must pass a format check
    pub fn is_strict(&self) -> bool {
        matches!(self, LeadField::Email | LeadField::Contact)
    }
}

impl std::fmt::Display for LeadField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which lead field is currently being elicited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CaptureState {
    /// Capture mode is off; the agent answers FAQs
    #[default]
    Inactive,
    AwaitingName,
    AwaitingEmail,
    AwaitingContact,
    AwaitingService,
    AwaitingBudget,
    /// All five fields are set; transient until the lead is handed off
    Complete,
}

impl CaptureState {
    /// The field this state is waiting for
    pub fn awaited_field(&self) -> Option<LeadField> {
        match self {
            CaptureState::AwaitingName => Some(LeadField::Name),
            CaptureState::AwaitingEmail => Some(LeadField::Email),
            CaptureState::AwaitingContact => Some(LeadField::Contact),
            CaptureState::AwaitingService => Some(LeadField::ServiceInterest),
            CaptureState::AwaitingBudget => Some(LeadField::BudgetRange),
            CaptureState::Inactive | CaptureState::Complete => None,
        }
    }

    /// State that follows a successful answer in this state
    pub fn next(&self) -> CaptureState {
        match self {
            CaptureState::Inactive => CaptureState::Inactive,
            CaptureState::AwaitingName => CaptureState::AwaitingEmail,
            CaptureState::AwaitingEmail => CaptureState::AwaitingContact,
            CaptureState::AwaitingContact => CaptureState::AwaitingService,
            CaptureState::AwaitingService => CaptureState::AwaitingBudget,
            CaptureState::AwaitingBudget => CaptureState::Complete,
            CaptureState::Complete => CaptureState::Inactive,
        }
    }

    /// State that elicits the given field
    pub fn awaiting(field: LeadField) -> CaptureState {
        match field {
            LeadField::Name => CaptureState::AwaitingName,
            LeadField::Email => CaptureState::AwaitingEmail,
            LeadField::Contact => CaptureState::AwaitingContact,
            LeadField::ServiceInterest => CaptureState::AwaitingService,
            LeadField::BudgetRange => CaptureState::AwaitingBudget,
        }
    }

    /// Whether capture mode is on
    pub fn is_active(&self) -> bool {
        !matches!(self, CaptureState::Inactive)
    }

    /// Check the state against the fields already filled in `lead`.
    ///
    /// `Awaiting<F>` requires every field before `F` to be set and `F` and
    /// everything after it to be unset. `Complete` requires all five.
    /// `Inactive` accepts any record (an abandoned or handed-off lead).
    pub fn is_consistent_with(&self, lead: &LeadRecord) -> bool {
        match self {
            CaptureState::Inactive => true,
            CaptureState::Complete => lead.is_complete(),
            state => {
                let Some(awaited) = state.awaited_field() else {
                    return false;
                };
                LeadField::ORDER
                    .iter()
                    .all(|f| lead.get(*f).is_some() == (f.position() < awaited.position()))
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureState::Inactive => "inactive",
            CaptureState::AwaitingName => "awaiting_name",
            CaptureState::AwaitingEmail => "awaiting_email",
            CaptureState::AwaitingContact => "awaiting_contact",
            CaptureState::AwaitingService => "awaiting_service",
            CaptureState::AwaitingBudget => "awaiting_budget",
            CaptureState::Complete => "complete",
        }
    }
}

impl std::fmt::Display for CaptureState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lead qualification data gathered during capture mode
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_interest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_range: Option<String>,
}

impl LeadRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a field, if set
    pub fn get(&self, field: LeadField) -> Option<&str> {
        match field {
            LeadField::Name => self.name.as_deref(),
            LeadField::Email => self.email.as_deref(),
            LeadField::Contact => self.contact.as_deref(),
            LeadField::ServiceInterest => self.service_interest.as_deref(),
            LeadField::BudgetRange => self.budget_range.as_deref(),
        }
    }

    /// First field in capture order that is still empty
    pub fn next_missing(&self) -> Option<LeadField> {
        LeadField::ORDER.into_iter().find(|f| self.get(*f).is_none())
    }

    /// Fill the next field in capture order.
    ///
    /// Fails if `field` is not the next missing field, so a record can never
    /// be filled out of order or have a field overwritten.
    pub fn fill(&mut self, field: LeadField, value: impl Into<String>) -> Result<()> {
        if self.next_missing() != Some(field) {
            return Err(Error::OutOfOrder {
                field,
                state: self
                    .next_missing()
                    .map(CaptureState::awaiting)
                    .unwrap_or(CaptureState::Complete),
            });
        }

        let value = value.into();
        if value.trim().is_empty() {
            return Err(Error::InvalidValue {
                field,
                message: "value is empty".to_string(),
            });
        }

        let slot = match field {
            LeadField::Name => &mut self.name,
            LeadField::Email => &mut self.email,
            LeadField::Contact => &mut self.contact,
            LeadField::ServiceInterest => &mut self.service_interest,
            LeadField::BudgetRange => &mut self.budget_range,
        };
        *slot = Some(value);
        Ok(())
    }

    /// Number of fields set
    pub fn filled_count(&self) -> usize {
        LeadField::ORDER
            .iter()
            .filter(|f| self.get(**f).is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.filled_count() == 0
    }

    pub fn is_complete(&self) -> bool {
        self.next_missing().is_none()
    }

    /// Ensure all five fields are present
    pub fn ensure_complete(&self) -> Result<()> {
        match self.next_missing() {
            Some(field) => Err(Error::IncompleteLead(field)),
            None => Ok(()),
        }
    }

    /// Email with the local part masked, for log fields
    pub fn masked_email(&self) -> Option<String> {
        self.email.as_deref().map(mask_email)
    }

    /// Contact with all but the last four digits masked, for log fields
    pub fn masked_contact(&self) -> Option<String> {
        self.contact.as_deref().map(mask_contact)
    }
}

fn mask_email(email: &str) -> String {
    match email.trim().split_once('@') {
        Some((local, domain)) => {
            let first = local.chars().next().map(String::from).unwrap_or_default();
            format!("{}***@{}", first, domain)
        },
        None => "***".to_string(),
    }
}

fn mask_contact(contact: &str) -> String {
    let digits: Vec<char> = contact.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = digits[digits.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(digits.len() - 4), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_lead() -> LeadRecord {
        let mut lead = LeadRecord::new();
        lead.fill(LeadField::Name, "Jane Doe").unwrap();
        lead.fill(LeadField::Email, "jane@x.com").unwrap();
        lead.fill(LeadField::Contact, "5551234567").unwrap();
        lead.fill(LeadField::ServiceInterest, "Logo Design").unwrap();
        lead.fill(LeadField::BudgetRange, "Under $500").unwrap();
        lead
    }

    #[test]
    fn test_fill_in_order() {
        let lead = complete_lead();
        assert!(lead.is_complete());
        assert_eq!(lead.filled_count(), 5);
        assert_eq!(lead.get(LeadField::ServiceInterest), Some("Logo Design"));
        assert!(lead.ensure_complete().is_ok());
    }

    #[test]
    fn test_fill_out_of_order_rejected() {
        let mut lead = LeadRecord::new();
        let err = lead.fill(LeadField::Email, "jane@x.com").unwrap_err();
        assert_eq!(
            err,
            Error::OutOfOrder {
                field: LeadField::Email,
                state: CaptureState::AwaitingName,
            }
        );
        assert!(lead.is_empty());

        lead.fill(LeadField::Name, "Jane").unwrap();
        // No overwriting an already captured field
        assert!(lead.fill(LeadField::Name, "Janet").is_err());
        assert_eq!(lead.name.as_deref(), Some("Jane"));
    }

    #[test]
    fn test_fill_rejects_blank() {
        let mut lead = LeadRecord::new();
        assert!(matches!(
            lead.fill(LeadField::Name, "   "),
            Err(Error::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_state_sequence() {
        let mut state = CaptureState::AwaitingName;
        let mut seen = vec![];
        while let Some(field) = state.awaited_field() {
            seen.push(field);
            state = state.next();
        }
        assert_eq!(seen, LeadField::ORDER.to_vec());
        assert_eq!(state, CaptureState::Complete);
        assert_eq!(state.next(), CaptureState::Inactive);
    }

    #[test]
    fn test_state_consistency() {
        let mut lead = LeadRecord::new();
        assert!(CaptureState::AwaitingName.is_consistent_with(&lead));
        assert!(!CaptureState::AwaitingEmail.is_consistent_with(&lead));

        lead.fill(LeadField::Name, "Jane").unwrap();
        assert!(CaptureState::AwaitingEmail.is_consistent_with(&lead));
        assert!(!CaptureState::AwaitingName.is_consistent_with(&lead));
        assert!(!CaptureState::Complete.is_consistent_with(&lead));

        let lead = complete_lead();
        assert!(CaptureState::Complete.is_consistent_with(&lead));
        assert!(CaptureState::Inactive.is_consistent_with(&lead));
        assert!(!CaptureState::AwaitingBudget.is_consistent_with(&lead));
    }

    #[test]
    fn test_masking() {
        let lead = complete_lead();
        assert_eq!(lead.masked_email().as_deref(), Some("j***@x.com"));
        assert_eq!(lead.masked_contact().as_deref(), Some("******4567"));
        assert_eq!(mask_contact("123"), "****");
    }

    #[test]
    fn test_serde_field_names() {
        let json = serde_json::to_value(complete_lead()).unwrap();
        assert_eq!(json["service_interest"], "Logo Design");
        assert_eq!(json["budget_range"], "Under $500");

        let partial = serde_json::to_value(LeadRecord::new()).unwrap();
        assert_eq!(partial, serde_json::json!({}));
    }
}
