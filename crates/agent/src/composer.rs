//! Response Composer
//!
//! Pure lookup from a reply key to display text. All copy comes from
//! [`ChatbotContent`]; the composer only selects a template and fills in
//! `{name}` and `{options}`.

use std::sync::Arc;

use concierge_config::ChatbotContent;
use concierge_core::{LeadField, ResponseKey};

use crate::capture::CapturePrompt;

const NAME_PLACEHOLDER: &str = "{name}";
const OPTIONS_PLACEHOLDER: &str = "{options}";

/// Anything the agent can reply with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Topic(ResponseKey),
    Capture(CapturePrompt),
}

/// Renders replies from chatbot content
#[derive(Debug, Clone)]
pub struct ResponseComposer {
    content: Arc<ChatbotContent>,
}

impl ResponseComposer {
    pub fn new(content: Arc<ChatbotContent>) -> Self {
        Self { content }
    }

    pub fn content(&self) -> &ChatbotContent {
        &self.content
    }

    /// Greeting seeded into every new transcript
    pub fn welcome(&self) -> &str {
        &self.content.welcome
    }

    pub fn quick_replies(&self) -> &[String] {
        &self.content.quick_replies
    }

    /// Text to display for a reply
    pub fn compose(&self, reply: &Reply) -> String {
        match reply {
            Reply::Topic(key) => self.content.faq_text(*key).to_string(),
            Reply::Capture(prompt) => self.compose_prompt(prompt),
        }
    }

    fn compose_prompt(&self, prompt: &CapturePrompt) -> String {
        let capture = &self.content.capture;
        match prompt {
            CapturePrompt::Ask { field, name } => {
                let template = self.ask_template(*field);
                let text = match name {
                    Some(name) => template.replace(NAME_PLACEHOLDER, name),
                    None => template.replace(NAME_PLACEHOLDER, "there"),
                };
                self.fill_options(*field, text)
            },
            CapturePrompt::Retry { field } => match field {
                LeadField::Name => capture.retry_name.clone(),
                LeadField::Email => capture.retry_email.clone(),
                LeadField::Contact => capture.retry_contact.clone(),
                // free-text fields never fail validation except when blank
                other => self.fill_options(*other, self.ask_template(*other).to_string()),
            },
            CapturePrompt::Confirmation => capture.confirmation.clone(),
        }
    }

    fn ask_template(&self, field: LeadField) -> &str {
        let capture = &self.content.capture;
        match field {
            LeadField::Name => &capture.ask_name,
            LeadField::Email => &capture.ask_email,
            LeadField::Contact => &capture.ask_contact,
            LeadField::ServiceInterest => &capture.ask_service,
            LeadField::BudgetRange => &capture.ask_budget,
        }
    }

    fn fill_options(&self, field: LeadField, text: String) -> String {
        if !text.contains(OPTIONS_PLACEHOLDER) {
            return text;
        }
        let capture = &self.content.capture;
        let options = match field {
            LeadField::ServiceInterest => capture
                .service_menu
                .iter()
                .enumerate()
                .map(|(i, s)| format!("{}. {}", i + 1, s))
                .collect::<Vec<_>>()
                .join("\n"),
            LeadField::BudgetRange => capture
                .budget_tiers
                .iter()
                .map(|t| format!("• {}", t))
                .collect::<Vec<_>>()
                .join("\n"),
            _ => String::new(),
        };
        text.replace(OPTIONS_PLACEHOLDER, &options)
    }
}

impl Default for ResponseComposer {
    fn default() -> Self {
        Self::new(Arc::new(ChatbotContent::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ask(field: LeadField, name: Option<&str>) -> Reply {
        Reply::Capture(CapturePrompt::Ask {
            field,
            name: name.map(String::from),
        })
    }

    #[test]
    fn test_topic_lookup() {
        let composer = ResponseComposer::default();
        let text = composer.compose(&Reply::Topic(ResponseKey::Services));
        assert!(text.starts_with("I offer three main services"));
        let text = composer.compose(&Reply::Topic(ResponseKey::Default));
        assert!(text.contains("What would you like to know?"));
    }

    #[test]
    fn test_name_echo() {
        let composer = ResponseComposer::default();
        let text = composer.compose(&ask(LeadField::Email, Some("Jane Doe")));
        assert!(text.starts_with("Nice to meet you, Jane Doe!"));
        assert!(!text.contains("{name}"));
    }

    #[test]
    fn test_service_menu_numbered() {
        let composer = ResponseComposer::default();
        let text = composer.compose(&ask(LeadField::ServiceInterest, Some("Jane")));
        assert!(text.contains("1. Logo Design\n2. YouTube Thumbnails\n3. Video Editing\n4. Complete Branding Package"));
        assert!(!text.contains("{options}"));
    }

    #[test]
    fn test_budget_tiers_bulleted() {
        let composer = ResponseComposer::default();
        let text = composer.compose(&ask(LeadField::BudgetRange, Some("Jane")));
        assert!(text.contains("• Under $500\n• $500 - $1,000"));
        assert!(text.ends_with("• Not sure yet"));
    }

    #[test]
    fn test_start_project_equals_name_prompt() {
        let composer = ResponseComposer::default();
        assert_eq!(
            composer.compose(&Reply::Topic(ResponseKey::StartProject)),
            composer.compose(&ask(LeadField::Name, None))
        );
    }

    #[test]
    fn test_retry_and_confirmation() {
        let composer = ResponseComposer::default();
        let retry = composer.compose(&Reply::Capture(CapturePrompt::Retry {
            field: LeadField::Email,
        }));
        assert_eq!(retry, composer.content().capture.retry_email);

        let done = composer.compose(&Reply::Capture(CapturePrompt::Confirmation));
        assert!(done.contains("I've got all the details I need"));
    }
}
