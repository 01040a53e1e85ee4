//! Chatbot content: every string the concierge can say
//!
//! The built-in defaults are the studio's website copy. A YAML file can
//! override any subset of it; missing keys keep the built-in value.
//!
//! Templates use two placeholders:
//! - `{name}` in capture prompts: the name the visitor just gave
//! - `{options}` in the service / budget prompts: the rendered menu

use concierge_core::ResponseKey;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ConfigError;

/// One ordered keyword rule for the intent matcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentRuleConfig {
    pub topic: ResponseKey,
    /// Lowercase substrings; any one of them selects the topic
    pub keywords: Vec<String>,
}

impl IntentRuleConfig {
    pub fn new(topic: ResponseKey, keywords: &[&str]) -> Self {
        Self {
            topic,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Answers for the FAQ topics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaqContent {
    pub services: String,
    pub pricing: String,
    pub turnaround: String,
    pub portfolio: String,
    pub revisions: String,
    pub files: String,
    pub greeting: String,
    /// Helpful menu for unmatched input
    pub default: String,
}

impl Default for FaqContent {
    fn default() -> Self {
        Self {
            services: "I offer three main services:\n\
• **Logo Design** - Starting at $149\n\
• **YouTube Thumbnails** - Starting at $49\n\
• **Video Editing** - Starting at $299\n\n\
Each service comes with unlimited revisions and fast delivery!"
                .to_string(),
            pricing: "My pricing is transparent and competitive:\n\
• **Logo Design**: $149-$449 (2-7 days)\n\
• **YouTube Thumbnails**: $49-$799 (24h-ongoing)\n\
• **Video Editing**: $299-$1,299 (3-10 days)\n\n\
All packages include unlimited revisions and source files!"
                .to_string(),
            turnaround: "My typical delivery times:\n\
• **Logos**: 2-7 days (depending on package)\n\
• **Thumbnails**: 24 hours (single) to 2-3 days (pack)\n\
• **Video Editing**: 3-10 days (depending on complexity)\n\n\
Need it faster? I offer rush delivery for +50% fee!"
                .to_string(),
            portfolio: "I've worked with 500+ clients including:\n\
• YouTubers with 2M+ subscribers\n\
• Tech startups that raised $10M+\n\
• Fortune 500 companies\n\n\
You can view my full portfolio at /portfolio or I can send you specific examples for your industry!"
                .to_string(),
            revisions: "All my packages include revisions:\n\
• **Basic packages**: 2-5 revisions\n\
• **Standard packages**: 5+ revisions\n\
• **Premium packages**: Unlimited revisions\n\n\
I won't stop until you're 100% satisfied!"
                .to_string(),
            files: "You'll receive all the files you need:\n\
• **High-resolution** PNG, JPG files\n\
• **Vector files** (AI, SVG) for logos\n\
• **Source files** (PSD, AI) available\n\
• **Different formats** for various uses\n\n\
Everything ready for print and web!"
                .to_string(),
            greeting: "Hello! 👋 Great to meet you!\n\n\
I'm here to help you transform your brand with premium design. What brings you here today?\n\n\
• Need a professional logo?\n\
• Want high-converting thumbnails?\n\
• Looking for video editing services?\n\
• Complete branding makeover?"
                .to_string(),
            default: "I'd be happy to help! Here are some things I can assist you with:\n\n\
**Quick Actions:**\n\
• View pricing & packages\n\
• See portfolio examples\n\
• Get a custom quote\n\
• Schedule a free consultation\n\n\
**Or ask me about:**\n\
• Service details & turnaround times\n\
• Previous client results\n\
• File formats & revisions\n\
• Rush delivery options\n\n\
What would you like to know?"
                .to_string(),
        }
    }
}

/// Prompts used while capturing a lead
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureContent {
    /// Reply to a start-a-project trigger; asks for the name
    pub ask_name: String,
    /// Asks for the email; may use `{name}`
    pub ask_email: String,
    pub ask_contact: String,
    /// Asks for the service; `{options}` is the numbered service menu
    pub ask_service: String,
    /// Asks for the budget; `{options}` is the bulleted tier list
    pub ask_budget: String,
    /// Terminal message once all five fields are captured
    pub confirmation: String,

    pub retry_name: String,
    pub retry_email: String,
    pub retry_contact: String,

    pub service_menu: Vec<String>,
    pub budget_tiers: Vec<String>,
}

impl Default for CaptureContent {
    fn default() -> Self {
        Self {
            ask_name: "I'd love to help you get started! 🚀\n\n\
Let me collect a few details so I can provide you with the best recommendations and pricing.\n\n\
First, what's your name?"
                .to_string(),
            ask_email: "Nice to meet you, {name}! 👋\n\n\
What's your email address? I'll send you a free consultation guide and some portfolio examples."
                .to_string(),
            ask_contact: "Perfect! And what's your WhatsApp number? \
This way I can send you quick updates about your project."
                .to_string(),
            ask_service: "Awesome! What type of design service are you most interested in?\n\n{options}"
                .to_string(),
            ask_budget: "Great choice! What's your approximate budget for this project?\n\n{options}"
                .to_string(),
            confirmation: "Perfect! I've got all the details I need. 🎉\n\n\
I'll send you:\n\
✅ Free consultation guide\n\
✅ Relevant portfolio examples\n\
✅ Custom pricing proposal\n\n\
Expect an email within the next hour, and I'll follow up on WhatsApp!\n\n\
**Ready to get started?** Click here to schedule a free 15-minute call: \
[Schedule Call](https://calendly.com/adilgfx)"
                .to_string(),
            retry_name: "I didn't quite catch your name. What should I call you?".to_string(),
            retry_email: "Hmm, that doesn't look like an email address. \
Could you share your email (for example, name@example.com)?"
                .to_string(),
            retry_contact: "I need a number with at least 10 digits so I can reach you on WhatsApp. \
What's the best number?"
                .to_string(),
            service_menu: vec![
                "Logo Design".to_string(),
                "YouTube Thumbnails".to_string(),
                "Video Editing".to_string(),
                "Complete Branding Package".to_string(),
            ],
            budget_tiers: vec![
                "Under $500".to_string(),
                "$500 - $1,000".to_string(),
                "$1,000 - $3,000".to_string(),
                "$3,000+".to_string(),
                "Not sure yet".to_string(),
            ],
        }
    }
}

/// All chatbot copy plus the intent rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatbotContent {
    /// Seeded as the first transcript entry of every conversation
    pub welcome: String,
    pub faq: FaqContent,
    pub capture: CaptureContent,
    /// Suggested opening utterances shown as chips
    pub quick_replies: Vec<String>,
    /// Evaluated in order, first match wins
    pub intent_rules: Vec<IntentRuleConfig>,
}

impl Default for ChatbotContent {
    fn default() -> Self {
        Self {
            welcome: "Hi! I'm Adi's Creative Assistant 🎨\n\n\
I'm here to help you with:\n\
• Service information & pricing\n\
• Portfolio examples\n\
• Project quotes\n\
• Scheduling consultations\n\n\
What can I help you with today?"
                .to_string(),
            faq: FaqContent::default(),
            capture: CaptureContent::default(),
            quick_replies: vec![
                "What services do you offer?".to_string(),
                "How much does a logo cost?".to_string(),
                "What's your turnaround time?".to_string(),
                "Can I see your portfolio?".to_string(),
            ],
            intent_rules: default_intent_rules(),
        }
    }
}

/// Keyword rules in priority order.
///
/// `StartProject` sits before `Greeting` because "hire" contains "hi".
pub fn default_intent_rules() -> Vec<IntentRuleConfig> {
    vec![
        IntentRuleConfig::new(ResponseKey::Services, &["service", "what do you"]),
        IntentRuleConfig::new(ResponseKey::Pricing, &["price", "cost", "how much"]),
        IntentRuleConfig::new(ResponseKey::Turnaround, &["time", "delivery", "turnaround"]),
        IntentRuleConfig::new(ResponseKey::Portfolio, &["portfolio", "work", "example"]),
        IntentRuleConfig::new(ResponseKey::Revisions, &["revision", "change", "edit"]),
        IntentRuleConfig::new(ResponseKey::Files, &["file", "format", "download"]),
        IntentRuleConfig::new(ResponseKey::StartProject, &["contact", "hire", "start"]),
        IntentRuleConfig::new(ResponseKey::Greeting, &["hello", "hi", "hey"]),
    ]
}

impl ChatbotContent {
    /// FAQ text for a topic. `StartProject` maps to the first capture prompt.
    pub fn faq_text(&self, key: ResponseKey) -> &str {
        match key {
            ResponseKey::Services => &self.faq.services,
            ResponseKey::Pricing => &self.faq.pricing,
            ResponseKey::Turnaround => &self.faq.turnaround,
            ResponseKey::Portfolio => &self.faq.portfolio,
            ResponseKey::Revisions => &self.faq.revisions,
            ResponseKey::Files => &self.faq.files,
            ResponseKey::StartProject => &self.capture.ask_name,
            ResponseKey::Greeting => &self.faq.greeting,
            ResponseKey::Default => &self.faq.default,
        }
    }

    /// Parse content from YAML, keeping built-in values for missing keys
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let content: ChatbotContent =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        content.validate()?;
        Ok(content)
    }

    /// Load content from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;
        let content = Self::from_yaml_str(&yaml)?;
        tracing::info!(
            path = %path.display(),
            rules = content.intent_rules.len(),
            "Loaded chatbot content"
        );
        Ok(content)
    }

    /// Load from `path` if given, otherwise use the built-in content
    pub fn load_or_default(path: Option<&str>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Validate content
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.welcome.trim().is_empty() {
            return Err(ConfigError::MissingField("welcome".to_string()));
        }

        if self.capture.service_menu.is_empty() {
            return Err(ConfigError::MissingField("capture.service_menu".to_string()));
        }

        if self.capture.budget_tiers.is_empty() {
            return Err(ConfigError::MissingField("capture.budget_tiers".to_string()));
        }

        for (i, rule) in self.intent_rules.iter().enumerate() {
            if rule.keywords.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("intent_rules[{}]", i),
                    message: format!("Rule for '{}' has no keywords", rule.topic),
                });
            }
            if let Some(bad) = rule
                .keywords
                .iter()
                .find(|k| k.trim().is_empty() || k.to_lowercase() != **k)
            {
                return Err(ConfigError::InvalidValue {
                    field: format!("intent_rules[{}].keywords", i),
                    message: format!("Keyword '{}' must be non-empty lowercase", bad),
                });
            }
            if rule.topic == ResponseKey::Default {
                return Err(ConfigError::InvalidValue {
                    field: format!("intent_rules[{}].topic", i),
                    message: "The default topic cannot have keywords".to_string(),
                });
            }
        }

        Ok(())
    }
}
