//! Keyword Intent Matching
//!
//! Maps a visitor utterance to an FAQ topic using ordered substring rules.
//! The utterance is normalized (lower-cased, trimmed) and each rule is tried
//! in priority order; the first rule with a keyword contained in the
//! utterance wins. Matching is plain substring containment, so "hire"
//! matches the greeting keyword "hi" as well; rule order resolves this.
//!
//! # Example
//!
//! ```
//! use concierge_core::ResponseKey;
//! use concierge_text_processing::intent::IntentMatcher;
//!
//! let matcher = IntentMatcher::new();
//! assert_eq!(matcher.classify("I want to hire you"), ResponseKey::StartProject);
//! assert_eq!(matcher.classify("asdf"), ResponseKey::Default);
//! ```

use concierge_config::{default_intent_rules, IntentRuleConfig};
use concierge_core::ResponseKey;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TextProcessingError};
use crate::normalize::normalize;

/// A topic and the lowercase keywords that select it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentRule {
    pub topic: ResponseKey,
    pub keywords: Vec<String>,
}

impl IntentRule {
    /// Create a rule; keywords are normalized
    pub fn new<S: AsRef<str>>(topic: ResponseKey, keywords: &[S]) -> Result<Self> {
        let keywords: Vec<String> = keywords.iter().map(|k| normalize(k.as_ref())).collect();

        if topic == ResponseKey::Default {
            return Err(TextProcessingError::InvalidRule {
                topic: topic.to_string(),
                message: "default is the fallback and cannot be matched".to_string(),
            });
        }
        if keywords.is_empty() || keywords.iter().any(|k| k.is_empty()) {
            return Err(TextProcessingError::InvalidRule {
                topic: topic.to_string(),
                message: "keywords must be non-empty".to_string(),
            });
        }

        Ok(Self { topic, keywords })
    }

    /// First keyword contained in an already-normalized utterance
    fn matching_keyword(&self, normalized: &str) -> Option<&str> {
        self.keywords
            .iter()
            .find(|k| normalized.contains(k.as_str()))
            .map(|k| k.as_str())
    }
}

impl TryFrom<&IntentRuleConfig> for IntentRule {
    type Error = TextProcessingError;

    fn try_from(config: &IntentRuleConfig) -> Result<Self> {
        IntentRule::new(config.topic, config.keywords.as_slice())
    }
}

/// Result of a successful match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentMatch {
    pub topic: ResponseKey,
    /// The keyword that triggered the rule
    pub keyword: String,
    /// Position of the rule in priority order
    pub rule_index: usize,
}

/// Ordered keyword matcher
#[derive(Debug, Clone)]
pub struct IntentMatcher {
    rules: Vec<IntentRule>,
}

impl IntentMatcher {
    /// Matcher with the built-in rule table
    pub fn new() -> Self {
        let rules = default_intent_rules()
            .iter()
            .filter_map(|r| IntentRule::try_from(r).ok())
            .collect();
        Self { rules }
    }

    /// Matcher with explicit rules, evaluated in the given order
    pub fn with_rules(rules: Vec<IntentRule>) -> Self {
        Self { rules }
    }

    /// Build from configured rules, rejecting malformed entries
    pub fn from_config(rules: &[IntentRuleConfig]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(IntentRule::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    /// Find the first matching rule, if any
    pub fn detect(&self, utterance: &str) -> Option<IntentMatch> {
        let normalized = normalize(utterance);
        if normalized.is_empty() {
            return None;
        }

        let found = self.rules.iter().enumerate().find_map(|(i, rule)| {
            rule.matching_keyword(&normalized).map(|keyword| IntentMatch {
                topic: rule.topic,
                keyword: keyword.to_string(),
                rule_index: i,
            })
        });

        match &found {
            Some(m) => tracing::debug!(
                topic = %m.topic,
                keyword = %m.keyword,
                rule = m.rule_index,
                "Intent matched"
            ),
            None => tracing::debug!("No intent rule matched"),
        }

        found
    }

    /// Topic for the utterance, or `None` if no rule matched
    pub fn match_utterance(&self, utterance: &str) -> Option<ResponseKey> {
        self.detect(utterance).map(|m| m.topic)
    }

    /// Topic for the utterance, falling back to the default menu
    pub fn classify(&self, utterance: &str) -> ResponseKey {
        self.match_utterance(utterance)
            .unwrap_or(ResponseKey::Default)
    }
}

impl Default for IntentMatcher {
    fn default() -> Self {
        Self::new()
    }
}
