//! FAQ topics an utterance can resolve to

use serde::{Deserialize, Serialize};

/// Key of a canned response
///
/// `StartProject` is special: matching it switches the conversation into
/// lead capture instead of rendering an FAQ answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKey {
    Services,
    Pricing,
    Turnaround,
    Portfolio,
    Revisions,
    Files,
    StartProject,
    Greeting,
    /// Catch-all helpful menu
    Default,
}

impl ResponseKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseKey::Services => "services",
            ResponseKey::Pricing => "pricing",
            ResponseKey::Turnaround => "turnaround",
            ResponseKey::Portfolio => "portfolio",
            ResponseKey::Revisions => "revisions",
            ResponseKey::Files => "files",
            ResponseKey::StartProject => "start_project",
            ResponseKey::Greeting => "greeting",
            ResponseKey::Default => "default",
        }
    }

    /// Whether this topic activates lead capture
    pub fn activates_capture(&self) -> bool {
        matches!(self, ResponseKey::StartProject)
    }
}

impl std::fmt::Display for ResponseKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_start_project_activates_capture() {
        assert!(ResponseKey::StartProject.activates_capture());
        assert!(!ResponseKey::Greeting.activates_capture());
        assert!(!ResponseKey::Default.activates_capture());
    }

    #[test]
    fn test_serde_matches_display() {
        let key: ResponseKey = serde_json::from_str("\"start_project\"").unwrap();
        assert_eq!(key, ResponseKey::StartProject);
        assert_eq!(key.to_string(), "start_project");
    }
}
