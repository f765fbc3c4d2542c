//! Canned response configuration
//!
//! Loaded from responses.yaml: the knowledge base entries plus the session
//! greeting.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use wofa_core::{FallbackTier, ResponseEntry};

use crate::constants::conversation;
use crate::ConfigError;

/// Responses configuration loaded from responses.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsesConfig {
    /// Data format version
    #[serde(default = "default_version")]
    pub version: String,
    /// Greeting shown when a session opens
    #[serde(default = "default_welcome")]
    pub welcome: String,
    /// Response entries, in declaration order
    #[serde(default)]
    pub responses: Vec<ResponseEntry>,
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_welcome() -> String {
    conversation::WELCOME_MESSAGE.to_string()
}

impl Default for ResponsesConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            welcome: default_welcome(),
            responses: Vec::new(),
        }
    }
}

impl ResponsesConfig {
    /// Get a response by key
    pub fn get(&self, key: &str) -> Option<&ResponseEntry> {
        self.responses.iter().find(|r| r.key == key)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.responses.iter().map(|r| r.key.as_str()).collect()
    }

    /// Structural checks that do not depend on other domain files
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.responses.is_empty() {
            return Err(ConfigError::Domain("responses: no entries".to_string()));
        }

        let mut seen = HashSet::new();
        for (idx, entry) in self.responses.iter().enumerate() {
            if entry.key.trim().is_empty() {
                return Err(ConfigError::Domain(format!(
                    "responses[{}]: key must not be empty",
                    idx
                )));
            }
            if entry.answer_template.trim().is_empty() {
                return Err(ConfigError::Domain(format!(
                    "responses.{}: answer must not be empty",
                    entry.key
                )));
            }
            if !seen.insert(entry.key.as_str()) {
                return Err(ConfigError::Domain(format!(
                    "responses: duplicate key '{}'",
                    entry.key
                )));
            }
        }

        for key in FallbackTier::required_keys() {
            if !seen.contains(key) {
                return Err(ConfigError::Domain(format!(
                    "responses: missing required fallback entry '{}'",
                    key
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fallback_entries() -> Vec<ResponseEntry> {
        FallbackTier::required_keys()
            .iter()
            .map(|k| ResponseEntry::new(*k, "Sorry?"))
            .collect()
    }

    #[test]
    fn test_parse_with_answer_field() {
        let yaml = r#"
responses:
  - key: claims_process
    answer: "File a claim."
    follow_up: ["Which documents?"]
"#;
        let config: ResponsesConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.welcome, conversation::WELCOME_MESSAGE);
        let entry = config.get("claims_process").unwrap();
        assert_eq!(entry.answer_template, "File a claim.");
        assert!(entry.has_follow_up());
    }

    #[test]
    fn test_missing_fallback_entry_rejected() {
        let config = ResponsesConfig {
            responses: vec![ResponseEntry::new("fallback", "Sorry?")],
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("general_help"));
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut responses = fallback_entries();
        responses.push(ResponseEntry::new("fallback", "Again"));
        let config = ResponsesConfig {
            responses,
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().to_string().contains("duplicate"));
    }

    #[test]
    fn test_valid_config() {
        let config = ResponsesConfig {
            responses: fallback_entries(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.keys(), vec!["fallback", "general_help", "unclear_intent"]);
    }
}
