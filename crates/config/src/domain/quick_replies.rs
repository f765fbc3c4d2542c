//! Quick reply table
//!
//! Short reply buttons chosen from the text of the assistant's last reply,
//! loaded from quick_replies.yaml. Rules are tried in order.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickReplyRule {
    /// Lowercase phrase searched for in the reply text
    pub trigger: String,
    pub replies: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuickRepliesConfig {
    #[serde(default)]
    pub rules: Vec<QuickReplyRule>,
    #[serde(default)]
    pub default: Vec<String>,
}

impl QuickRepliesConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for rule in &self.rules {
            if rule.trigger.trim().is_empty() {
                return Err(ConfigError::Domain("quick reply rule with empty trigger".into()));
            }
            if rule.trigger != rule.trigger.to_lowercase() {
                return Err(ConfigError::InvalidValue {
                    field: "quick_replies.rules.trigger".into(),
                    message: format!("trigger '{}' must be lowercase", rule.trigger),
                });
            }
            if rule.replies.is_empty() {
                return Err(ConfigError::Domain(format!(
                    "quick reply rule '{}' has no replies",
                    rule.trigger
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> QuickRepliesConfig {
        serde_yaml::from_str(
            r#"
rules:
  - trigger: "claim"
    replies: ["Start a new claim"]
  - trigger: "payment"
    replies: ["Pay with card"]
default: ["Contact support"]
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_uppercase_trigger_rejected() {
        let mut table = table();
        table.rules[0].trigger = "Claim".into();
        assert!(matches!(table.validate(), Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_empty_replies_rejected() {
        let mut table = table();
        table.rules[1].replies.clear();
        assert!(matches!(table.validate(), Err(ConfigError::Domain(_))));
    }
}
