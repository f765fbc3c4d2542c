//! Conversation topics used to theme suggestion chips

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Closed set of conversation topics
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    /// Catch-all when no keyword matches
    #[default]
    Default,
    Products,
    Payment,
    Claims,
    Policy,
    Agent,
    Education,
    Investment,
}

impl Topic {
    /// Every topic, `Default` first
    pub const ALL: [Topic; 8] = [
        Topic::Default,
        Topic::Products,
        Topic::Payment,
        Topic::Claims,
        Topic::Policy,
        Topic::Agent,
        Topic::Education,
        Topic::Investment,
    ];

    /// Order in which keyword tables are tested. The first hit wins, so this
    /// order is part of the classification contract.
    pub const CLASSIFICATION_ORDER: [Topic; 7] = [
        Topic::Products,
        Topic::Payment,
        Topic::Claims,
        Topic::Policy,
        Topic::Agent,
        Topic::Education,
        Topic::Investment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Default => "default",
            Topic::Products => "products",
            Topic::Payment => "payment",
            Topic::Claims => "claims",
            Topic::Policy => "policy",
            Topic::Agent => "agent",
            Topic::Education => "education",
            Topic::Investment => "investment",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| Error::TopicTable(format!("unknown topic '{}'", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_names() {
        for topic in Topic::ALL {
            assert_eq!(topic.as_str().parse::<Topic>().unwrap(), topic);
        }
    }

    #[test]
    fn test_unknown_topic_fails_loudly() {
        assert!("weather".parse::<Topic>().is_err());
        let parsed: std::result::Result<Topic, _> = serde_yaml::from_str("weather");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_classification_order_excludes_default() {
        assert!(!Topic::CLASSIFICATION_ORDER.contains(&Topic::Default));
        assert_eq!(Topic::CLASSIFICATION_ORDER[0], Topic::Products);
        assert_eq!(Topic::CLASSIFICATION_ORDER.len() + 1, Topic::ALL.len());
    }
}
