//! Topic tables
//!
//! Keyword lists for classification, suggestion pools and the topic
//! relation graph, loaded from topics.yaml.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use wofa_core::Topic;

use crate::ConfigError;

/// Minimum and maximum number of related topics per topic
const RELATED_MIN: usize = 2;
const RELATED_MAX: usize = 3;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicsConfig {
    #[serde(default)]
    pub topics: HashMap<Topic, TopicDefinition>,
}

/// Single topic definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicDefinition {
    /// Lower-case substrings that select this topic
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Suggestion pool
    #[serde(default)]
    pub suggestions: Vec<String>,
    /// Topics contributing one suggestion each
    #[serde(default)]
    pub related: Vec<Topic>,
}

impl TopicsConfig {
    pub fn get(&self, topic: Topic) -> Option<&TopicDefinition> {
        self.topics.get(&topic)
    }

    pub fn keywords(&self, topic: Topic) -> &[String] {
        self.get(topic).map(|d| d.keywords.as_slice()).unwrap_or(&[])
    }

    pub fn suggestions(&self, topic: Topic) -> &[String] {
        self.get(topic)
            .map(|d| d.suggestions.as_slice())
            .unwrap_or(&[])
    }

    pub fn related(&self, topic: Topic) -> &[Topic] {
        self.get(topic).map(|d| d.related.as_slice()).unwrap_or(&[])
    }

    /// Every topic needs a pool and 2-3 related topics; every classifiable
    /// topic needs keywords.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for topic in Topic::ALL {
            let def = self.get(topic).ok_or_else(|| {
                ConfigError::Domain(format!("topics: missing table for '{}'", topic))
            })?;

            if def.suggestions.iter().all(|s| s.trim().is_empty()) {
                return Err(ConfigError::Domain(format!(
                    "topics.{}: suggestion pool is empty",
                    topic
                )));
            }

            if !(RELATED_MIN..=RELATED_MAX).contains(&def.related.len()) {
                return Err(ConfigError::Domain(format!(
                    "topics.{}: expected {}-{} related topics, got {}",
                    topic,
                    RELATED_MIN,
                    RELATED_MAX,
                    def.related.len()
                )));
            }

            if def.related.contains(&topic) {
                return Err(ConfigError::Domain(format!(
                    "topics.{}: a topic cannot be related to itself",
                    topic
                )));
            }

            if topic != Topic::Default && def.keywords.is_empty() {
                return Err(ConfigError::Domain(format!(
                    "topics.{}: keyword table is empty",
                    topic
                )));
            }

            if let Some(bad) = def.keywords.iter().find(|k| **k != k.to_lowercase()) {
                return Err(ConfigError::Domain(format!(
                    "topics.{}: keyword '{}' must be lower-case",
                    topic, bad
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> TopicsConfig {
        let mut topics = HashMap::new();
        for topic in Topic::ALL {
            let related: Vec<Topic> = Topic::ALL
                .iter()
                .copied()
                .filter(|t| *t != topic)
                .take(2)
                .collect();
            topics.insert(
                topic,
                TopicDefinition {
                    keywords: vec![topic.as_str().to_string()],
                    suggestions: vec![format!("About {}?", topic)],
                    related,
                },
            );
        }
        TopicsConfig { topics }
    }

    #[test]
    fn test_complete_tables_valid() {
        assert!(complete().validate().is_ok());
    }

    #[test]
    fn test_missing_topic_rejected() {
        let mut config = complete();
        config.topics.remove(&Topic::Claims);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("claims"));
    }

    #[test]
    fn test_related_count_enforced() {
        let mut config = complete();
        config.topics.get_mut(&Topic::Payment).unwrap().related = vec![Topic::Claims];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_topic_name_fails_parse() {
        let yaml = "topics:\n  weather:\n    suggestions: [\"Is it sunny?\"]\n";
        assert!(serde_yaml::from_str::<TopicsConfig>(yaml).is_err());
    }

    #[test]
    fn test_accessors() {
        let config = complete();
        assert_eq!(config.keywords(Topic::Payment), ["payment".to_string()]);
        assert_eq!(config.related(Topic::Default).len(), 2);
    }
}
