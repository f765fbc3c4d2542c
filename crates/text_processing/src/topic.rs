//! Keyword topic classification

use wofa_config::TopicsConfig;
use wofa_core::Topic;

/// Maps text to a conversation topic
///
/// Topics are tried in `Topic::CLASSIFICATION_ORDER`; the first with a
/// keyword occurring as a substring of the lower-cased text wins.
#[derive(Debug, Clone)]
pub struct TopicClassifier {
    tables: Vec<(Topic, Vec<String>)>,
}

impl TopicClassifier {
    pub fn new(topics: &TopicsConfig) -> Self {
        let tables = Topic::CLASSIFICATION_ORDER
            .iter()
            .map(|&topic| {
                let keywords = topics
                    .keywords(topic)
                    .iter()
                    .map(|k| k.to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect();
                (topic, keywords)
            })
            .collect();
        Self { tables }
    }

    /// Total: falls back to `Topic::Default`
    pub fn classify(&self, text: &str) -> Topic {
        let lower = text.to_lowercase();
        self.tables
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k.as_str())))
            .map(|(topic, _)| *topic)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wofa_config::TopicDefinition;

    fn classifier() -> TopicClassifier {
        let mut config = TopicsConfig::default();
        let tables: [(Topic, &[&str]); 4] = [
            (Topic::Products, &["insurance", "policy"]),
            (Topic::Payment, &["pay", "mobile money"]),
            (Topic::Claims, &["claim"]),
            (Topic::Policy, &["policy", "beneficiary"]),
        ];
        for (topic, keywords) in tables {
            config.topics.insert(
                topic,
                TopicDefinition {
                    keywords: keywords.iter().map(|k| k.to_string()).collect(),
                    ..Default::default()
                },
            );
        }
        TopicClassifier::new(&config)
    }

    #[test]
    fn test_first_topic_in_order_wins() {
        let c = classifier();
        // "policy" is a products keyword as well; products comes first
        assert_eq!(c.classify("Update my POLICY"), Topic::Products);
        assert_eq!(c.classify("How do I pay for a claim?"), Topic::Payment);
        assert_eq!(c.classify("Claim status"), Topic::Claims);
        assert_eq!(c.classify("change beneficiary"), Topic::Policy);
    }

    #[test]
    fn test_default_when_no_keyword() {
        let c = classifier();
        assert_eq!(c.classify("hello there"), Topic::Default);
        assert_eq!(c.classify(""), Topic::Default);
    }

    #[test]
    fn test_substring_match() {
        // "pay" inside "repayment"
        assert_eq!(classifier().classify("repayment schedule"), Topic::Payment);
    }
}
