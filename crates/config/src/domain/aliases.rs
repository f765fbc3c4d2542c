//! Curated alias table
//!
//! Alternative phrasings per response key, loaded from aliases.yaml.
//! Key-derived variants are added later by the knowledge index.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AliasesConfig {
    #[serde(default)]
    pub aliases: HashMap<String, Vec<String>>,
}

impl AliasesConfig {
    /// Curated aliases for a key, empty when none are declared
    pub fn for_key(&self, key: &str) -> &[String] {
        self.aliases.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Keys in the table that are not in `known`
    pub fn unknown_keys<'a>(&'a self, known: &[&str]) -> Vec<&'a str> {
        let mut unknown: Vec<&str> = self
            .aliases
            .keys()
            .map(String::as_str)
            .filter(|k| !known.contains(k))
            .collect();
        unknown.sort_unstable();
        unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_key() {
        let yaml = "aliases:\n  claims_process: [\"make claim\", \"file claim\"]\n";
        let config: AliasesConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.for_key("claims_process").len(), 2);
        assert!(config.for_key("payment_methods").is_empty());
    }

    #[test]
    fn test_unknown_keys() {
        let yaml = "aliases:\n  claims_process: [a]\n  ghost: [b]\n";
        let config: AliasesConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.unknown_keys(&["claims_process"]), vec!["ghost"]);
    }
}
