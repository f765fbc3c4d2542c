//! Domain data
//!
//! A domain is a directory holding these files:
//! 1. responses.yaml - knowledge base entries and the greeting
//! 2. aliases.yaml - curated alias table (optional)
//! 3. topics.yaml - topic keywords, suggestion pools and relations
//! 4. quick_replies.yaml - reply buttons keyed on reply text (optional)
//!
//! `.yml` and `.json` files with the same stem are accepted. The shipped
//! SIC Life domain is also compiled in, see [`DomainConfig::builtin`].

mod aliases;
mod quick_replies;
mod responses;
mod topics;

pub use aliases::AliasesConfig;
pub use quick_replies::{QuickRepliesConfig, QuickReplyRule};
pub use responses::ResponsesConfig;
pub use topics::{TopicDefinition, TopicsConfig};

use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use wofa_core::{KnowledgeSource, ResponseEntry};

use crate::ConfigError;

const BUILTIN_DOMAIN_ID: &str = "sic_life";
const BUILTIN_RESPONSES: &str = include_str!("../../../../config/domains/sic_life/responses.yaml");
const BUILTIN_ALIASES: &str = include_str!("../../../../config/domains/sic_life/aliases.yaml");
const BUILTIN_TOPICS: &str = include_str!("../../../../config/domains/sic_life/topics.yaml");
const BUILTIN_QUICK_REPLIES: &str =
    include_str!("../../../../config/domains/sic_life/quick_replies.yaml");

/// Complete domain data, validated
#[derive(Debug, Clone)]
pub struct DomainConfig {
    pub domain_id: String,
    pub responses: ResponsesConfig,
    pub aliases: AliasesConfig,
    pub topics: TopicsConfig,
    pub quick_replies: QuickRepliesConfig,
}

impl DomainConfig {
    /// Load a domain directory
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(ConfigError::FileNotFound(dir.display().to_string()));
        }

        let domain_id = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| BUILTIN_DOMAIN_ID.to_string());

        let responses_path = find_data_file(dir, "responses").ok_or_else(|| {
            ConfigError::FileNotFound(dir.join("responses.yaml").display().to_string())
        })?;
        let topics_path = find_data_file(dir, "topics").ok_or_else(|| {
            ConfigError::FileNotFound(dir.join("topics.yaml").display().to_string())
        })?;

        let responses: ResponsesConfig = read_data_file(&responses_path)?;
        let topics: TopicsConfig = read_data_file(&topics_path)?;
        let aliases: AliasesConfig = match find_data_file(dir, "aliases") {
            Some(path) => read_data_file(&path)?,
            None => {
                tracing::debug!(dir = %dir.display(), "No alias table, using key variants only");
                AliasesConfig::default()
            }
        };
        let quick_replies: QuickRepliesConfig = match find_data_file(dir, "quick_replies") {
            Some(path) => read_data_file(&path)?,
            None => {
                tracing::debug!(dir = %dir.display(), "No quick reply table");
                QuickRepliesConfig::default()
            }
        };

        let domain = Self {
            domain_id,
            responses,
            aliases,
            topics,
            quick_replies,
        };
        domain.validate()?;

        tracing::info!(
            domain = %domain.domain_id,
            responses = domain.responses.responses.len(),
            alias_keys = domain.aliases.aliases.len(),
            "Loaded domain data"
        );

        Ok(domain)
    }

    /// Load a domain directory, using the compiled-in domain only when the
    /// directory or one of its required files does not exist
    ///
    /// Data that exists but fails to parse or validate is an error.
    pub fn load_or_builtin(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        match Self::load(dir) {
            Err(ConfigError::FileNotFound(missing)) => {
                tracing::warn!(
                    dir = %dir.display(),
                    missing = %missing,
                    "Domain data not found, using bundled data"
                );
                Self::builtin()
            }
            other => other,
        }
    }

    /// The SIC Life domain compiled into the binary
    pub fn builtin() -> Result<Self, ConfigError> {
        let domain = Self {
            domain_id: BUILTIN_DOMAIN_ID.to_string(),
            responses: parse_yaml("responses.yaml", BUILTIN_RESPONSES)?,
            aliases: parse_yaml("aliases.yaml", BUILTIN_ALIASES)?,
            topics: parse_yaml("topics.yaml", BUILTIN_TOPICS)?,
            quick_replies: parse_yaml("quick_replies.yaml", BUILTIN_QUICK_REPLIES)?,
        };
        domain.validate()?;
        Ok(domain)
    }

    /// Cross-file checks
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.responses.validate()?;
        self.topics.validate()?;
        self.quick_replies.validate()?;

        let keys = self.responses.keys();
        for key in self.aliases.unknown_keys(&keys) {
            tracing::warn!(key, "Alias table refers to an unknown response key");
        }

        Ok(())
    }

    pub fn welcome(&self) -> &str {
        &self.responses.welcome
    }
}

impl KnowledgeSource for DomainConfig {
    fn entries(&self) -> Vec<ResponseEntry> {
        self.responses.responses.clone()
    }

    fn aliases(&self) -> HashMap<String, Vec<String>> {
        self.aliases.aliases.clone()
    }
}

fn find_data_file(dir: &Path, stem: &str) -> Option<PathBuf> {
    ["yaml", "yml", "json"]
        .iter()
        .map(|ext| dir.join(format!("{}.{}", stem, ext)))
        .find(|p| p.is_file())
}

fn read_data_file<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::FileNotFound(format!("{}: {}", path.display(), e)))?;

    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        serde_json::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))
    } else {
        parse_yaml(&path.display().to_string(), &content)
    }
}

fn parse_yaml<T: DeserializeOwned>(name: &str, content: &str) -> Result<T, ConfigError> {
    serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError(format!("{}: {}", name, e)))
}
