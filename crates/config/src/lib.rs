//! Configuration management for the scripted assistant
//!
//! Supports loading configuration from:
//! - YAML files (`config/default.yaml`, `config/{env}.yaml`)
//! - Environment variables (WOFA_ prefix, `__` separator)
//!
//! # Domain Configuration
//!
//! Knowledge data lives in config/domains/{domain}/:
//! - responses.yaml - Canned responses (answer, documents, contacts, follow-ups)
//! - aliases.yaml - Curated phrasings per response key
//! - topics.yaml - Topic keywords, suggestion pools and topic relations
//! - quick_replies.yaml - Reply buttons chosen from the last reply's text
//!
//! JSON files with the same stem are accepted as well.

pub mod constants;
pub mod domain;
pub mod settings;

pub use domain::{
    AliasesConfig, DomainConfig, QuickRepliesConfig, QuickReplyRule, ResponsesConfig,
    TopicDefinition, TopicsConfig,
};
pub use settings::{
    load_settings, load_settings_from, EngineConfig, MatcherConfig, ObservabilityConfig, PacingConfig,
    RuntimeEnvironment, SessionsConfig, Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Invalid domain data: {0}")]
    Domain(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<ConfigError> for wofa_core::Error {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Domain(msg) => wofa_core::Error::KnowledgeLoad(msg),
            other => wofa_core::Error::Config(other.to_string()),
        }
    }
}
