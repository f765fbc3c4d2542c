//! Error types shared across the workspace

use thiserror::Error;

/// Core error type
///
/// Crate-level errors (`ConfigError`, `IndexError`, `AgentError`) convert
/// into this type at crate boundaries.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Knowledge load error: {0}")]
    KnowledgeLoad(String),

    #[error("Invalid response entry '{key}': {reason}")]
    InvalidEntry { key: String, reason: String },

    #[error("Duplicate response key: {0}")]
    DuplicateKey(String),

    #[error("Missing required response entry: {0}")]
    MissingEntry(String),

    #[error("Topic table error: {0}")]
    TopicTable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
