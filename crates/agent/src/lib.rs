//! Scripted conversation agent
//!
//! Features:
//! - Turn orchestration with thinking/typing delays that a newer message
//!   can cancel
//! - Response formatting with hedge prefix, documents, contacts and
//!   follow-ups
//! - Three-tier fallback escalation over a bounded reply history
//! - Topic-aware suggestion rotation with an injectable random source
//! - Quick reply buttons picked from the latest reply's text
//! - Per-session state behind a session manager with idle expiry

pub mod agent;
pub mod conversation;
pub mod fallback;
pub mod formatter;
pub mod metrics;
pub mod pacing;
pub mod session;
pub mod suggestions;
pub mod traits;

pub use agent::{AgentReply, ChatEngine, TurnDraft, TurnOutcome};
pub use conversation::{ConversationState, RecordedReply, SuggestionState};
pub use fallback::FallbackTracker;
pub use formatter::ResponseFormatter;
pub use pacing::{Pacer, SuggestionBasis, TurnTicket};
pub use session::{ChatSession, SessionManager};
pub use suggestions::{
    FixedSequence, QuickReplies, RandomSource, SeededRandom, SuggestionRotator, ThreadRandom,
};
pub use traits::ChatAgent;

use thiserror::Error;
use wofa_config::ConfigError;
use wofa_text_processing::IndexError;

/// Agent errors
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Knowledge index error: {0}")]
    Index(#[from] IndexError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required response entry: {0}")]
    MissingEntry(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Max sessions reached ({0})")]
    SessionLimit(usize),
}

impl From<ConfigError> for AgentError {
    fn from(err: ConfigError) -> Self {
        AgentError::Config(err.to_string())
    }
}

impl From<AgentError> for wofa_core::Error {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::Index(e) => e.into(),
            AgentError::Config(msg) => wofa_core::Error::Config(msg),
            AgentError::MissingEntry(key) => wofa_core::Error::MissingEntry(key),
            AgentError::Session(msg) => wofa_core::Error::Session(msg),
            other @ AgentError::SessionLimit(_) => wofa_core::Error::Session(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_core_error() {
        let core: wofa_core::Error = AgentError::Index(IndexError::DuplicateKey("faq".into())).into();
        assert!(matches!(core, wofa_core::Error::DuplicateKey(k) if k == "faq"));

        let core: wofa_core::Error = AgentError::MissingEntry("fallback".into()).into();
        assert!(matches!(core, wofa_core::Error::MissingEntry(k) if k == "fallback"));

        let core: wofa_core::Error = AgentError::SessionLimit(2).into();
        assert!(matches!(core, wofa_core::Error::Session(msg) if msg.contains("(2)")));

        let agent: AgentError = ConfigError::MissingField("topics".into()).into();
        let core: wofa_core::Error = agent.into();
        assert!(matches!(core, wofa_core::Error::Config(msg) if msg.contains("topics")));
    }
}
