//! Agent trait for abstraction and testability
//!
//! Front ends (the console, a future HTTP layer, tests) drive a
//! conversation through `ChatAgent` instead of the concrete session type.

use async_trait::async_trait;

use crate::agent::{AgentReply, TurnOutcome};
use crate::pacing::SuggestionBasis;
use crate::session::ChatSession;
use crate::AgentError;

#[async_trait]
pub trait ChatAgent: Send + Sync {
    /// Process one user message
    async fn process(&self, input: &str) -> Result<TurnOutcome, AgentError>;

    /// Suggestions after a reply or a chip click; `None` when superseded
    async fn suggestions_after(&self, basis: SuggestionBasis) -> Option<Vec<String>>;

    /// Greeting plus the opening suggestion list
    fn greet(&self) -> (AgentReply, Vec<String>);

    /// Reply buttons for the latest reply
    fn quick_replies(&self) -> Vec<String>;

    /// Forget the conversation
    fn reset(&self);

    fn name(&self) -> &str;
}

#[async_trait]
impl ChatAgent for ChatSession {
    async fn process(&self, input: &str) -> Result<TurnOutcome, AgentError> {
        self.respond(input).await
    }

    async fn suggestions_after(&self, basis: SuggestionBasis) -> Option<Vec<String>> {
        self.refresh_suggestions(basis).await
    }

    fn greet(&self) -> (AgentReply, Vec<String>) {
        (self.welcome(), self.initial_suggestions())
    }

    fn quick_replies(&self) -> Vec<String> {
        ChatSession::quick_replies(self)
    }

    fn reset(&self) {
        ChatSession::reset(self)
    }

    fn name(&self) -> &str {
        wofa_config::constants::conversation::BOT_NAME
    }
}
