//! Centralized constants for the assistant
//!
//! Single source of truth for default thresholds and timings. Settings
//! defaults and the engine both read from here.

/// Match acceptance and hedging
pub mod confidence {
    /// A match is accepted only above this confidence
    pub const ACCEPT_THRESHOLD: f32 = 0.4;

    /// Accepted matches below this confidence get a hedge prefix
    pub const HEDGE_THRESHOLD: f32 = 0.7;

    pub const HEDGE_PREFIX: &str = "I think I understand your question. ";
}

/// Fuzzy matcher tuning
pub mod matcher {
    pub const SEARCH_TEXT_WEIGHT: f32 = 0.7;
    pub const ALIASES_WEIGHT: f32 = 0.2;
    pub const CATEGORY_WEIGHT: f32 = 0.1;

    /// Query tokens shorter than this are ignored
    pub const MIN_TOKEN_LENGTH: usize = 2;

    /// Characters of the answer folded into an entry's search text
    pub const ANSWER_PREFIX_CHARS: usize = 150;

    /// Function words dropped from queries before scoring
    pub const STOP_WORDS: &[&str] = &[
        "what", "how", "when", "where", "why", "who", "the", "and", "for", "that", "this", "is",
        "are", "do", "does", "can", "you", "your", "my", "me", "to", "of", "in", "on", "it", "an",
        "or",
    ];
}

/// Conversation memory
pub mod conversation {
    /// Formatted replies kept for fallback escalation
    pub const HISTORY_LIMIT: usize = 5;

    /// Chips shown after each reply
    pub const SUGGESTION_COUNT: usize = 5;

    pub const BOT_NAME: &str = "Wofa Ahoto";

    /// Greeting used when the domain data does not provide one
    pub const WELCOME_MESSAGE: &str = "Hello! I'm Wofa Ahoto, your SIC Life insurance assistant. How can I help you today?\n\nI can help you with:\n• Insurance quotes\n• Claims processing\n• Policy information\n• Premium payments\n• General inquiries";
}

/// Artificial latency, in milliseconds
pub mod pacing {
    pub const THINKING_MIN_MS: u64 = 1000;
    pub const THINKING_MAX_MS: u64 = 2000;
    pub const TYPING_MIN_MS: u64 = 1000;
    pub const TYPING_MAX_MS: u64 = 3000;
    pub const TYPING_CHARS_PER_MINUTE: u64 = 300;
    pub const REVEAL_AFTER_REPLY_MS: u64 = 500;
    pub const REVEAL_AFTER_CHIP_MS: u64 = 300;
}

/// Session limits
pub mod sessions {
    pub const MAX_SESSIONS: usize = 1000;
    pub const IDLE_TIMEOUT_SECS: u64 = 3600;
}
