//! Per-session conversation memory
//!
//! Both states are mutated only when a turn commits, and cleared by an
//! explicit reset.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use wofa_core::{FallbackTier, Topic};

/// A reply as it was shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedReply {
    pub text: String,
    /// Response key the reply was formatted from
    pub key: String,
    /// Fallback tier that produced the reply, `None` for matched answers
    pub tier: Option<FallbackTier>,
}

impl RecordedReply {
    pub fn matched(text: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            key: key.into(),
            tier: None,
        }
    }

    pub fn fallback(text: impl Into<String>, tier: FallbackTier) -> Self {
        Self {
            text: text.into(),
            key: tier.response_key().to_string(),
            tier: Some(tier),
        }
    }
}

/// Bounded reply history plus the last accepted key
#[derive(Debug, Clone)]
pub struct ConversationState {
    recent_replies: VecDeque<RecordedReply>,
    limit: usize,
    last_matched_key: Option<String>,
}

impl ConversationState {
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            recent_replies: VecDeque::with_capacity(limit),
            limit,
            last_matched_key: None,
        }
    }

    /// Push a reply, evicting the oldest beyond the bound
    pub fn commit(&mut self, reply: RecordedReply, matched_key: Option<String>) {
        self.recent_replies.push_back(reply);
        while self.recent_replies.len() > self.limit {
            self.recent_replies.pop_front();
        }
        if matched_key.is_some() {
            self.last_matched_key = matched_key;
        }
    }

    /// Oldest first
    pub fn recent_replies(&self) -> impl Iterator<Item = &RecordedReply> {
        self.recent_replies.iter()
    }

    /// Most recent committed reply
    pub fn last_reply(&self) -> Option<&RecordedReply> {
        self.recent_replies.back()
    }

    /// Whether `text` produced by `tier` is still in the history
    pub fn has_shown(&self, tier: FallbackTier, text: &str) -> bool {
        self.recent_replies
            .iter()
            .any(|r| r.tier == Some(tier) && r.text == text)
    }

    pub fn last_matched_key(&self) -> Option<&str> {
        self.last_matched_key.as_deref()
    }

    pub fn len(&self) -> usize {
        self.recent_replies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recent_replies.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn clear(&mut self) {
        self.recent_replies.clear();
        self.last_matched_key = None;
    }
}

/// Active topic and the chips shown last
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionState {
    pub active_topic: Topic,
    pub last_suggestions: Vec<String>,
}

impl SuggestionState {
    pub fn update(&mut self, topic: Topic, suggestions: Vec<String>) {
        self.active_topic = topic;
        self.last_suggestions = suggestions;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_bounded() {
        let mut state = ConversationState::new(5);
        for i in 0..8 {
            state.commit(RecordedReply::matched(format!("reply {}", i), "claims_process"), None);
        }
        assert_eq!(state.len(), 5);
        assert_eq!(state.recent_replies().next().unwrap().text, "reply 3");
    }

    #[test]
    fn test_last_matched_key_kept_on_fallback() {
        let mut state = ConversationState::new(5);
        state.commit(
            RecordedReply::matched("claims", "claims_process"),
            Some("claims_process".to_string()),
        );
        state.commit(RecordedReply::fallback("sorry", FallbackTier::FirstMiss), None);
        assert_eq!(state.last_matched_key(), Some("claims_process"));
    }

    #[test]
    fn test_has_shown_checks_tier_and_text() {
        let mut state = ConversationState::new(5);
        state.commit(RecordedReply::matched("Sorry?", "claims_process"), None);
        assert!(!state.has_shown(FallbackTier::FirstMiss, "Sorry?"));

        state.commit(RecordedReply::fallback("Sorry?", FallbackTier::FirstMiss), None);
        assert!(state.has_shown(FallbackTier::FirstMiss, "Sorry?"));
        assert!(!state.has_shown(FallbackTier::FirstMiss, "Sorry!"));
    }

    #[test]
    fn test_clear() {
        let mut state = ConversationState::new(5);
        state.commit(RecordedReply::matched("a", "k"), Some("k".to_string()));
        state.clear();
        assert!(state.is_empty());
        assert!(state.last_matched_key().is_none());

        let mut suggestions = SuggestionState::default();
        suggestions.update(Topic::Claims, vec!["x".to_string()]);
        suggestions.clear();
        assert_eq!(suggestions.active_topic, Topic::Default);
        assert!(suggestions.last_suggestions.is_empty());
    }
}
