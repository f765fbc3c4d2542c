//! Turn evaluation
//!
//! `ChatEngine` holds everything that is read-only after startup: the
//! knowledge index, matcher, formatter, fallback outputs, topic classifier,
//! suggestion rotator and pacing. It is shared by all sessions through
//! `Arc`. Per-session state and the async turn sequence live in
//! [`crate::session`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use wofa_config::{DomainConfig, Settings, TopicsConfig};
use wofa_core::{FallbackTier, KnowledgeSource, ReplyMetadata, Topic};
use wofa_text_processing::{
    confidence, normalize, FuzzyMatcher, KnowledgeIndex, Thresholds, TopicClassifier,
};

use crate::conversation::{ConversationState, RecordedReply};
use crate::fallback::FallbackTracker;
use crate::formatter::ResponseFormatter;
use crate::pacing::Pacer;
use crate::suggestions::{QuickReplies, SuggestionRotator};
use crate::AgentError;

/// A reply ready to be shown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentReply {
    pub id: String,
    pub text: String,
    pub metadata: ReplyMetadata,
    pub timestamp: DateTime<Utc>,
}

impl AgentReply {
    pub fn new(text: impl Into<String>, metadata: ReplyMetadata) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            metadata,
            timestamp: Utc::now(),
        }
    }
}

/// Result of one user turn
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    Replied(AgentReply),
    /// A newer message or a reset arrived first; nothing was committed
    Superseded,
}

impl TurnOutcome {
    pub fn reply(&self) -> Option<&AgentReply> {
        match self {
            Self::Replied(reply) => Some(reply),
            Self::Superseded => None,
        }
    }

    pub fn into_reply(self) -> Option<AgentReply> {
        match self {
            Self::Replied(reply) => Some(reply),
            Self::Superseded => None,
        }
    }
}

/// An evaluated but not yet committed turn
#[derive(Debug, Clone)]
pub struct TurnDraft {
    pub reply: AgentReply,
    pub record: RecordedReply,
    /// Set only when the match was accepted
    pub matched_key: Option<String>,
    pub fallback_tier: Option<FallbackTier>,
}

pub struct ChatEngine {
    index: Arc<KnowledgeIndex>,
    matcher: FuzzyMatcher,
    thresholds: Thresholds,
    formatter: ResponseFormatter,
    fallback: FallbackTracker,
    classifier: TopicClassifier,
    rotator: SuggestionRotator,
    quick_replies: QuickReplies,
    pacer: Pacer,
    include_follow_up: bool,
    history_limit: usize,
    welcome: String,
}

impl ChatEngine {
    /// Build from settings and loaded domain data
    pub fn new(settings: &Settings, domain: &DomainConfig) -> Result<Self, AgentError> {
        let engine = Self::from_source(settings, domain, domain.topics.clone(), domain.welcome())?;
        Ok(engine.with_quick_replies(QuickReplies::new(domain.quick_replies.clone())))
    }

    /// Build from any knowledge source; quick replies start empty

    pub fn from_source(
        settings: &Settings,
        source: &dyn KnowledgeSource,
        topics: TopicsConfig,
        welcome: impl Into<String>,
    ) -> Result<Self, AgentError> {
        topics.validate()?;

        let index = Arc::new(KnowledgeIndex::from_source(
            source,
            settings.matcher.answer_prefix_chars,
        )?);
        let matcher = FuzzyMatcher::new(Arc::clone(&index), settings.matcher.clone());
        let thresholds = Thresholds::from(&settings.engine);
        let formatter = ResponseFormatter::new(thresholds);
        let include_follow_up = settings.engine.include_follow_up;
        let fallback = FallbackTracker::new(&index, &formatter, include_follow_up)?;
        let classifier = TopicClassifier::new(&topics);
        let rotator = SuggestionRotator::new(Arc::new(topics), settings.engine.suggestion_count);

        tracing::info!(
            entries = index.len(),
            accept_threshold = thresholds.accept,
            hedge_threshold = thresholds.hedge,
            pacing = settings.pacing.enabled,
            "Chat engine ready"
        );

        Ok(Self {
            index,
            matcher,
            thresholds,
            formatter,
            fallback,
            classifier,
            rotator,
            quick_replies: QuickReplies::default(),
            pacer: Pacer::new(settings.pacing.clone()),
            include_follow_up,
            history_limit: settings.engine.history_limit,
            welcome: welcome.into(),
        })
    }

    pub fn with_quick_replies(mut self, quick_replies: QuickReplies) -> Self {
        self.quick_replies = quick_replies;
        self
    }

    /// Normalize, match, score and format one message against `history`
    ///
    /// Pure with respect to session state; the caller commits the draft.
    pub fn evaluate(&self, history: &ConversationState, text: &str) -> TurnDraft {
        let normalized = normalize(text);
        let result = self.matcher.match_query(&normalized);
        let confidence = if result.is_match() {
            confidence(result.distance)
        } else {
            0.0
        };

        let accepted = result
            .key
            .as_deref()
            .filter(|_| self.thresholds.accepts(confidence))
            .and_then(|key| Some((key, self.index.entry(key)?, self.index.get(key)?)));

        if let Some((key, entry, indexed)) = accepted {
            let text = self.formatter.format(entry, confidence, self.include_follow_up);
            let metadata = ReplyMetadata::new(confidence, indexed.category.clone(), entry.has_follow_up())
                .with_matched_key(key);

            tracing::debug!(key, confidence, "Accepted match");

            return TurnDraft {
                record: RecordedReply::matched(text.clone(), key),
                reply: AgentReply::new(text, metadata),
                matched_key: Some(key.to_string()),
                fallback_tier: None,
            };
        }

        let tier = self.fallback.next_tier(history);
        let output = self.fallback.output(tier);
        let metadata = ReplyMetadata::new(confidence, output.category.clone(), output.has_follow_up)
            .with_fallback_tier(tier);

        tracing::debug!(
            candidate = ?result.key,
            confidence,
            tier = tier.as_str(),
            "Falling back"
        );

        TurnDraft {
            record: RecordedReply::fallback(output.text.clone(), tier),
            reply: AgentReply::new(output.text.clone(), metadata),
            matched_key: None,
            fallback_tier: Some(tier),
        }
    }

    /// Greeting for a new session
    pub fn welcome_reply(&self) -> AgentReply {
        AgentReply::new(
            self.welcome.clone(),
            ReplyMetadata::new(1.0, "general", false),
        )
    }

    pub fn classify(&self, text: &str) -> Topic {
        self.classifier.classify(text)
    }

    /// Up to two other keys in the same category
    pub fn related_keys(&self, key: &str) -> Vec<String> {
        self.index
            .related_keys(key)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn new_conversation(&self) -> ConversationState {
        ConversationState::new(self.history_limit)
    }

    pub fn index(&self) -> &Arc<KnowledgeIndex> {
        &self.index
    }

    pub fn rotator(&self) -> &SuggestionRotator {
        &self.rotator
    }

    /// Quick replies for the conversation's latest reply, or the greeting
    /// when nothing has been said yet
    pub fn quick_replies(&self, history: &ConversationState) -> Vec<String> {
        let text = history
            .last_reply()
            .map(|r| r.text.as_str())
            .unwrap_or(self.welcome.as_str());
        self.quick_replies.for_reply(text)
    }

    pub fn pacer(&self) -> &Pacer {
        &self.pacer
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }
}
