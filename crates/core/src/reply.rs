//! Match results and reply metadata

use serde::{Deserialize, Serialize};

/// Current `ReplyMetadata` schema version
pub const METADATA_VERSION: u16 = 1;

/// Outcome of a fuzzy lookup for one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Best candidate, `None` when nothing overlapped
    pub key: Option<String>,
    /// Dissimilarity in [0, 1], 0 is a perfect match
    pub distance: f32,
}

impl MatchResult {
    pub fn new(key: impl Into<String>, distance: f32) -> Self {
        Self {
            key: Some(key.into()),
            distance: distance.clamp(0.0, 1.0),
        }
    }

    /// The lowest-confidence result
    pub fn no_match() -> Self {
        Self {
            key: None,
            distance: 1.0,
        }
    }

    pub fn is_match(&self) -> bool {
        self.key.is_some()
    }
}

/// Fallback escalation tiers, from narrowest to broadest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackTier {
    /// First unmatched turn: generic rephrase prompt
    FirstMiss,
    /// Generic fallback already shown: broader help menu
    RepeatedMiss,
    /// Help menu already shown: ask the user to disambiguate
    PersistentMiss,
}

impl FallbackTier {
    /// Knowledge base key rendered for this tier
    pub fn response_key(&self) -> &'static str {
        match self {
            FallbackTier::FirstMiss => "fallback",
            FallbackTier::RepeatedMiss => "general_help",
            FallbackTier::PersistentMiss => "unclear_intent",
        }
    }

    /// Tier whose output must already have been shown to reach this tier
    pub fn predecessor(&self) -> Option<FallbackTier> {
        match self {
            FallbackTier::FirstMiss => None,
            FallbackTier::RepeatedMiss => Some(FallbackTier::FirstMiss),
            FallbackTier::PersistentMiss => Some(FallbackTier::RepeatedMiss),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackTier::FirstMiss => "first_miss",
            FallbackTier::RepeatedMiss => "repeated_miss",
            FallbackTier::PersistentMiss => "persistent_miss",
        }
    }

    /// Keys every knowledge base must provide
    pub fn required_keys() -> [&'static str; 3] {
        [
            FallbackTier::FirstMiss.response_key(),
            FallbackTier::RepeatedMiss.response_key(),
            FallbackTier::PersistentMiss.response_key(),
        ]
    }
}

/// Metadata sent to the UI alongside a formatted reply
///
/// Closed and versioned. New information is added as explicit optional
/// fields and a version bump.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyMetadata {
    pub version: u16,
    pub confidence: f32,
    pub category: String,
    pub has_follow_up: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_tier: Option<FallbackTier>,
}

impl ReplyMetadata {
    pub fn new(confidence: f32, category: impl Into<String>, has_follow_up: bool) -> Self {
        Self {
            version: METADATA_VERSION,
            confidence,
            category: category.into(),
            has_follow_up,
            matched_key: None,
            fallback_tier: None,
        }
    }

    pub fn with_matched_key(mut self, key: impl Into<String>) -> Self {
        self.matched_key = Some(key.into());
        self
    }

    pub fn with_fallback_tier(mut self, tier: FallbackTier) -> Self {
        self.fallback_tier = Some(tier);
        self
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
