//! Fallback escalation
//!
//! Unmatched turns escalate `FirstMiss` -> `RepeatedMiss` -> `PersistentMiss`
//! depending on which tier outputs are still in the reply history. Once the
//! outputs age out of the history the next miss starts again at `FirstMiss`.

use wofa_core::FallbackTier;
use wofa_text_processing::KnowledgeIndex;

use crate::conversation::ConversationState;
use crate::formatter::ResponseFormatter;
use crate::AgentError;

/// Pre-formatted output of one tier
#[derive(Debug, Clone)]
pub struct TierOutput {
    pub tier: FallbackTier,
    pub text: String,
    pub category: String,
    pub has_follow_up: bool,
}

#[derive(Debug, Clone)]
pub struct FallbackTracker {
    outputs: Vec<TierOutput>,
}

impl FallbackTracker {
    /// Fails when any tier entry is missing from the index
    pub fn new(
        index: &KnowledgeIndex,
        formatter: &ResponseFormatter,
        include_follow_up: bool,
    ) -> Result<Self, AgentError> {
        let tiers = [
            FallbackTier::FirstMiss,
            FallbackTier::RepeatedMiss,
            FallbackTier::PersistentMiss,
        ];

        let mut outputs = Vec::with_capacity(tiers.len());
        for tier in tiers {
            let key = tier.response_key();
            let entry = index
                .entry(key)
                .ok_or_else(|| AgentError::MissingEntry(key.to_string()))?;
            let category = index
                .get(key)
                .map(|e| e.category.clone())
                .unwrap_or_else(|| "general".to_string());

            // zero confidence never falls in the hedge band
            outputs.push(TierOutput {
                tier,
                text: formatter.format(entry, 0.0, include_follow_up),
                category,
                has_follow_up: entry.has_follow_up(),
            });
        }

        Ok(Self { outputs })
    }

    pub fn output(&self, tier: FallbackTier) -> &TierOutput {
        // outputs are built for every tier, in declaration order
        match tier {
            FallbackTier::FirstMiss => &self.outputs[0],
            FallbackTier::RepeatedMiss => &self.outputs[1],
            FallbackTier::PersistentMiss => &self.outputs[2],
        }
    }

    /// Tier for the next unmatched turn
    pub fn next_tier(&self, history: &ConversationState) -> FallbackTier {
        let shown = |tier: FallbackTier| history.has_shown(tier, &self.output(tier).text);

        // highest tier whose predecessor's output is still visible
        [FallbackTier::PersistentMiss, FallbackTier::RepeatedMiss]
            .into_iter()
            .find(|tier| tier.predecessor().map_or(false, |p| shown(p)))
            .unwrap_or(FallbackTier::FirstMiss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::RecordedReply;
    use std::collections::HashMap;
    use wofa_core::ResponseEntry;

    fn tracker() -> FallbackTracker {
        let entries = vec![
            ResponseEntry::new("claims_process", "Claims."),
            ResponseEntry::new("fallback", "I didn't understand."),
            ResponseEntry::new("general_help", "I can help with claims."),
            ResponseEntry::new("unclear_intent", "Please rephrase."),
        ];
        let index = KnowledgeIndex::build(entries, &HashMap::new(), 150).unwrap();
        FallbackTracker::new(&index, &ResponseFormatter::default(), true).unwrap()
    }

    fn miss(state: &mut ConversationState, tracker: &FallbackTracker) -> FallbackTier {
        let tier = tracker.next_tier(state);
        state.commit(RecordedReply::fallback(tracker.output(tier).text.clone(), tier), None);
        tier
    }

    #[test]
    fn test_escalation_sequence() {
        let tracker = tracker();
        let mut state = ConversationState::new(5);
        assert_eq!(miss(&mut state, &tracker), FallbackTier::FirstMiss);
        assert_eq!(miss(&mut state, &tracker), FallbackTier::RepeatedMiss);
        assert_eq!(miss(&mut state, &tracker), FallbackTier::PersistentMiss);
        // never beyond the third tier
        assert_eq!(miss(&mut state, &tracker), FallbackTier::PersistentMiss);
    }

    #[test]
    fn test_regresses_when_outputs_age_out() {
        let tracker = tracker();
        let mut state = ConversationState::new(5);
        miss(&mut state, &tracker);
        miss(&mut state, &tracker);
        for i in 0..5 {
            state.commit(RecordedReply::matched(format!("answer {}", i), "claims_process"), None);
        }
        assert_eq!(tracker.next_tier(&state), FallbackTier::FirstMiss);
    }

    #[test]
    fn test_identical_text_from_other_entry_ignored() {
        let tracker = tracker();
        let mut state = ConversationState::new(5);
        let text = tracker.output(FallbackTier::FirstMiss).text.clone();
        state.commit(RecordedReply::matched(text, "claims_process"), None);
        assert_eq!(tracker.next_tier(&state), FallbackTier::FirstMiss);
    }

    #[test]
    fn test_missing_tier_entry() {
        let entries = vec![
            ResponseEntry::new("fallback", "Sorry?"),
            ResponseEntry::new("general_help", "Help."),
        ];
        let index = KnowledgeIndex::build(entries, &HashMap::new(), 150).unwrap();
        let err = FallbackTracker::new(&index, &ResponseFormatter::default(), true).unwrap_err();
        assert!(matches!(err, AgentError::MissingEntry(key) if key == "unclear_intent"));
    }
}
