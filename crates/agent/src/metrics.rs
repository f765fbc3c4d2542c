//! Metrics hooks
//!
//! Uses the `metrics` facade only; installing a recorder/exporter is up to
//! the embedding application. Without one these calls are no-ops.

use wofa_core::ReplyMetadata;

pub const TURNS_TOTAL: &str = "wofa_turns_total";
pub const FALLBACK_TOTAL: &str = "wofa_fallback_total";
pub const MATCH_CONFIDENCE: &str = "wofa_match_confidence";
pub const ACTIVE_SESSIONS: &str = "wofa_active_sessions";

/// Record a committed turn
pub fn record_turn(metadata: &ReplyMetadata) {
    let outcome = if metadata.matched_key.is_some() {
        "matched"
    } else {
        "fallback"
    };
    ::metrics::counter!(TURNS_TOTAL, "outcome" => outcome).increment(1);
    ::metrics::histogram!(MATCH_CONFIDENCE).record(f64::from(metadata.confidence));

    if let Some(tier) = metadata.fallback_tier {
        ::metrics::counter!(FALLBACK_TOTAL, "tier" => tier.as_str()).increment(1);
    }
}

pub fn record_superseded() {
    ::metrics::counter!(TURNS_TOTAL, "outcome" => "superseded").increment(1);
}

pub fn record_active_sessions(count: usize) {
    ::metrics::gauge!(ACTIVE_SESSIONS).set(count as f64);
}

#[cfg(test)]
mod tests {
    use super::*;
    use wofa_core::FallbackTier;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        let matched = ReplyMetadata::new(0.8, "claims", true).with_matched_key("claims_process");
        record_turn(&matched);
        let missed = ReplyMetadata::new(0.0, "general", true)
            .with_fallback_tier(FallbackTier::RepeatedMiss);
        record_turn(&missed);
        record_superseded();
        record_active_sessions(3);
    }
}
