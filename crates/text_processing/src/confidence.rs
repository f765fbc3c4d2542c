//! Confidence scoring

use serde::{Deserialize, Serialize};
use wofa_config::constants::confidence as defaults;
use wofa_config::EngineConfig;

/// Confidence of a match distance, clamped to [0, 1]
pub fn confidence(distance: f32) -> f32 {
    (1.0 - distance).clamp(0.0, 1.0)
}

/// Where a confidence value falls relative to the thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceBand {
    /// At or below the acceptance threshold
    Rejected,
    /// Accepted, but the reply is prefixed with a hedge
    Hedged,
    Confident,
}

impl ConfidenceBand {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Self::Rejected)
    }
}

/// Acceptance and hedge thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub accept: f32,
    pub hedge: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            accept: defaults::ACCEPT_THRESHOLD,
            hedge: defaults::HEDGE_THRESHOLD,
        }
    }
}

impl From<&EngineConfig> for Thresholds {
    fn from(config: &EngineConfig) -> Self {
        Self {
            accept: config.accept_threshold,
            hedge: config.hedge_threshold,
        }
    }
}

impl Thresholds {
    pub fn band(&self, confidence: f32) -> ConfidenceBand {
        if confidence <= self.accept {
            ConfidenceBand::Rejected
        } else if confidence < self.hedge {
            ConfidenceBand::Hedged
        } else {
            ConfidenceBand::Confident
        }
    }

    pub fn accepts(&self, confidence: f32) -> bool {
        self.band(confidence).is_accepted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_clamped() {
        assert_eq!(confidence(0.0), 1.0);
        assert_eq!(confidence(1.0), 0.0);
        assert_eq!(confidence(-0.5), 1.0);
        assert_eq!(confidence(1.5), 0.0);
    }

    #[test]
    fn test_monotonic() {
        let mut last = f32::INFINITY;
        for step in 0..=100 {
            let c = confidence(step as f32 / 100.0);
            assert!(c <= last);
            last = c;
        }
    }

    #[test]
    fn test_bands() {
        let t = Thresholds::default();
        assert_eq!(t.band(0.4), ConfidenceBand::Rejected);
        assert_eq!(t.band(0.41), ConfidenceBand::Hedged);
        assert_eq!(t.band(0.69), ConfidenceBand::Hedged);
        assert_eq!(t.band(0.7), ConfidenceBand::Confident);
        assert_eq!(t.band(1.0), ConfidenceBand::Confident);
        assert!(!t.accepts(0.1));
    }

    #[test]
    fn test_from_engine_config() {
        let config = EngineConfig {
            accept_threshold: 0.5,
            ..EngineConfig::default()
        };
        let t = Thresholds::from(&config);
        assert!(!t.accepts(0.45));
        assert_eq!(t.hedge, 0.7);
    }
}
