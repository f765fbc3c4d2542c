//! Fuzzy matching of user queries against the knowledge index
//!
//! Every index entry is scored on three fields:
//! - `search_text` tokens
//! - aliases (best single alias)
//! - category
//!
//! A field's distance is `1 - mean(best similarity per query token)`; the
//! entry distance is the weighted mean of its field distances. The lowest
//! distance wins and ties keep declaration order. Acceptance is left to the
//! caller.

pub mod edit_distance;

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use wofa_config::MatcherConfig;
use wofa_core::MatchResult;

use crate::index::{IndexEntry, KnowledgeIndex};
use crate::normalize::tokenize;
use edit_distance::token_similarity;

/// Candidates logged per query
const LOGGED_CANDIDATES: usize = 3;

/// A scored index entry
#[derive(Debug, Clone, Serialize)]
pub struct MatchCandidate {
    pub key: String,
    pub distance: f32,
    pub search_text_distance: f32,
    pub alias_distance: f32,
    pub category_distance: f32,
}

/// Weighted fuzzy matcher
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    index: Arc<KnowledgeIndex>,
    config: MatcherConfig,
    stop_words: HashSet<String>,
}

impl FuzzyMatcher {
    pub fn new(index: Arc<KnowledgeIndex>, config: MatcherConfig) -> Self {
        let stop_words = config.stop_words.iter().map(|w| w.to_lowercase()).collect();
        Self {
            index,
            config,
            stop_words,
        }
    }

    pub fn index(&self) -> &Arc<KnowledgeIndex> {
        &self.index
    }

    /// Best entry for an already-normalized query
    ///
    /// Returns `MatchResult::no_match()` for an empty query or when no
    /// query token overlaps any entry.
    pub fn match_query(&self, normalized_query: &str) -> MatchResult {
        let candidates = self.rank(normalized_query);

        for (rank, candidate) in candidates.iter().take(LOGGED_CANDIDATES).enumerate() {
            tracing::debug!(
                rank = rank + 1,
                key = %candidate.key,
                distance = candidate.distance,
                search_text = candidate.search_text_distance,
                aliases = candidate.alias_distance,
                category = candidate.category_distance,
                "Match candidate"
            );
        }

        match candidates.into_iter().next() {
            Some(best) => MatchResult::new(best.key, best.distance),
            None => {
                tracing::debug!(query = normalized_query, "No overlapping entry");
                MatchResult::no_match()
            }
        }
    }

    /// All entries with any token overlap, best first
    pub fn rank(&self, normalized_query: &str) -> Vec<MatchCandidate> {
        let query_tokens: Vec<&str> = tokenize(normalized_query, self.config.min_token_length)
            .into_iter()
            .filter(|t| !self.stop_words.contains(*t))
            .collect();
        if query_tokens.is_empty() {
            return Vec::new();
        }

        let mut candidates: Vec<MatchCandidate> = self
            .index
            .entries()
            .iter()
            .filter_map(|entry| self.score(entry, &query_tokens))
            .collect();

        // stable: equal distances keep declaration order
        candidates.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        candidates
    }

    fn score(&self, entry: &IndexEntry, query_tokens: &[&str]) -> Option<MatchCandidate> {
        let search_sim = field_similarity(query_tokens, &entry.search_tokens);
        let alias_sim = entry
            .alias_tokens
            .iter()
            .map(|alias| field_similarity(query_tokens, alias))
            .fold(0.0_f32, f32::max);
        let category_sim = field_similarity(query_tokens, &entry.category_tokens);

        if search_sim <= 0.0 && alias_sim <= 0.0 && category_sim <= 0.0 {
            return None;
        }

        let search_text_distance = 1.0 - search_sim;
        let alias_distance = 1.0 - alias_sim;
        let category_distance = 1.0 - category_sim;

        let weights = [
            self.config.search_text_weight,
            self.config.aliases_weight,
            self.config.category_weight,
        ];
        let total: f32 = weights.iter().sum();
        let distance = if total > 0.0 {
            (weights[0] * search_text_distance
                + weights[1] * alias_distance
                + weights[2] * category_distance)
                / total
        } else {
            1.0
        };

        Some(MatchCandidate {
            key: entry.key.clone(),
            distance: distance.clamp(0.0, 1.0),
            search_text_distance,
            alias_distance,
            category_distance,
        })
    }
}

/// Mean over query tokens of the best similarity against `field`
fn field_similarity(query_tokens: &[&str], field: &[String]) -> f32 {
    if query_tokens.is_empty() || field.is_empty() {
        return 0.0;
    }
    let total: f32 = query_tokens
        .iter()
        .map(|q| {
            field
                .iter()
                .map(|t| token_similarity(q, t))
                .fold(0.0_f32, f32::max)
        })
        .sum();
    total / query_tokens.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use std::collections::HashMap;
    use wofa_core::ResponseEntry;

    fn matcher() -> FuzzyMatcher {
        let entries = vec![
            ResponseEntry::new("claims_process", "To file a claim with us, call the hotline."),
            ResponseEntry::new("payment_methods", "Pay with Mobile Money or at a branch."),
            ResponseEntry::new("fallback", "I didn't understand."),
        ];
        let mut aliases = HashMap::new();
        aliases.insert(
            "claims_process".to_string(),
            vec!["make claim".to_string(), "how to claim".to_string()],
        );
        aliases.insert(
            "payment_methods".to_string(),
            vec!["how to pay".to_string(), "mobile money".to_string()],
        );
        let index = KnowledgeIndex::build(entries, &aliases, 150).unwrap();
        FuzzyMatcher::new(Arc::new(index), MatcherConfig::default())
    }

    #[test]
    fn test_claim_query() {
        let result = matcher().match_query(&normalize("How do I make a claim?"));
        assert_eq!(result.key.as_deref(), Some("claims_process"));
        assert!(result.distance < 0.6);
    }

    #[test]
    fn test_typo_tolerated() {
        let result = matcher().match_query(&normalize("mobile monye"));
        assert_eq!(result.key.as_deref(), Some("payment_methods"));
    }

    #[test]
    fn test_no_overlap() {
        let result = matcher().match_query(&normalize("xyzzy plugh quux"));
        assert!(result.key.is_none());
        assert_eq!(result.distance, 1.0);
    }

    #[test]
    fn test_empty_query() {
        let m = matcher();
        assert!(m.match_query("").key.is_none());
        // only sub-minimum tokens
        assert!(m.match_query("a i").key.is_none());
    }

    #[test]
    fn test_function_words_alone_do_not_match() {
        let m = matcher();
        assert!(m.match_query(&normalize("the and for")).key.is_none());
        assert!(m.match_query(&normalize("What is this?")).key.is_none());
        // content words still match once function words are dropped
        let result = m.match_query(&normalize("how do I pay"));
        assert_eq!(result.key.as_deref(), Some("payment_methods"));
    }

    #[test]
    fn test_stop_words_are_configurable() {
        let entries = vec![ResponseEntry::new("branch_locations", "Visit the head office.")];
        let index = KnowledgeIndex::build(entries, &HashMap::new(), 150).unwrap();
        let config = MatcherConfig {
            stop_words: vec![],
            ..MatcherConfig::default()
        };
        let m = FuzzyMatcher::new(Arc::new(index), config);
        assert_eq!(m.match_query("the").key.as_deref(), Some("branch_locations"));
    }

    #[test]
    fn test_rank_sorted() {
        let ranked = matcher().rank(&normalize("claim money"));
        assert!(!ranked.is_empty());
        assert!(ranked.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_ties_keep_declaration_order() {
        let entries = vec![
            ResponseEntry::new("alpha", "same words"),
            ResponseEntry::new("beta", "same words"),
        ];
        let index = KnowledgeIndex::build(entries, &HashMap::new(), 150).unwrap();
        let m = FuzzyMatcher::new(Arc::new(index), MatcherConfig::default());
        let result = m.match_query("same words");
        assert_eq!(result.key.as_deref(), Some("alpha"));
    }
}
