//! Text processing for the scripted assistant
//!
//! This crate provides the lookup half of a turn:
//! - **Normalization**: lower-case, strip punctuation, collapse whitespace
//! - **Knowledge Index**: per-key aliases, category and search text
//! - **Fuzzy Matching**: token-tolerant weighted search over the index
//! - **Confidence**: distance to confidence, acceptance and hedge bands
//! - **Topic Classification**: keyword tables to conversation topics
//!
//! # Example
//!
//! ```ignore
//! use wofa_text_processing::{normalize, FuzzyMatcher, KnowledgeIndex};
//!
//! let index = Arc::new(KnowledgeIndex::from_source(&domain, 150)?);
//! let matcher = FuzzyMatcher::new(index, MatcherConfig::default());
//!
//! let result = matcher.match_query(&normalize("How do I make a claim?"));
//! assert_eq!(result.key.as_deref(), Some("claims_process"));
//! ```

pub mod confidence;
pub mod index;
pub mod matcher;
pub mod normalize;
pub mod topic;

mod error;

pub use confidence::{confidence, ConfidenceBand, Thresholds};
pub use error::{IndexError, Result};
pub use index::{category_for_key, IndexEntry, KnowledgeIndex};
pub use matcher::{FuzzyMatcher, MatchCandidate};
pub use normalize::{normalize, tokenize};
pub use topic::TopicClassifier;
