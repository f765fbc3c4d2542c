//! Core traits and types for the scripted assistant
//!
//! This crate provides foundational types used across all other crates:
//! - Knowledge base records (`ResponseEntry`, `ContactInfo`)
//! - Match results and reply metadata sent to the UI
//! - Conversation topics and their fixed declaration order
//! - Fallback escalation tiers
//! - The `KnowledgeSource` trait implemented by data loaders
//! - Error types

pub mod error;
pub mod knowledge;
pub mod reply;
pub mod topic;
pub mod traits;

pub use error::{Error, Result};
pub use knowledge::{ContactInfo, ResponseEntry};
pub use reply::{FallbackTier, MatchResult, ReplyMetadata, METADATA_VERSION};
pub use topic::Topic;
pub use traits::{KnowledgeSource, StaticKnowledge};
