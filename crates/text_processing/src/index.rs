//! Knowledge index
//!
//! One [`IndexEntry`] per response key, built once at startup from the
//! knowledge source. The index is read-only afterwards and shared through
//! `Arc` between sessions.

use std::collections::{HashMap, HashSet};

use wofa_core::{KnowledgeSource, ResponseEntry};

use crate::error::{IndexError, Result};
use crate::normalize::{normalize, tokenize};

/// Category assigned when no keyword rule applies
pub const GENERAL_CATEGORY: &str = "general";

/// Substring rules, first hit wins
const CATEGORY_RULES: [(&str, &str); 6] = [
    ("claim", "claims"),
    ("payment", "payments"),
    ("education", "education"),
    ("investment", "investments"),
    ("policy", "policy"),
    ("branch", "branches"),
];

/// Derive the category of a response key
pub fn category_for_key(key: &str) -> &'static str {
    CATEGORY_RULES
        .iter()
        .find(|(needle, _)| key.contains(needle))
        .map(|(_, category)| *category)
        .unwrap_or(GENERAL_CATEGORY)
}

/// Searchable view of one response
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub key: String,
    /// Curated aliases followed by key variants, de-duplicated
    pub aliases: Vec<String>,
    pub category: String,
    /// Lower-case join of key words, aliases, category and answer prefix
    pub search_text: String,
    pub(crate) search_tokens: Vec<String>,
    pub(crate) alias_tokens: Vec<Vec<String>>,
    pub(crate) category_tokens: Vec<String>,
}

impl IndexEntry {
    fn new(entry: &ResponseEntry, curated: &[String], answer_prefix_chars: usize) -> Self {
        let key = entry.key.clone();
        let aliases = derive_aliases(&key, curated);
        let category = category_for_key(&key).to_string();

        let answer_prefix: String = entry.answer_template.chars().take(answer_prefix_chars).collect();

        let mut parts = Vec::with_capacity(aliases.len() + 3);
        parts.push(key.replace('_', " "));
        parts.extend(aliases.iter().cloned());
        parts.push(category.clone());
        parts.push(answer_prefix);
        let search_text = parts.join(" ").to_lowercase();

        let search_tokens = unique_tokens(&search_text);
        let alias_tokens = aliases
            .iter()
            .map(|a| unique_tokens(a))
            .filter(|tokens| !tokens.is_empty())
            .collect();
        let category_tokens = unique_tokens(&category);

        Self {
            key,
            aliases,
            category,
            search_text,
            search_tokens,
            alias_tokens,
            category_tokens,
        }
    }
}

/// Curated aliases, then the key with spaces, the key concatenated, each
/// key word. First occurrence wins.
fn derive_aliases(key: &str, curated: &[String]) -> Vec<String> {
    let words: Vec<&str> = key.split('_').filter(|w| !w.is_empty()).collect();

    let mut candidates: Vec<String> = curated.iter().map(|a| a.to_lowercase()).collect();
    candidates.push(words.join(" "));
    candidates.push(words.concat());
    candidates.extend(words.iter().map(|w| w.to_string()));

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|a| !a.trim().is_empty())
        .filter(|a| seen.insert(a.clone()))
        .collect()
}

fn unique_tokens(text: &str) -> Vec<String> {
    let normalized = normalize(text);
    let mut seen = HashSet::new();
    tokenize(&normalized, 1)
        .into_iter()
        .filter(|t| seen.insert(*t))
        .map(str::to_string)
        .collect()
}

fn validate_key(position: usize, key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(IndexError::EmptyKey(position));
    }
    let valid = key
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if !valid {
        return Err(IndexError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Index over all response entries
#[derive(Debug, Clone)]
pub struct KnowledgeIndex {
    entries: Vec<IndexEntry>,
    responses: Vec<ResponseEntry>,
    positions: HashMap<String, usize>,
}

impl KnowledgeIndex {
    /// Build the index, rejecting malformed entries
    ///
    /// Curated aliases for keys that do not exist are logged and ignored.
    pub fn build(
        responses: Vec<ResponseEntry>,
        curated_aliases: &HashMap<String, Vec<String>>,
        answer_prefix_chars: usize,
    ) -> Result<Self> {
        if responses.is_empty() {
            return Err(IndexError::Empty);
        }

        let mut positions = HashMap::with_capacity(responses.len());
        for (position, response) in responses.iter().enumerate() {
            validate_key(position, &response.key)?;
            if response.answer_template.trim().is_empty() {
                return Err(IndexError::EmptyAnswer(response.key.clone()));
            }
            if positions.insert(response.key.clone(), position).is_some() {
                return Err(IndexError::DuplicateKey(response.key.clone()));
            }
        }

        let mut unknown: Vec<&String> = curated_aliases
            .keys()
            .filter(|k| !positions.contains_key(*k))
            .collect();
        unknown.sort();
        for key in unknown {
            tracing::warn!(key = %key, "Ignoring aliases for unknown response key");
        }

        let entries: Vec<IndexEntry> = responses
            .iter()
            .map(|response| {
                let curated = curated_aliases
                    .get(&response.key)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                IndexEntry::new(response, curated, answer_prefix_chars)
            })
            .collect();

        tracing::debug!(entries = entries.len(), "Built knowledge index");

        Ok(Self {
            entries,
            responses,
            positions,
        })
    }

    /// Build from a knowledge source
    pub fn from_source(source: &dyn KnowledgeSource, answer_prefix_chars: usize) -> Result<Self> {
        Self::build(source.entries(), &source.aliases(), answer_prefix_chars)
    }

    /// Index entry for a key
    pub fn get(&self, key: &str) -> Option<&IndexEntry> {
        self.positions.get(key).map(|&i| &self.entries[i])
    }

    /// Response entry for a key
    pub fn entry(&self, key: &str) -> Option<&ResponseEntry> {
        self.positions.get(key).map(|&i| &self.responses[i])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    /// Keys in declaration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Up to two other keys sharing the category of `key`
    pub fn related_keys(&self, key: &str) -> Vec<&str> {
        let Some(entry) = self.get(key) else {
            return Vec::new();
        };
        self.entries
            .iter()
            .filter(|e| e.category == entry.category && e.key != entry.key)
            .take(2)
            .map(|e| e.key.as_str())
            .collect()
    }
}
