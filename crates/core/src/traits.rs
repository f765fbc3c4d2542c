//! Traits implemented by external collaborators

use std::collections::HashMap;

use crate::ResponseEntry;

/// Supplies the knowledge base to the engine at startup
///
/// The engine reads the entries and alias table once, while building its
/// index, and never mutates them. Implemented by the YAML/JSON domain loader;
/// tests can use `StaticKnowledge`.
pub trait KnowledgeSource: Send + Sync {
    /// All response entries, in declaration order
    fn entries(&self) -> Vec<ResponseEntry>;

    /// Curated alias table, keyed by response key
    fn aliases(&self) -> HashMap<String, Vec<String>>;
}

/// In-memory knowledge source
#[derive(Debug, Clone, Default)]
pub struct StaticKnowledge {
    pub entries: Vec<ResponseEntry>,
    pub aliases: HashMap<String, Vec<String>>,
}

impl StaticKnowledge {
    pub fn new(entries: Vec<ResponseEntry>) -> Self {
        Self {
            entries,
            aliases: HashMap::new(),
        }
    }

    pub fn with_aliases(mut self, key: impl Into<String>, aliases: Vec<String>) -> Self {
        self.aliases.insert(key.into(), aliases);
        self
    }
}

impl KnowledgeSource for StaticKnowledge {
    fn entries(&self) -> Vec<ResponseEntry> {
        self.entries.clone()
    }

    fn aliases(&self) -> HashMap<String, Vec<String>> {
        self.aliases.clone()
    }
}
