//! Knowledge index errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndexError {
    #[error("Knowledge base has no entries")]
    Empty,

    #[error("Entry #{0} has an empty key")]
    EmptyKey(usize),

    #[error("Key '{0}' may only contain lower-case letters, digits and '_'")]
    InvalidKey(String),

    #[error("Entry '{0}' has an empty answer")]
    EmptyAnswer(String),

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),
}

pub type Result<T> = std::result::Result<T, IndexError>;

impl From<IndexError> for wofa_core::Error {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::DuplicateKey(key) => wofa_core::Error::DuplicateKey(key),
            IndexError::InvalidKey(ref key) | IndexError::EmptyAnswer(ref key) => {
                wofa_core::Error::InvalidEntry {
                    key: key.clone(),
                    reason: err.to_string(),
                }
            }
            IndexError::EmptyKey(_) => wofa_core::Error::InvalidEntry {
                key: String::new(),
                reason: err.to_string(),
            },
            IndexError::Empty => wofa_core::Error::KnowledgeLoad(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_core_error() {
        let core: wofa_core::Error = IndexError::DuplicateKey("fallback".into()).into();
        assert!(matches!(core, wofa_core::Error::DuplicateKey(k) if k == "fallback"));

        let core: wofa_core::Error = IndexError::InvalidKey("Bad Key".into()).into();
        assert!(matches!(
            core,
            wofa_core::Error::InvalidEntry { ref key, ref reason } if key == "Bad Key" && reason.contains("lower-case")
        ));

        let core: wofa_core::Error = IndexError::EmptyKey(3).into();
        assert!(matches!(core, wofa_core::Error::InvalidEntry { ref key, .. } if key.is_empty()));

        let core: wofa_core::Error = IndexError::Empty.into();
        assert!(matches!(core, wofa_core::Error::KnowledgeLoad(_)));
    }
}
