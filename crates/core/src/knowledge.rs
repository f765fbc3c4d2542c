//! Knowledge base records
//!
//! A `ResponseEntry` is one canned answer keyed by a unique identifier such as
//! `claims_process`. Entries are loaded once and never mutated.

use serde::{Deserialize, Serialize};

/// Contact block attached to a response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl ContactInfo {
    /// True when no field carries a non-blank value
    pub fn is_empty(&self) -> bool {
        [&self.phone, &self.whatsapp, &self.email]
            .iter()
            .all(|field| field.as_deref().map_or(true, |v| v.trim().is_empty()))
    }
}

/// A canned response from the knowledge base
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEntry {
    /// Unique key, e.g. `claims_process`
    pub key: String,
    /// Answer text, emitted verbatim
    #[serde(alias = "answer")]
    pub answer_template: String,
    /// Documents the customer must bring
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<String>>,
    /// Contact details shown under the answer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<ContactInfo>,
    /// Follow-up questions offered after the answer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up: Option<Vec<String>>,
}

impl ResponseEntry {
    pub fn new(key: impl Into<String>, answer_template: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            answer_template: answer_template.into(),
            documents: None,
            contact_info: None,
            follow_up: None,
        }
    }

    pub fn with_documents(mut self, documents: Vec<String>) -> Self {
        self.documents = Some(documents);
        self
    }

    pub fn with_contact_info(mut self, contact_info: ContactInfo) -> Self {
        self.contact_info = Some(contact_info);
        self
    }

    pub fn with_follow_up(mut self, follow_up: Vec<String>) -> Self {
        self.follow_up = Some(follow_up);
        self
    }

    /// Documents, if any are listed. An empty list counts as absent.
    pub fn documents(&self) -> Option<&[String]> {
        self.documents.as_deref().filter(|d| !d.is_empty())
    }

    /// Contact info, if at least one field is present
    pub fn contact_info(&self) -> Option<&ContactInfo> {
        self.contact_info.as_ref().filter(|c| !c.is_empty())
    }

    /// Follow-up questions, if any are listed
    pub fn follow_up(&self) -> Option<&[String]> {
        self.follow_up.as_deref().filter(|f| !f.is_empty())
    }

    pub fn has_follow_up(&self) -> bool {
        self.follow_up().is_some()
    }
}
