//! Response formatting
//!
//! Builds the reply text for one entry, in fixed order: hedge prefix,
//! answer, required documents, contact information, follow-up questions.
//! A missing optional field omits its whole block.

use wofa_config::constants::confidence::HEDGE_PREFIX;
use wofa_core::ResponseEntry;
use wofa_text_processing::{ConfidenceBand, Thresholds};

const DOCUMENTS_HEADER: &str = "\n\nRequired Documents:\n";
const CONTACT_HEADER: &str = "\n\nContact Information:";
const FOLLOW_UP_HEADER: &str = "\n\nWould you like to know:\n";

#[derive(Debug, Clone)]
pub struct ResponseFormatter {
    thresholds: Thresholds,
    hedge_prefix: String,
}

impl Default for ResponseFormatter {
    fn default() -> Self {
        Self::new(Thresholds::default())
    }
}

impl ResponseFormatter {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            hedge_prefix: HEDGE_PREFIX.to_string(),
        }
    }

    pub fn format(&self, entry: &ResponseEntry, confidence: f32, include_follow_up: bool) -> String {
        let mut out = String::with_capacity(entry.answer_template.len() + 128);

        if self.thresholds.band(confidence) == ConfidenceBand::Hedged {
            out.push_str(&self.hedge_prefix);
        }

        out.push_str(&entry.answer_template);

        if let Some(documents) = entry.documents() {
            out.push_str(DOCUMENTS_HEADER);
            out.push_str(&bullets(documents));
        }

        if let Some(contact) = entry.contact_info() {
            out.push_str(CONTACT_HEADER);
            if let Some(phone) = present(&contact.phone) {
                out.push_str(&format!("\n📞 {}", phone));
            }
            if let Some(whatsapp) = present(&contact.whatsapp) {
                out.push_str(&format!("\n💬 WhatsApp: {}", whatsapp));
            }
            if let Some(email) = present(&contact.email) {
                out.push_str(&format!("\n✉️ {}", email));
            }
        }

        if include_follow_up {
            if let Some(follow_up) = entry.follow_up() {
                out.push_str(FOLLOW_UP_HEADER);
                out.push_str(&bullets(follow_up));
            }
        }

        out
    }
}

fn bullets(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("• {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.trim().is_empty())
}
