//! Input normalization

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Lower-case, drop everything but word characters and whitespace, collapse
/// whitespace runs and trim.
///
/// Total and idempotent: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    let lower = text.to_lowercase();
    let stripped = NON_WORD.replace_all(&lower, "");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

/// Words of already-normalized text with at least `min_len` characters
pub fn tokenize(normalized: &str, min_len: usize) -> Vec<&str> {
    normalized
        .unicode_words()
        .filter(|w| w.chars().count() >= min_len)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize("  How do I   make a CLAIM?? "), "how do i make a claim");
        assert_eq!(normalize("Call 030-275-0151!"), "call 0302750151");
        assert_eq!(normalize("What's\tthe\n\ngrace period"), "whats the grace period");
    }

    #[test]
    fn test_normalize_total() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("?!..."), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_normalize_idempotent() {
        let samples = [
            "How do I make a claim?",
            "Mobile Money (MTN, Vodafone, AirtelTigo)",
            "GH¢60 monthly • cash back",
            "claims_process",
            "Ünïcödé  Wörds",
            "📞 030-275-0151",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", s);
        }
    }

    #[test]
    fn test_unicode_words_kept() {
        assert_eq!(normalize("Ünïcödé"), "ünïcödé");
    }

    #[test]
    fn test_tokenize_min_length() {
        let text = normalize("How do I make a claim");
        assert_eq!(tokenize(&text, 2), vec!["how", "do", "make", "claim"]);
        assert_eq!(tokenize(&text, 1).len(), 6);
    }
}
