//! Bilingual text normalization and tokenization.
//!
//! Reviews arrive in Arabic, English, or a mix of both, frequently decorated
//! with emoji. The helpers here decide whether a cell holds usable text and
//! break it into the token stream consumed by the vectorizer.

use std::sync::OnceLock;

use regex::Regex;

fn meaningful_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"[A-Za-z0-9\x{0600}-\x{06FF}\x{1F300}-\x{1FAFF}\x{2600}-\x{26FF}]")
            .expect("meaningful-text regex must compile")
    })
}

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // A token is a maximal run of word characters (Latin or Arabic block)
        // or a single emoji-range codepoint.
        Regex::new(r"[\w\x{0600}-\x{06FF}]+|[\x{1F300}-\x{1FAFF}\x{2600}-\x{26FF}]")
            .expect("token regex must compile")
    })
}

/// Whether a raw cell value carries usable review text.
///
/// Empty strings, whitespace and the literal `"nan"` (any casing, a frequent
/// artifact of upstream exports) are rejected. Anything containing at least
/// one Latin alphanumeric, Arabic-block character or emoji-range symbol
/// counts as meaningful.
pub fn is_meaningful(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return false;
    }
    meaningful_pattern().is_match(trimmed)
}

/// Split text into lowercased word/emoji tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    token_pattern()
        .find_iter(text)
        .map(|token| token.as_str().to_lowercase())
        .collect()
}

/// Expand a token stream into unigrams and bigrams.
///
/// Bigrams are joined with a single space. The vectorizer treats every
/// returned string as an opaque vocabulary term.
pub fn ngrams(tokens: &[String]) -> Vec<String> {
    let mut terms = Vec::with_capacity(tokens.len().saturating_mul(2));
    terms.extend(tokens.iter().cloned());
    for pair in tokens.windows(2) {
        terms.push(format!("{} {}", pair[0], pair[1]));
    }
    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_whitespace_and_nan() {
        assert!(!is_meaningful(""));
        assert!(!is_meaningful("   "));
        assert!(!is_meaningful("nan"));
        assert!(!is_meaningful("NaN"));
        assert!(!is_meaningful(" NAN "));
    }

    #[test]
    fn rejects_punctuation_only() {
        assert!(!is_meaningful("...!!??"));
        assert!(!is_meaningful("---"));
    }

    #[test]
    fn accepts_latin_arabic_digits_and_emoji() {
        assert!(is_meaningful("great app"));
        assert!(is_meaningful("تطبيق ممتاز"));
        assert!(is_meaningful("5"));
        assert!(is_meaningful("👍"));
    }

    #[test]
    fn tokenizes_mixed_scripts() {
        let tokens = tokenize("Great app التطبيق 10/10");
        assert_eq!(tokens, vec!["great", "app", "التطبيق", "10", "10"]);
    }

    #[test]
    fn emoji_are_single_tokens() {
        let tokens = tokenize("love it 😍😍");
        assert_eq!(tokens, vec!["love", "it", "😍", "😍"]);
    }

    #[test]
    fn ngrams_include_unigrams_and_bigrams() {
        let tokens = tokenize("very easy login");
        let terms = ngrams(&tokens);
        assert!(terms.contains(&"very".to_string()));
        assert!(terms.contains(&"very easy".to_string()));
        assert!(terms.contains(&"easy login".to_string()));
        assert_eq!(terms.len(), 5);
    }
}
