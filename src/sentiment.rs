//! Sentiment fallback rules based on review ratings.
//!
//! The classifier output is primary. A rating-derived label substitutes only
//! when the review text is meaningless or the classifier produced nothing;
//! when both are unavailable the prediction stays empty and the cell filler
//! skips it.

use crate::text::is_meaningful;

/// Map a star rating to a sentiment label.
///
/// `>= 4` is Positive, `<= 2` Negative, anything else in between Neutral.
/// Missing or non-numeric ratings yield `None` — never an error.
pub fn rating_to_sentiment(rating: Option<f64>) -> Option<&'static str> {
    let rating = rating?;
    if rating >= 4.0 {
        Some("Positive")
    } else if rating <= 2.0 {
        Some("Negative")
    } else {
        Some("Neutral")
    }
}

/// Resolve the final sentiment for one row.
///
/// Three tiers: the base prediction wins when the text is meaningful and the
/// prediction is non-empty; otherwise the rating fallback applies when
/// available; otherwise the base prediction passes through unchanged
/// (possibly empty).
pub fn resolve(text: &str, base: &str, rating: Option<f64>) -> String {
    let pred_ok = !base.trim().is_empty();
    if !is_meaningful(text) || !pred_ok {
        if let Some(fallback) = rating_to_sentiment(rating) {
            return fallback.to_string();
        }
    }
    base.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_thresholds() {
        assert_eq!(rating_to_sentiment(Some(5.0)), Some("Positive"));
        assert_eq!(rating_to_sentiment(Some(4.0)), Some("Positive"));
        assert_eq!(rating_to_sentiment(Some(3.0)), Some("Neutral"));
        assert_eq!(rating_to_sentiment(Some(2.5)), Some("Neutral"));
        assert_eq!(rating_to_sentiment(Some(2.0)), Some("Negative"));
        assert_eq!(rating_to_sentiment(Some(1.0)), Some("Negative"));
        assert_eq!(rating_to_sentiment(None), None);
    }

    #[test]
    fn meaningful_text_keeps_the_prediction() {
        assert_eq!(resolve("great app", "Positive", Some(1.0)), "Positive");
    }

    #[test]
    fn meaningless_text_uses_the_rating() {
        assert_eq!(resolve("", "Positive", Some(1.0)), "Negative");
        assert_eq!(resolve("nan", "Negative", Some(5.0)), "Positive");
        assert_eq!(resolve("   ", "Neutral", Some(3.0)), "Neutral");
    }

    #[test]
    fn empty_prediction_uses_the_rating() {
        assert_eq!(resolve("great app", "", Some(5.0)), "Positive");
        assert_eq!(resolve("great app", "  ", Some(1.0)), "Negative");
    }

    #[test]
    fn no_rating_passes_the_base_through() {
        assert_eq!(resolve("", "", None), "");
        assert_eq!(resolve("", "Positive", None), "Positive");
    }
}
