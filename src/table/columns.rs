//! Fuzzy matching of logical column names against worksheet headers.
//!
//! Source exports vary between plain and emoji-decorated headers, so each
//! logical column carries an ordered candidate list. Resolution is applied
//! independently to the in-memory table (read side) and to the output
//! workbook's first row (write side).

/// Candidate headers for the review text column.
pub const TEXT_CANDIDATES: &[&str] = &["🧹Content_Clean", "Content", "text", "comment", "review"];
/// Candidate headers for the subtheme ground-truth column.
pub const SUBTHEME_GT_CANDIDATES: &[&str] = &["Subtheme_GT"];
/// Candidate headers for the sentiment ground-truth column.
pub const SENTIMENT_GT_CANDIDATES: &[&str] = &["Sentiment_GT"];
/// Candidate headers for the star-rating column.
pub const RATING_CANDIDATES: &[&str] =
    &["⭐Rating", "⭐ Rating", "Rating", "Stars", "Score", "التقييم"];
/// Candidate headers for the review language column.
pub const LANGUAGE_CANDIDATES: &[&str] = &["Language", "lang"];
/// Candidate headers for the theme output column.
pub const THEME_OUT_CANDIDATES: &[&str] = &["🎯 Theme", "Theme"];
/// Candidate headers for the subtheme output column.
pub const SUBTHEME_OUT_CANDIDATES: &[&str] = &["🧩 Subtheme", "Subtheme"];
/// Candidate headers for the sentiment output column.
pub const SENTIMENT_OUT_CANDIDATES: &[&str] = &["😊 Sentiment", "Sentiment"];

/// Resolve a logical column name against actual headers.
///
/// Two passes: an exact trim- and case-insensitive match where candidate
/// order wins, then a whitespace-stripped substring match where header order
/// wins. `None` means the dependent feature is skipped entirely.
pub fn resolve_column(candidates: &[&str], headers: &[String]) -> Option<usize> {
    let lowered: Vec<String> = headers
        .iter()
        .map(|header| header.trim().to_lowercase())
        .collect();

    for candidate in candidates {
        let key = candidate.trim().to_lowercase();
        if let Some(index) = lowered.iter().position(|header| *header == key) {
            return Some(index);
        }
    }

    let compact_candidates: Vec<String> = candidates
        .iter()
        .map(|candidate| strip_whitespace(&candidate.trim().to_lowercase()))
        .collect();
    lowered.iter().position(|header| {
        let compact = strip_whitespace(header);
        compact_candidates
            .iter()
            .any(|candidate| !candidate.is_empty() && compact.contains(candidate.as_str()))
    })
}

fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|ch| !ch.is_whitespace()).collect()
}
