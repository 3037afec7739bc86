//! Label frequency tallies and HTML summary cards.
//!
//! The pipeline only produces the tallies and the rendered HTML; where that
//! HTML ends up is the caller's business, expressed through [`ReportSink`].

use std::io::Write;
use std::path::PathBuf;

/// One label with its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTally {
    /// Label text.
    pub label: String,
    /// Number of rows carrying the label.
    pub count: usize,
}

/// Count non-empty labels, most frequent first (ties break alphabetically).
pub fn tally<'a, I>(values: I) -> Vec<LabelTally>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();
    for value in values {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            continue;
        }
        *counts.entry(trimmed).or_insert(0) += 1;
    }
    let mut tallies: Vec<LabelTally> = counts
        .into_iter()
        .map(|(label, count)| LabelTally {
            label: label.to_string(),
            count,
        })
        .collect();
    tallies.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    tallies
}

/// Render one summary card as a styled HTML table.
pub fn render_card(title: &str, emoji: &str, tallies: &[LabelTally]) -> String {
    let rows: String = tallies
        .iter()
        .map(|tally| {
            format!(
                "<tr><td style='padding:4px 8px'>{}</td>\
                 <td style='text-align:right;padding:4px 8px'>{}</td></tr>",
                escape_html(&tally.label),
                tally.count
            )
        })
        .collect();
    format!(
        r#"
    <div style="max-width:560px;width:100%;margin:10px 0;
                border:1px solid #90caf9;border-radius:14px;
                background:linear-gradient(135deg,#e3f2fd 0%, #fff7e6 100%);
                padding:12px;box-shadow:0 2px 6px rgba(0,0,0,.08)">
      <div style="font-weight:800;margin-bottom:6px;display:flex;gap:8px;align-items:center">
        <span style="font-size:22px;color:#0d47a1">{emoji}</span>
        <span style="color:#0d47a1">{title}</span>
      </div>
      <table style="width:100%;border-collapse:collapse;font-size:12px">
        <thead>
          <tr>
            <th style="text-align:left;padding:4px 8px;color:#0d47a1;background:#dbeafe">Class</th>
            <th style="text-align:right;padding:4px 8px;color:#7a4a00;background:#ffedd5">Count</th>
          </tr>
        </thead>
        <tbody>{rows}</tbody>
      </table>
    </div>"#,
        emoji = emoji,
        title = escape_html(title),
        rows = rows
    )
}

/// Render the three prediction cards as one HTML document fragment.
pub fn render_report(
    themes: &[LabelTally],
    subthemes: &[LabelTally],
    sentiments: &[LabelTally],
) -> String {
    let mut html = String::new();
    html.push_str(&render_card("Theme Predictions", "🏷️", themes));
    html.push_str(&render_card("Subtheme Predictions", "🧩", subthemes));
    html.push_str(&render_card("Sentiment Predictions", "🙂", sentiments));
    html
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Destination for the rendered summary (display, file, test buffer).
pub trait ReportSink {
    /// Deliver the rendered HTML.
    fn present(&mut self, html: &str) -> std::io::Result<()>;
}

/// Sink that writes the summary next to the output workbook.
pub struct HtmlFileSink {
    path: PathBuf,
}

impl HtmlFileSink {
    /// Create a sink targeting `path`.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Destination path.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl ReportSink for HtmlFileSink {
    fn present(&mut self, html: &str) -> std::io::Result<()> {
        let mut file = std::fs::File::create(&self.path)?;
        file.write_all(html.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_skips_empties_and_sorts_by_count() {
        let values = ["Positive", "", "Negative", "Positive", "  ", "Neutral", "Positive"];
        let tallies = tally(values.iter().copied());
        assert_eq!(tallies[0].label, "Positive");
        assert_eq!(tallies[0].count, 3);
        assert_eq!(tallies.len(), 3);
    }

    #[test]
    fn tally_breaks_ties_alphabetically() {
        let values = ["B", "A", "C", "A", "B", "C"];
        let tallies = tally(values.iter().copied());
        let labels: Vec<&str> = tallies.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "B", "C"]);
    }

    #[test]
    fn cards_escape_labels() {
        let tallies = vec![LabelTally {
            label: "<script>".to_string(),
            count: 1,
        }];
        let html = render_card("Theme Predictions", "🏷️", &tallies);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn report_contains_all_three_cards() {
        let html = render_report(&[], &[], &[]);
        assert!(html.contains("Theme Predictions"));
        assert!(html.contains("Subtheme Predictions"));
        assert!(html.contains("Sentiment Predictions"));
    }

    #[test]
    fn file_sink_writes_the_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.html");
        let mut sink = HtmlFileSink::new(path.clone());
        sink.present("<div>ok</div>").unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "<div>ok</div>");
    }
}
