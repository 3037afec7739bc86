//! Capped, language-stratified few-shot sampling.
//!
//! Training sets are drawn from ground-truth-labeled rows only, shuffled
//! with an explicitly seeded generator so the same input always yields the
//! same subset. When a language column is present the caps apply per
//! language (Arabic block first, then English); otherwise one global cap.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::table::{CellValue, Table};

/// Few-shot sample caps.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SampleLimits {
    /// Cap applied when no language column is resolved.
    #[serde(default = "default_global_limit")]
    pub global: usize,
    /// Cap for Arabic rows when stratifying by language.
    #[serde(default = "default_arabic_limit")]
    pub arabic: usize,
    /// Cap for English rows when stratifying by language.
    #[serde(default = "default_english_limit")]
    pub english: usize,
}

impl Default for SampleLimits {
    fn default() -> Self {
        Self {
            global: default_global_limit(),
            arabic: default_arabic_limit(),
            english: default_english_limit(),
        }
    }
}

fn default_global_limit() -> usize {
    1000
}

fn default_arabic_limit() -> usize {
    1000
}

fn default_english_limit() -> usize {
    500
}

/// A sampled (text, label) training set for one target column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingSet {
    /// Trimmed review texts.
    pub texts: Vec<String>,
    /// Trimmed ground-truth labels, parallel to `texts`.
    pub labels: Vec<String>,
}

impl TrainingSet {
    /// Number of sampled rows.
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    /// Whether the sample is empty.
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

/// Normalize a free-form language tag to `AR`, `EN`, or its uppercased self.
pub fn normalize_language(raw: &str) -> String {
    let upper = raw.trim().to_uppercase();
    match upper.as_str() {
        "AR" | "ARABIC" => "AR".to_string(),
        "EN" | "ENGLISH" => "EN".to_string(),
        _ => upper,
    }
}

/// Build the capped few-shot training set for one label column.
///
/// Rows missing text or label (after trimming) are dropped. The eligible
/// rows are shuffled once with `seed`; with a language column the result is
/// the first `limits.arabic` AR rows followed by the first `limits.english`
/// EN rows, in that concatenation order and without reshuffling.
pub fn build_training_set(
    table: &Table,
    text_col: usize,
    label_col: usize,
    lang_col: Option<usize>,
    limits: &SampleLimits,
    seed: u64,
) -> TrainingSet {
    struct Candidate {
        text: String,
        label: String,
        language: Option<String>,
    }

    let mut candidates = Vec::new();
    for row in 0..table.n_rows() {
        let Some(text) = trimmed_cell(table.cell(row, text_col)) else {
            continue;
        };
        let Some(label) = trimmed_cell(table.cell(row, label_col)) else {
            continue;
        };
        let language = lang_col
            .map(|col| normalize_language(&table.cell(row, col).to_display()));
        candidates.push(Candidate {
            text,
            label,
            language,
        });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    candidates.shuffle(&mut rng);

    let selected: Vec<Candidate> = if lang_col.is_some() {
        let mut arabic = Vec::new();
        let mut english = Vec::new();
        for candidate in candidates {
            match candidate.language.as_deref() {
                Some("AR") if arabic.len() < limits.arabic => arabic.push(candidate),
                Some("EN") if english.len() < limits.english => english.push(candidate),
                _ => {}
            }
        }
        arabic.extend(english);
        arabic
    } else {
        candidates.truncate(limits.global);
        candidates
    };

    let mut set = TrainingSet::default();
    for candidate in selected {
        set.texts.push(candidate.text);
        set.labels.push(candidate.label);
    }
    set
}

fn trimmed_cell(cell: &CellValue) -> Option<String> {
    match cell {
        CellValue::Empty => None,
        other => other.as_trimmed(),
    }
}
