//! Output workbook copy, cell filling and path derivation.
//!
//! The output file is a byte-copy of the input. Cells are mutated in memory
//! by (column, row) index and the workbook is serialized exactly once, so a
//! crash mid-run leaves at worst an unmodified copy on disk.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;
use umya_spreadsheet::{Spreadsheet, Worksheet};

use crate::table::columns::{
    SENTIMENT_OUT_CANDIDATES, SUBTHEME_OUT_CANDIDATES, THEME_OUT_CANDIDATES, resolve_column,
};
use crate::taxonomy::derive_theme;

/// Errors raised while copying, mutating, or saving the output workbook.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Copying the input file to the output path failed.
    #[error("Failed to copy input to {path}: {source}")]
    Copy {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The copied workbook could not be opened.
    #[error("Failed to open output workbook {path}: {cause:?}")]
    Open {
        /// Workbook path.
        path: PathBuf,
        /// Underlying spreadsheet error.
        cause: umya_spreadsheet::XlsxError,
    },
    /// The target worksheet is absent from the copy.
    #[error("Worksheet not found in output workbook: {name}")]
    MissingSheet {
        /// Sheet name that could not be resolved.
        name: String,
    },
    /// Saving the mutated workbook failed.
    #[error("Failed to save output workbook {path}: {cause:?}")]
    Save {
        /// Workbook path.
        path: PathBuf,
        /// Underlying spreadsheet error.
        cause: umya_spreadsheet::XlsxError,
    },
}

/// Per-column counters for cells filled during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillCounts {
    /// Theme cells written.
    pub theme: usize,
    /// Subtheme cells written.
    pub subtheme: usize,
    /// Sentiment cells written.
    pub sentiment: usize,
}

/// Row-aligned labels to write into the output workbook.
#[derive(Debug, Clone)]
pub struct RowLabels<'a> {
    /// Ground-truth subtheme per row, trimmed, `None` when absent.
    pub subtheme_gt: &'a [Option<String>],
    /// Ground-truth sentiment per row, trimmed, `None` when absent.
    pub sentiment_gt: &'a [Option<String>],
    /// Model subtheme prediction per row (possibly empty).
    pub subtheme_pred: &'a [String],
    /// Fallback-resolved sentiment per row (possibly empty).
    pub sentiment_pred: &'a [String],
}

fn arabic_english_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)(Arabic|English)").expect("stem regex must compile"))
}

/// Derive the output path from the input path.
///
/// The first case-insensitive occurrence of "Arabic" or "English" in the file
/// stem becomes `<match>_classification`; with no occurrence the suffix is
/// appended to the stem. A collision with the input path gains an extra
/// `_classified` suffix.
pub fn derive_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = input
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let parent = input.parent().unwrap_or_else(|| Path::new(""));

    let replaced = arabic_english_pattern()
        .replacen(&stem, 1, "${1}_classification")
        .into_owned();
    let new_stem = if replaced == stem {
        format!("{stem}_classification")
    } else {
        replaced
    };

    let candidate = parent.join(format!("{new_stem}{extension}"));
    if candidate == input {
        parent.join(format!("{new_stem}_classified{extension}"))
    } else {
        candidate
    }
}

/// Resolve an output header on the worksheet's first row.
///
/// Returns the 1-based column index, or `None` when the header is absent
/// (that output column is then skipped entirely).
pub fn pick_header_column(sheet: &Worksheet, candidates: &[&str]) -> Option<u32> {
    let width = sheet.get_highest_column();
    let headers: Vec<String> = (1..=width).map(|col| sheet.get_value((col, 1))).collect();
    resolve_column(candidates, &headers).map(|index| index as u32 + 1)
}

/// Copy the input workbook and fill empty label cells.
///
/// Only cells whose current trimmed value is empty are written; ground truth
/// always wins over predictions, and the theme is recomputed from the same
/// subtheme value used for that row. Processes at most
/// `min(table rows, sheet rows - 1)` rows to guard against a mismatched copy.
pub fn write_predictions(
    input: &Path,
    output: &Path,
    sheet: Option<&str>,
    table_rows: usize,
    labels: &RowLabels<'_>,
) -> Result<FillCounts, OutputError> {
    std::fs::copy(input, output).map_err(|source| OutputError::Copy {
        path: output.to_path_buf(),
        source,
    })?;

    let mut book =
        umya_spreadsheet::reader::xlsx::read(output).map_err(|cause| OutputError::Open {
            path: output.to_path_buf(),
            cause,
        })?;
    let worksheet = resolve_sheet(&mut book, sheet)?;
    let counts = fill_worksheet(worksheet, table_rows, labels);

    umya_spreadsheet::writer::xlsx::write(&book, output).map_err(|cause| OutputError::Save {
        path: output.to_path_buf(),
        cause,
    })?;
    Ok(counts)
}

fn resolve_sheet<'a>(
    book: &'a mut Spreadsheet,
    sheet: Option<&str>,
) -> Result<&'a mut Worksheet, OutputError> {
    match sheet {
        Some(name) => book
            .get_sheet_by_name_mut(name)
            .ok_or_else(|| OutputError::MissingSheet {
                name: name.to_string(),
            }),
        None => book.get_sheet_mut(&0).ok_or_else(|| OutputError::MissingSheet {
            name: "<first sheet>".to_string(),
        }),
    }
}

fn fill_worksheet(sheet: &mut Worksheet, table_rows: usize, labels: &RowLabels<'_>) -> FillCounts {
    let theme_col = pick_header_column(sheet, THEME_OUT_CANDIDATES);
    let subtheme_col = pick_header_column(sheet, SUBTHEME_OUT_CANDIDATES);
    let sentiment_col = pick_header_column(sheet, SENTIMENT_OUT_CANDIDATES);

    let sheet_rows = sheet.get_highest_row().saturating_sub(1) as usize;
    let n_rows = table_rows.min(sheet_rows);

    let mut counts = FillCounts::default();
    for index in 0..n_rows {
        let row = index as u32 + 2;

        if let Some(col) = subtheme_col {
            if cell_is_blank(sheet, col, row) {
                if let Some(gt) = labels.subtheme_gt[index].as_deref() {
                    sheet.get_cell_mut((col, row)).set_value(gt);
                    counts.subtheme += 1;
                } else {
                    let predicted = labels.subtheme_pred[index].trim();
                    if !predicted.is_empty() {
                        sheet.get_cell_mut((col, row)).set_value(predicted);
                        counts.subtheme += 1;
                    }
                }
            }
        }

        if let Some(col) = theme_col {
            if cell_is_blank(sheet, col, row) {
                let base_subtheme = labels.subtheme_gt[index]
                    .clone()
                    .unwrap_or_else(|| labels.subtheme_pred[index].trim().to_string());
                if let Some(theme) = derive_theme(&base_subtheme) {
                    sheet.get_cell_mut((col, row)).set_value(theme);
                    counts.theme += 1;
                }
            }
        }

        if let Some(col) = sentiment_col {
            if cell_is_blank(sheet, col, row) {
                if let Some(gt) = labels.sentiment_gt[index].as_deref() {
                    sheet.get_cell_mut((col, row)).set_value(gt);
                    counts.sentiment += 1;
                } else {
                    let predicted = labels.sentiment_pred[index].trim();
                    if !predicted.is_empty() {
                        sheet.get_cell_mut((col, row)).set_value(predicted);
                        counts.sentiment += 1;
                    }
                }
            }
        }
    }
    counts
}

fn cell_is_blank(sheet: &Worksheet, col: u32, row: u32) -> bool {
    sheet.get_value((col, row)).trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_language_marker_in_stem() {
        let out = derive_output_path(Path::new("/data/Reviews_Arabic_v2.xlsx"));
        assert_eq!(
            out,
            PathBuf::from("/data/Reviews_Arabic_classification_v2.xlsx")
        );
    }

    #[test]
    fn marker_match_is_case_insensitive_and_first_only() {
        let out = derive_output_path(Path::new("english_and_Arabic.xlsx"));
        assert_eq!(out, PathBuf::from("english_classification_and_Arabic.xlsx"));
    }

    #[test]
    fn appends_suffix_when_no_marker() {
        let out = derive_output_path(Path::new("/tmp/reviews.xlsx"));
        assert_eq!(out, PathBuf::from("/tmp/reviews_classification.xlsx"));
    }

    #[test]
    fn picks_emoji_headers_on_the_output_sheet() {
        let mut book = umya_spreadsheet::new_file();
        let sheet = book.get_sheet_mut(&0).unwrap();
        sheet.get_cell_mut((1, 1)).set_value("Content");
        sheet.get_cell_mut((2, 1)).set_value("🎯 Theme");
        sheet.get_cell_mut((3, 1)).set_value("🧩 Subtheme");
        sheet.get_cell_mut((4, 1)).set_value("😊 Sentiment");
        let sheet = book.get_sheet(&0).unwrap();
        assert_eq!(pick_header_column(sheet, THEME_OUT_CANDIDATES), Some(2));
        assert_eq!(pick_header_column(sheet, SUBTHEME_OUT_CANDIDATES), Some(3));
        assert_eq!(pick_header_column(sheet, SENTIMENT_OUT_CANDIDATES), Some(4));
        assert_eq!(pick_header_column(sheet, &["Rating"]), None);
    }

    #[test]
    fn fills_only_blank_cells_and_prefers_ground_truth() {
        let mut book = umya_spreadsheet::new_file();
        let sheet = book.get_sheet_mut(&0).unwrap();
        sheet.get_cell_mut((1, 1)).set_value("Theme");
        sheet.get_cell_mut((2, 1)).set_value("Subtheme");
        sheet.get_cell_mut((3, 1)).set_value("Sentiment");
        // Row 2 has a pre-filled sentiment that must survive.
        sheet.get_cell_mut((3, 2)).set_value("Neutral");
        sheet.get_cell_mut((1, 3)).set_value("");
        sheet.get_cell_mut((3, 4)).set_value("");

        let subtheme_gt = vec![None, Some("Login / OTP".to_string()), None];
        let sentiment_gt = vec![None, None, None];
        let subtheme_pred = vec![
            "App Speed".to_string(),
            "Navigation".to_string(),
            String::new(),
        ];
        let sentiment_pred = vec![
            "Positive".to_string(),
            "Negative".to_string(),
            String::new(),
        ];
        let labels = RowLabels {
            subtheme_gt: &subtheme_gt,
            sentiment_gt: &sentiment_gt,
            subtheme_pred: &subtheme_pred,
            sentiment_pred: &sentiment_pred,
        };

        let sheet = book.get_sheet_mut(&0).unwrap();
        let counts = fill_worksheet(sheet, 3, &labels);

        let sheet = book.get_sheet(&0).unwrap();
        // Row 2: prediction everywhere, pre-filled sentiment untouched.
        assert_eq!(sheet.get_value((2, 2)), "App Speed");
        assert_eq!(sheet.get_value((1, 2)), "Technical Performance");
        assert_eq!(sheet.get_value((3, 2)), "Neutral");
        // Row 3: ground truth beats the prediction, theme follows the GT.
        assert_eq!(sheet.get_value((2, 3)), "Login / OTP");
        assert_eq!(sheet.get_value((1, 3)), "Security & Support");
        assert_eq!(sheet.get_value((3, 3)), "Negative");
        // Row 4: empty prediction leaves the cells empty.
        assert_eq!(sheet.get_value((2, 4)), "");
        assert_eq!(sheet.get_value((1, 4)), "");
        assert_eq!(sheet.get_value((3, 4)), "");

        assert_eq!(
            counts,
            FillCounts {
                theme: 2,
                subtheme: 2,
                sentiment: 1
            }
        );
    }
}
