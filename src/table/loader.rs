//! Input workbook validation and loading.
//!
//! The input file is checked before any processing starts: it must exist and
//! must be an archive-backed spreadsheet (xlsx files are ZIP containers).
//! Both checks are fatal; everything after loading degrades instead.

use std::fs::File;
use std::path::{Path, PathBuf};

use calamine::{Data, Reader, open_workbook_auto};
use thiserror::Error;

use super::{CellValue, Table};

/// Errors raised while validating or loading the input workbook.
#[derive(Debug, Error)]
pub enum InputError {
    /// The input file does not exist.
    #[error("Input file not found: {path}")]
    Missing {
        /// Path that was checked.
        path: PathBuf,
    },
    /// The file exists but is not a ZIP-backed spreadsheet.
    #[error("Input file is not a valid spreadsheet archive: {path}")]
    NotASpreadsheet {
        /// Path that failed the archive check.
        path: PathBuf,
    },
    /// The file could not be opened for reading.
    #[error("Failed to open input file {path}: {source}")]
    Open {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The spreadsheet library rejected the workbook.
    #[error("Failed to read workbook {path}: {source}")]
    Workbook {
        /// Path of the offending workbook.
        path: PathBuf,
        /// Underlying reader error.
        source: calamine::Error,
    },
    /// The requested worksheet is absent (or the workbook has none).
    #[error("Worksheet not found: {name}")]
    MissingSheet {
        /// Sheet name that could not be resolved.
        name: String,
    },
}

/// Fail fast if the input path is missing or not an archive-backed file.
pub fn validate_input(path: &Path) -> Result<(), InputError> {
    if !path.exists() {
        return Err(InputError::Missing {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path).map_err(|source| InputError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    if zip::ZipArchive::new(file).is_err() {
        return Err(InputError::NotASpreadsheet {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Load one worksheet into an in-memory [`Table`].
///
/// The first sheet is used unless `sheet` names another one. The first row
/// becomes the header list; all remaining rows become data.
pub fn load_table(path: &Path, sheet: Option<&str>) -> Result<Table, InputError> {
    let mut workbook = open_workbook_auto(path).map_err(|source| InputError::Workbook {
        path: path.to_path_buf(),
        source,
    })?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| InputError::MissingSheet {
                name: "<first sheet>".to_string(),
            })?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|_| InputError::MissingSheet {
            name: sheet_name.clone(),
        })?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(cell_to_display).collect())
        .unwrap_or_default();

    let mut columns: Vec<Vec<CellValue>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for (index, column) in columns.iter_mut().enumerate() {
            let cell = row.get(index).map(convert_cell).unwrap_or(CellValue::Empty);
            column.push(cell);
        }
    }

    Ok(Table::new(headers, columns))
}

fn convert_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(text) => CellValue::Text(text.clone()),
        Data::Float(value) => CellValue::Number(*value),
        Data::Int(value) => CellValue::Number(*value as f64),
        Data::Bool(value) => CellValue::Bool(*value),
        Data::DateTime(value) => CellValue::Number(value.as_f64()),
        Data::DateTimeIso(text) | Data::DurationIso(text) => CellValue::Text(text.clone()),
    }
}

fn cell_to_display(data: &Data) -> String {
    convert_cell(data).to_display()
}
