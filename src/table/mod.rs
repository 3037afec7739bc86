//! In-memory review table and column resolution.
//!
//! The input worksheet is loaded once into a column-major grid of opaque
//! cell values. Every cell is viewed uniformly as an optional string plus an
//! optional numeric coercion; nothing downstream touches the file again.

pub mod columns;
pub mod loader;

pub use columns::resolve_column;
pub use loader::{InputError, load_table, validate_input};

/// A single spreadsheet cell, decoupled from the file format.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Blank or error cell.
    Empty,
    /// Textual content.
    Text(String),
    /// Numeric content (floats, integers and date serials).
    Number(f64),
    /// Boolean content.
    Bool(bool),
}

impl CellValue {
    /// Render the cell as display text; empty cells render as `""`.
    pub fn to_display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(text) => text.clone(),
            CellValue::Number(value) => {
                if value.fract() == 0.0 && value.abs() < 1e15 {
                    format!("{}", *value as i64)
                } else {
                    format!("{value}")
                }
            }
            CellValue::Bool(value) => {
                if *value {
                    "TRUE".to_string()
                } else {
                    "FALSE".to_string()
                }
            }
        }
    }

    /// Trimmed text view, `None` when the trimmed content is empty.
    pub fn as_trimmed(&self) -> Option<String> {
        let text = self.to_display();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Numeric coercion: numbers pass through, numeric strings parse,
    /// everything else is `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(value) => Some(*value),
            CellValue::Text(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        }
    }
}

/// Column-major table loaded from the input worksheet.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    columns: Vec<Vec<CellValue>>,
    n_rows: usize,
}

impl Table {
    /// Build a table from a header row and column-major cell data.
    ///
    /// Columns shorter than the longest one are padded with empty cells so
    /// row indexing stays uniform.
    pub fn new(headers: Vec<String>, mut columns: Vec<Vec<CellValue>>) -> Self {
        while columns.len() < headers.len() {
            columns.push(Vec::new());
        }
        let n_rows = columns.iter().map(Vec::len).max().unwrap_or(0);
        for column in &mut columns {
            column.resize(n_rows, CellValue::Empty);
        }
        Self {
            headers,
            columns,
            n_rows,
        }
    }

    /// Header strings in worksheet order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows (headers excluded).
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// All cells of one column.
    pub fn column(&self, index: usize) -> &[CellValue] {
        &self.columns[index]
    }

    /// One cell by (row, column) index.
    pub fn cell(&self, row: usize, column: usize) -> &CellValue {
        &self.columns[column][row]
    }

    /// Resolve a logical column against this table's headers.
    pub fn resolve(&self, candidates: &[&str]) -> Option<usize> {
        resolve_column(candidates, &self.headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_numbers_display_without_decimals() {
        assert_eq!(CellValue::Number(5.0).to_display(), "5");
        assert_eq!(CellValue::Number(4.5).to_display(), "4.5");
    }

    #[test]
    fn numeric_strings_coerce_to_numbers() {
        assert_eq!(CellValue::Text(" 4 ".into()).as_number(), Some(4.0));
        assert_eq!(CellValue::Text("4.5".into()).as_number(), Some(4.5));
        assert_eq!(CellValue::Text("five".into()).as_number(), None);
        assert_eq!(CellValue::Empty.as_number(), None);
    }

    #[test]
    fn short_columns_are_padded() {
        let table = Table::new(
            vec!["a".into(), "b".into()],
            vec![
                vec![CellValue::Text("x".into()), CellValue::Text("y".into())],
                vec![CellValue::Number(1.0)],
            ],
        );
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.cell(1, 1), &CellValue::Empty);
    }
}
