//! Spreadsheet input: read one worksheet into header-keyed rows.
//!
//! The first non-empty row of the sheet is the header; every following row
//! becomes a [`SheetRow`] mapping header text to the raw [`CellValue`].
//! Rows where every cell is blank are dropped here so they never reach the
//! normalizer as nameless cards.

use crate::error::CardgenError;
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// A raw cell value, before string normalisation.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Blank or missing cell.
    Empty,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl From<&Data> for CellValue {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty | Data::Error(_) => CellValue::Empty,
            Data::Int(i) => CellValue::Int(*i),
            Data::Float(f) => CellValue::Float(*f),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::String(s) => CellValue::Text(s.clone()),
            other => CellValue::Text(other.to_string()),
        }
    }
}

/// One data row of the sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetRow {
    /// 1-based row number as shown by a spreadsheet editor.
    pub number: usize,
    cells: HashMap<String, CellValue>,
}

impl SheetRow {
    pub fn new(number: usize) -> Self {
        Self {
            number,
            cells: HashMap::new(),
        }
    }

    /// Builder-style insert, mainly for tests and programmatic sheets.
    pub fn with(mut self, column: impl Into<String>, value: CellValue) -> Self {
        self.cells.insert(column.into(), value);
        self
    }

    /// The cell under `column`, or `None` if the sheet has no such column.
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.cells.contains_key(column)
    }

    /// True when no cell holds a value.
    pub fn is_blank(&self) -> bool {
        self.cells.values().all(|v| *v == CellValue::Empty)
    }
}

/// Load every data row of `sheet` in `path`.
///
/// `.xlsx`, `.xlsm`, `.xls` and `.ods` are recognised by extension.
pub fn load_rows(path: &Path, sheet: &str) -> Result<Vec<SheetRow>, CardgenError> {
    if !path.exists() {
        return Err(CardgenError::SourceNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut workbook = open_workbook_auto(path).map_err(|e| CardgenError::Spreadsheet {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    let names = workbook.sheet_names();
    if !names.iter().any(|n| n == sheet) {
        return Err(CardgenError::SheetNotFound {
            sheet: sheet.to_string(),
            path: path.to_path_buf(),
            available: names.join(", "),
        });
    }

    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| CardgenError::Spreadsheet {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;

    let rows = rows_from_range(&range);
    info!(
        "Loaded {} rows from sheet '{}' of {}",
        rows.len(),
        sheet,
        path.display()
    );
    Ok(rows)
}

/// Split a cell range into header-keyed rows.
pub fn rows_from_range(range: &Range<Data>) -> Vec<SheetRow> {
    let first_row = range.start().map(|(r, _)| r as usize).unwrap_or(0);
    let mut rows = range.rows();

    let Some(header) = rows.next() else {
        return Vec::new();
    };
    let header: Vec<String> = header.iter().map(header_text).collect();

    let mut out = Vec::new();
    // +1 for 1-based numbering, +1 for the header
    for (offset, cells) in rows.enumerate() {
        let mut row = SheetRow::new(first_row + offset + 2);
        for (column, data) in header.iter().zip(cells) {
            if column.is_empty() || row.has_column(column) {
                continue;
            }
            row.cells.insert(column.clone(), CellValue::from(data));
        }
        if row.is_blank() {
            debug!("Skipping blank row {}", row.number);
            continue;
        }
        out.push(row);
    }
    out
}

fn header_text(data: &Data) -> String {
    match data {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_range() -> Range<Data> {
        let mut range = Range::new((0, 0), (3, 2));
        range.set_value((0, 0), Data::String("Name".into()));
        range.set_value((0, 1), Data::String("B".into()));
        range.set_value((0, 2), Data::String("Template".into()));
        range.set_value((1, 0), Data::String("Wolf".into()));
        range.set_value((1, 1), Data::Float(2.0));
        range.set_value((1, 2), Data::String("light".into()));
        // row 2 left blank
        range.set_value((3, 0), Data::String("Owl".into()));
        range.set_value((3, 2), Data::String("dark".into()));
        range
    }

    #[test]
    fn header_keys_rows() {
        let rows = rows_from_range(&sample_range());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].number, 2);
        assert_eq!(rows[0].get("Name"), Some(&CellValue::Text("Wolf".into())));
        assert_eq!(rows[0].get("B"), Some(&CellValue::Float(2.0)));
        assert_eq!(rows[0].get("Missing"), None);
    }

    #[test]
    fn blank_rows_are_skipped() {
        let rows = rows_from_range(&sample_range());
        assert_eq!(rows[1].number, 4);
        assert_eq!(rows[1].get("B"), Some(&CellValue::Empty));
    }

    #[test]
    fn empty_range_has_no_rows() {
        let range: Range<Data> = Range::empty();
        assert!(rows_from_range(&range).is_empty());
    }

    #[test]
    fn cell_value_from_data() {
        assert_eq!(CellValue::from(&Data::Empty), CellValue::Empty);
        assert_eq!(CellValue::from(&Data::Int(3)), CellValue::Int(3));
        assert_eq!(CellValue::from(&Data::Bool(true)), CellValue::Bool(true));
        assert_eq!(
            CellValue::from(&Data::String("x".into())),
            CellValue::Text("x".into())
        );
    }

    #[test]
    fn missing_source_is_reported() {
        let err = load_rows(Path::new("/definitely/not/here.xlsx"), "Creatures").unwrap_err();
        assert!(matches!(err, CardgenError::SourceNotFound { .. }));
    }
}
