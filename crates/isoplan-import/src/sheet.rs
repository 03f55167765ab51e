//! Spreadsheet decoding
//!
//! Turns a workbook buffer (xlsx, xls, xlsb, ods) into a row-major grid of
//! nullable cell values. Only the first sheet is read.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};

use crate::ImportError;

/// A non-empty cell value
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// Text of the value with surrounding whitespace removed
    pub fn trimmed(&self) -> String {
        self.to_string().trim().to_string()
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            // Integral numbers print without decimals so "1" stays "1"
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

/// Cells of one sheet row by column index
pub type RawRow = Vec<Option<CellValue>>;

/// Decode the first sheet of a workbook held in memory
pub fn load_first_sheet(buffer: &[u8]) -> Result<Vec<RawRow>, ImportError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(buffer))
        .map_err(|e| ImportError::Workbook(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ImportError::NoSheets)?
        .map_err(|e| ImportError::Workbook(e.to_string()))?;

    let rows = rows_from_range(&range);
    tracing::debug!(rows = rows.len(), "decoded first sheet");
    Ok(rows)
}

/// Convert a calamine range into raw rows
///
/// A range begins at its first used cell, so blank leading rows are padded
/// back in and row indices match the sheet.
pub(crate) fn rows_from_range(range: &Range<Data>) -> Vec<RawRow> {
    let leading = range.start().map_or(0, |(row, _)| row as usize);
    std::iter::repeat_with(RawRow::new)
        .take(leading)
        .chain(
            range
                .rows()
                .map(|row| row.iter().map(convert_cell).collect()),
        )
        .collect()
}

fn convert_cell(cell: &Data) -> Option<CellValue> {
    match cell {
        Data::Empty => None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            if s.trim().is_empty() {
                None
            } else {
                Some(CellValue::Text(s.clone()))
            }
        }
        Data::Float(n) => Some(CellValue::Number(*n)),
        Data::Int(n) => Some(CellValue::Number(*n as f64)),
        Data::Bool(b) => Some(CellValue::Bool(*b)),
        Data::DateTime(dt) => Some(CellValue::Number(dt.as_f64())),
        // Formula errors carry no usable text
        Data::Error(_) => None,
    }
}

/// True when every cell of the row is absent
pub fn is_blank(row: &[Option<CellValue>]) -> bool {
    row.iter().all(Option::is_none)
}
