//! Row normalization: positional cells to label-keyed records

use std::collections::HashMap;

use crate::header::HeaderMap;
use crate::sheet::{CellValue, RawRow};

/// One data row keyed by header label; absent cells are omitted
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NormalizedRow {
    cells: HashMap<String, CellValue>,
}

impl NormalizedRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>, value: CellValue) {
        self.cells.insert(label.into(), value);
    }

    pub fn get(&self, label: &str) -> Option<&CellValue> {
        self.cells.get(label)
    }

    /// Trimmed text of a cell, `None` when absent or blank
    pub fn text(&self, label: &str) -> Option<String> {
        self.get(label)
            .map(CellValue::trimmed)
            .filter(|s| !s.is_empty())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<L: Into<String>> FromIterator<(L, CellValue)> for NormalizedRow {
    fn from_iter<I: IntoIterator<Item = (L, CellValue)>>(iter: I) -> Self {
        let mut row = NormalizedRow::new();
        for (label, value) in iter {
            row.insert(label, value);
        }
        row
    }
}

/// Key every row after `header_row` by header label, dropping blank records
pub fn normalize_rows(rows: &[RawRow], header_row: usize, headers: &HeaderMap) -> Vec<NormalizedRow> {
    rows.iter()
        .skip(header_row + 1)
        .map(|row| normalize_row(row, headers))
        .filter(|record| !record.is_empty())
        .collect()
}

fn normalize_row(row: &[Option<CellValue>], headers: &HeaderMap) -> NormalizedRow {
    headers
        .iter()
        .filter_map(|(&index, label)| {
            let value = row.get(index)?.as_ref()?;
            Some((label.clone(), value.clone()))
        })
        .collect()
}
