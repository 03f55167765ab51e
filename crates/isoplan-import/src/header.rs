//! Header row detection and sheet layout
//!
//! Real checklists rarely start with their header: a title block, a revision
//! table or a logo row usually come first. [`detect_header`] scores the first
//! rows and keeps the densest one that mentions a header keyword.
//!
//! Detection is one implementation of [`LayoutStrategy`]. Callers who already
//! know the layout use [`ExplicitLayout`] and skip the heuristics entirely.

use std::collections::BTreeMap;

use crate::columns::{resolve_columns, ColumnMap};
use crate::config::ImportConfig;
use crate::sheet::{CellValue, RawRow};
use crate::ImportError;

/// Column index → trimmed header label
pub type HeaderMap = BTreeMap<usize, String>;

/// Outcome of header detection
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderDetection {
    /// Index of the chosen row
    pub row: usize,
    /// Score of the chosen row (0 when falling back to row 0)
    pub score: usize,
    pub headers: HeaderMap,
}

/// Pick the header row among the first `scan_rows` rows
///
/// A row scores its number of non-empty cells when its lower-cased text
/// contains any keyword, otherwise 0. The highest score wins and ties go to
/// the earlier row. Without any positive score, row 0 is used.
pub fn detect_header<S: AsRef<str>>(
    rows: &[RawRow],
    scan_rows: usize,
    keywords: &[S],
) -> HeaderDetection {
    let keywords: Vec<String> = keywords
        .iter()
        .map(|k| k.as_ref().to_lowercase())
        .collect();

    let mut best_row = 0;
    let mut best_score = 0;
    for (index, row) in rows.iter().take(scan_rows).enumerate() {
        let score = score_row(row, &keywords);
        if score > best_score {
            best_row = index;
            best_score = score;
        }
    }

    if best_score == 0 {
        tracing::warn!("no header keywords found, falling back to row 0");
    }

    let headers = rows.get(best_row).map(|r| header_map(r)).unwrap_or_default();
    tracing::debug!(row = best_row, score = best_score, columns = headers.len(), "header detected");

    HeaderDetection {
        row: best_row,
        score: best_score,
        headers,
    }
}

fn score_row(row: &[Option<CellValue>], keywords: &[String]) -> usize {
    let cells: Vec<String> = row.iter().flatten().map(|c| c.to_string()).collect();
    let text = cells.join(" ").to_lowercase();
    if keywords.iter().any(|k| text.contains(k.as_str())) {
        cells.len()
    } else {
        0
    }
}

/// Build the header map from the non-empty, trimmed cells of a row
pub fn header_map(row: &[Option<CellValue>]) -> HeaderMap {
    row.iter()
        .enumerate()
        .filter_map(|(index, cell)| {
            let label = cell.as_ref()?.trimmed();
            (!label.is_empty()).then_some((index, label))
        })
        .collect()
}

// ============================================================================
// Layout strategies
// ============================================================================

/// Where the header sits and which labels play which role
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetLayout {
    pub header_row: usize,
    pub headers: HeaderMap,
    pub columns: ColumnMap,
}

impl SheetLayout {
    /// Header labels in column order
    pub fn labels(&self) -> Vec<String> {
        self.headers.values().cloned().collect()
    }
}

/// Decides the header row and column roles of a decoded sheet
pub trait LayoutStrategy {
    fn layout(&self, rows: &[RawRow], config: &ImportConfig) -> Result<SheetLayout, ImportError>;
}

/// Keyword-scored header detection followed by tiered column resolution
#[derive(Clone, Copy, Debug, Default)]
pub struct KeywordLayout;

impl LayoutStrategy for KeywordLayout {
    fn layout(&self, rows: &[RawRow], config: &ImportConfig) -> Result<SheetLayout, ImportError> {
        let detection = detect_header(rows, config.header_scan_rows, &config.header_keywords);
        if detection.headers.is_empty() {
            return Err(ImportError::NoHeader);
        }
        let labels: Vec<String> = detection.headers.values().cloned().collect();
        let columns = resolve_columns(&labels, &config.columns);
        Ok(SheetLayout {
            header_row: detection.row,
            headers: detection.headers,
            columns,
        })
    }
}

/// Caller-supplied header row and column labels; no heuristics involved
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExplicitLayout {
    pub header_row: usize,
    pub columns: ColumnMap,
}

impl ExplicitLayout {
    pub fn new(header_row: usize, columns: ColumnMap) -> Self {
        Self {
            header_row,
            columns,
        }
    }
}

impl LayoutStrategy for ExplicitLayout {
    fn layout(&self, rows: &[RawRow], _config: &ImportConfig) -> Result<SheetLayout, ImportError> {
        let row = rows.get(self.header_row).ok_or(ImportError::NoHeader)?;
        let headers = header_map(row);
        if headers.is_empty() {
            return Err(ImportError::NoHeader);
        }
        Ok(SheetLayout {
            header_row: self.header_row,
            headers,
            columns: self.columns.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(cells: &[&str]) -> RawRow {
        cells
            .iter()
            .map(|c| {
                if c.is_empty() {
                    None
                } else {
                    Some(CellValue::from(*c))
                }
            })
            .collect()
    }

    const KEYWORDS: [&str; 4] = ["task", "activity", "status", "ownership"];

    #[test]
    fn finds_header_below_title_block() {
        let rows = vec![
            row(&["ISO 27001 Implementation Plan"]),
            row(&["Prepared for ACME", "", "Rev 3"]),
            row(&["S.No", "Activity", "Ownership", "Status"]),
            row(&["1", "Planning", "", ""]),
        ];
        let found = detect_header(&rows, 10, &KEYWORDS);
        assert_eq!(found.row, 2);
        assert_eq!(found.score, 4);
        assert_eq!(found.headers.get(&1).map(String::as_str), Some("Activity"));
    }

    #[test]
    fn denser_row_wins() {
        let rows = vec![
            row(&["Task list"]),
            row(&["ID", "Task", "Status", "Owner", "Notes"]),
        ];
        assert_eq!(detect_header(&rows, 10, &KEYWORDS).row, 1);
    }

    #[test]
    fn first_row_wins_ties() {
        let rows = vec![row(&["ID", "Task"]), row(&["No", "Status"])];
        assert_eq!(detect_header(&rows, 10, &KEYWORDS).row, 0);
    }

    #[test]
    fn falls_back_to_row_zero() {
        let rows = vec![row(&["Alpha", "Beta"]), row(&["1", "x"])];
        let found = detect_header(&rows, 10, &KEYWORDS);
        assert_eq!(found.row, 0);
        assert_eq!(found.score, 0);
        assert_eq!(found.headers.len(), 2);
    }

    #[test]
    fn only_scans_configured_rows() {
        let rows = vec![row(&["title"]), row(&["x"]), row(&["ID", "Task", "Status"])];
        assert_eq!(detect_header(&rows, 2, &KEYWORDS).row, 0);
    }

    #[test]
    fn header_map_trims_and_skips_blanks() {
        let map = header_map(&row(&["  ID ", "", "Task"]));
        assert_eq!(map.len(), 2);
        assert_eq!(map[&0], "ID");
        assert_eq!(map[&2], "Task");
    }

    #[test]
    fn keyword_layout_resolves_columns() {
        let rows = vec![
            row(&["Plan"]),
            row(&["No.", "Task", "Responsible", "Status"]),
        ];
        let layout = KeywordLayout.layout(&rows, &ImportConfig::default()).unwrap();
        assert_eq!(layout.header_row, 1);
        assert_eq!(layout.columns.hierarchy_id, "No.");
        assert_eq!(layout.columns.assignee, "Responsible");
        assert_eq!(layout.labels(), vec!["No.", "Task", "Responsible", "Status"]);
    }

    #[test]
    fn keyword_layout_without_headers_fails() {
        let rows = vec![vec![None, None]];
        let err = KeywordLayout.layout(&rows, &ImportConfig::default()).unwrap_err();
        assert!(matches!(err, ImportError::NoHeader));
    }

    #[test]
    fn explicit_layout_bypasses_detection() {
        let rows = vec![
            row(&["Task", "Status"]),
            row(&["Ref", "What", "Who"]),
        ];
        let columns = ColumnMap {
            hierarchy_id: "Ref".into(),
            task_name: "What".into(),
            assignee: "Who".into(),
            ..ColumnMap::default()
        };
        let layout = ExplicitLayout::new(1, columns.clone())
            .layout(&rows, &ImportConfig::default())
            .unwrap();
        assert_eq!(layout.header_row, 1);
        assert_eq!(layout.columns, columns);
    }

    #[test]
    fn explicit_layout_out_of_range() {
        let rows = vec![row(&["Task"])];
        let err = ExplicitLayout::new(5, ColumnMap::default())
            .layout(&rows, &ImportConfig::default())
            .unwrap_err();
        assert!(matches!(err, ImportError::NoHeader));
    }
}
