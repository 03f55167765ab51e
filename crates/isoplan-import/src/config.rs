//! Importer configuration
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration:
//!
//! ```toml
//! header_scan_rows = 15
//! header_keywords = ["task", "activity", "status", "ownership", "clause"]
//!
//! [columns]
//! assignee = ["Owner", "Responsible"]
//! ```

use serde::{Deserialize, Serialize};

use crate::columns::ColumnPatterns;

/// Rows inspected when looking for the header row
pub const DEFAULT_HEADER_SCAN_ROWS: usize = 10;

/// Words that mark a header row
pub const DEFAULT_HEADER_KEYWORDS: [&str; 4] = ["task", "activity", "status", "ownership"];

/// Tunables of the heuristic parts of the importer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Only the first `header_scan_rows` rows may be the header row
    pub header_scan_rows: usize,
    /// Lower-case keywords; a row containing any of them is a header candidate
    pub header_keywords: Vec<String>,
    /// Candidate header labels per column role
    pub columns: ColumnPatterns,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            header_scan_rows: DEFAULT_HEADER_SCAN_ROWS,
            header_keywords: DEFAULT_HEADER_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            columns: ColumnPatterns::default(),
        }
    }
}

impl ImportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header_scan_rows(mut self, rows: usize) -> Self {
        self.header_scan_rows = rows;
        self
    }

    pub fn header_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.header_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn columns(mut self, columns: ColumnPatterns) -> Self {
        self.columns = columns;
        self
    }
}
