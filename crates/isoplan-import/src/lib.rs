//! # isoplan-import
//!
//! Reconstructs Phase → SubPhase → Task project plans from ISO-style
//! implementation checklists authored in spreadsheets.
//!
//! The source files carry no schema. This crate:
//! - decodes the first sheet of an xlsx/xls/xlsb/ods buffer
//! - finds the header row by keyword scoring
//! - maps column roles (id, task, status, owner, description) onto whatever
//!   labels the author used
//! - classifies dotted hierarchy numbers and assembles the tree,
//!   synthesizing missing ancestors
//! - resolves owners against a consultant directory and hands the tree to
//!   a transactional writer
//!
//! ## Example
//!
//! ```rust,no_run
//! use isoplan_import::parse;
//!
//! let buffer = std::fs::read("checklist.xlsx").unwrap();
//! let plan = parse(&buffer).unwrap();
//! for phase in &plan.phases {
//!     println!("{} ({} sub-phases)", phase.title, phase.sub_phases.len());
//! }
//! ```

pub mod assignee;
pub mod columns;
pub mod config;
pub mod header;
pub mod hierarchy;
pub mod importer;
pub mod rows;
pub mod sheet;

pub use assignee::{resolve_assignees, AssigneeReport};
pub use columns::{resolve_column, resolve_columns, ColumnMap, ColumnPatterns};
pub use config::ImportConfig;
pub use header::{detect_header, ExplicitLayout, HeaderMap, KeywordLayout, LayoutStrategy, SheetLayout};
pub use hierarchy::{build_hierarchy, HierarchyId};
pub use importer::{ImportSummary, PlanImporter};
pub use rows::{normalize_rows, NormalizedRow};
pub use sheet::{load_first_sheet, CellValue, RawRow};

use isoplan_core::{PersistenceError, ProjectPlan};
use thiserror::Error;

/// Import error
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Unreadable workbook: {0}")]
    Workbook(String),

    #[error("Workbook contains no sheets")]
    NoSheets,

    #[error("Sheet contains no usable rows")]
    EmptySheet,

    #[error("No header row found")]
    NoHeader,

    #[error("Failed to save imported plan: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Parse a workbook buffer with the default configuration
pub fn parse(buffer: &[u8]) -> Result<ProjectPlan, ImportError> {
    PlanImporter::default().parse(buffer)
}
