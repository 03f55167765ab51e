//! End-to-end import pipeline
//!
//! ```text
//! buffer ─▶ load_first_sheet ─▶ LayoutStrategy ─▶ normalize_rows ─▶ build_hierarchy
//!                                                                        │
//!          PlanWriter ◀─ attach_project ◀─ resolve_assignees ◀───────────┘
//! ```
//!
//! Everything runs synchronously on the caller's thread. Each call builds a
//! fresh tree; nothing is cached between imports.

use isoplan_core::{ConsultantDirectory, ImportStats, PlanCounts, PlanWriter, ProjectPlan};
use serde::Serialize;

use crate::assignee::{resolve_assignees, AssigneeReport};
use crate::config::ImportConfig;
use crate::header::{KeywordLayout, LayoutStrategy};
use crate::hierarchy::build_hierarchy;
use crate::rows::normalize_rows;
use crate::sheet::{is_blank, load_first_sheet, RawRow};
use crate::ImportError;

/// Result of a committed import
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub project_id: String,
    /// Nodes created by the writer
    pub created: PlanCounts,
    pub stats: ImportStats,
    pub assignees: AssigneeReport,
}

/// Configurable importer
pub struct PlanImporter {
    config: ImportConfig,
    layout: Box<dyn LayoutStrategy>,
}

impl Default for PlanImporter {
    fn default() -> Self {
        Self {
            config: ImportConfig::default(),
            layout: Box::new(KeywordLayout),
        }
    }
}

impl std::fmt::Debug for PlanImporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanImporter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PlanImporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: ImportConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace header detection, e.g. with an [`ExplicitLayout`](crate::ExplicitLayout)
    pub fn layout(mut self, layout: impl LayoutStrategy + 'static) -> Self {
        self.layout = Box::new(layout);
        self
    }

    /// Decode a workbook and reconstruct its plan
    pub fn parse(&self, buffer: &[u8]) -> Result<ProjectPlan, ImportError> {
        let rows = load_first_sheet(buffer)?;
        self.parse_rows(&rows)
    }

    /// Reconstruct a plan from an already decoded grid
    pub fn parse_rows(&self, rows: &[RawRow]) -> Result<ProjectPlan, ImportError> {
        if rows.iter().all(|r| is_blank(r)) {
            return Err(ImportError::EmptySheet);
        }

        let layout = self.layout.layout(rows, &self.config)?;
        let records = normalize_rows(rows, layout.header_row, &layout.headers);
        let mut plan = build_hierarchy(&records, &layout.columns);
        plan.stats.header_row = layout.header_row;
        Ok(plan)
    }

    /// Parse, resolve owners and hand the tree to the writer in one go
    ///
    /// The writer is all-or-nothing; its failure surfaces as
    /// [`ImportError::Persistence`].
    pub fn import(
        &self,
        buffer: &[u8],
        project_id: &str,
        directory: &dyn ConsultantDirectory,
        writer: &mut dyn PlanWriter,
    ) -> Result<ImportSummary, ImportError> {
        let mut plan = self.parse(buffer)?;
        let assignees = resolve_assignees(&mut plan, directory);
        plan.attach_project(project_id);

        let created = writer.create_project_plan(project_id, &plan.phases)?;
        tracing::info!(
            project_id,
            %created,
            skipped = plan.stats.rows_skipped,
            dropped = plan.stats.rows_dropped,
            unresolved_assignees = assignees.unresolved,
            "project plan imported"
        );

        Ok(ImportSummary {
            project_id: project_id.to_string(),
            created,
            stats: plan.stats,
            assignees,
        })
    }
}
