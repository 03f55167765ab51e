//! Plain-text and JSON rendering of import results

use std::fmt::Write as _;

use clap::ValueEnum;
use isoplan_core::{ImportStats, Phase, ProjectPlan};
use isoplan_import::ImportSummary;
use serde::Serialize;

/// Output format for both subcommands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Indented outline of a plan; synthesized nodes are marked with `*`
pub fn render_tree(phases: &[Phase]) -> String {
    let mut out = String::new();
    for phase in phases {
        let _ = writeln!(out, "{}{}", phase.title, marker(phase.synthesized));
        for sub in &phase.sub_phases {
            let _ = writeln!(out, "  {}{}", sub.title, marker(sub.synthesized));
            for task in &sub.tasks {
                let _ = write!(
                    out,
                    "    - [{}/{}] {} {}",
                    task.status, task.priority, task.number, task.title
                );
                if let Some(owner) = &task.assignee_name_raw {
                    match &task.resolved_assignee_id {
                        Some(id) => {
                            let _ = write!(out, " ({owner} -> {id})");
                        }
                        None => {
                            let _ = write!(out, " ({owner})");
                        }
                    }
                }
                out.push('\n');
            }
        }
    }
    out
}

fn marker(synthesized: bool) -> &'static str {
    if synthesized {
        " *"
    } else {
        ""
    }
}

fn render_stats(stats: &ImportStats) -> String {
    format!(
        "Header row: {}\nRows: {} scanned, {} skipped, {} dropped\nSynthesized: {} phases, {} sub-phases\n",
        stats.header_row + 1,
        stats.rows_scanned,
        stats.rows_skipped,
        stats.rows_dropped,
        stats.phases_synthesized,
        stats.sub_phases_synthesized,
    )
}

/// Text report for `isoplan parse`
pub fn render_plan(plan: &ProjectPlan) -> String {
    let mut out = render_tree(&plan.phases);
    out.push('\n');
    let _ = writeln!(out, "Plan: {}", plan.counts());
    out.push_str(&render_stats(&plan.stats));
    out
}

/// Text report for `isoplan import`
pub fn render_summary(summary: &ImportSummary, phases: &[Phase]) -> String {
    let mut out = render_tree(phases);
    out.push('\n');
    let _ = writeln!(out, "Imported into {}: {}", summary.project_id, summary.created);
    out.push_str(&render_stats(&summary.stats));
    let _ = writeln!(
        out,
        "Assignees: {} resolved, {} unresolved",
        summary.assignees.resolved, summary.assignees.unresolved
    );
    out
}

#[derive(Serialize)]
pub struct ImportReport<'a> {
    pub summary: &'a ImportSummary,
    pub phases: &'a [Phase],
}
