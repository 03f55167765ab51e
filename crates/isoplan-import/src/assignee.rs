//! Best-effort owner resolution
//!
//! The owner column holds free text ("John", "jdoe", "IT Team"). Each task's
//! raw name is looked up in the [`ConsultantDirectory`]; a miss leaves the
//! task unassigned. Short or common fragments can match the wrong person;
//! the directory decides, nothing here second-guesses it.

use std::collections::HashMap;

use isoplan_core::{ConsultantDirectory, ProjectPlan, UserId};
use serde::Serialize;

/// Outcome of assignee resolution over a plan
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssigneeReport {
    /// Tasks whose owner text matched a consultant
    pub resolved: usize,
    /// Tasks with owner text but no match
    pub unresolved: usize,
}

/// Fill `resolved_assignee_id` on every task that names an owner
///
/// Each distinct name is looked up once per call.
pub fn resolve_assignees(plan: &mut ProjectPlan, directory: &dyn ConsultantDirectory) -> AssigneeReport {
    let mut cache: HashMap<String, Option<UserId>> = HashMap::new();
    let mut report = AssigneeReport::default();

    for task in plan.tasks_mut() {
        let Some(raw) = task.assignee_name_raw.as_deref() else {
            continue;
        };
        let name = raw.trim();
        if name.is_empty() {
            continue;
        }

        let resolved = cache
            .entry(name.to_string())
            .or_insert_with(|| directory.lookup_by_name_fragment(name))
            .clone();

        match resolved {
            Some(user_id) => {
                task.resolved_assignee_id = Some(user_id);
                report.resolved += 1;
            }
            None => {
                tracing::trace!(task = %task.id, name, "assignee not found in directory");
                report.unresolved += 1;
            }
        }
    }

    tracing::debug!(resolved = report.resolved, unresolved = report.unresolved, "assignees resolved");
    report
}
