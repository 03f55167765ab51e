//! Column role resolution
//!
//! Checklists label their columns however their authors like ("S.No",
//! "Activity", "Ownership", ...). Each semantic role carries a list of
//! candidate patterns; [`resolve_column`] picks the header label that best
//! matches them using progressively looser tiers:
//!
//! 1. exact match, case-insensitive
//! 2. header contains the pattern, case-insensitive
//! 3. header starts with the first three characters of a pattern of at
//!    least three characters
//! 4. the first pattern literal
//!
//! The last tier keeps resolution total. A fallback label that is not a real
//! header simply never finds a value in any row.

use serde::{Deserialize, Serialize};

/// Header labels chosen for each role
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMap {
    pub hierarchy_id: String,
    pub task_name: String,
    pub status: String,
    pub assignee: String,
    pub description: String,
}

/// Candidate patterns for each role, most specific first
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnPatterns {
    pub hierarchy_id: Vec<String>,
    pub task_name: Vec<String>,
    pub status: Vec<String>,
    pub assignee: Vec<String>,
    pub description: Vec<String>,
}

impl Default for ColumnPatterns {
    fn default() -> Self {
        fn owned(list: &[&str]) -> Vec<String> {
            list.iter().map(|s| s.to_string()).collect()
        }
        Self {
            hierarchy_id: owned(&[
                "S.No", "S. No.", "Sr. No", "Sl. No", "No.", "#", "Ref", "Clause", "ID",
            ]),
            task_name: owned(&["Task", "Activity", "Task Name", "Activities", "Item"]),
            status: owned(&["Status", "Progress", "State"]),
            assignee: owned(&["Ownership", "Owner", "Responsible", "Assignee", "Assigned To"]),
            description: owned(&["Description", "Details", "Remarks", "Notes", "Comments"]),
        }
    }
}

/// Pick the header label matching `candidates`
pub fn resolve_column<S: AsRef<str>>(headers: &[String], candidates: &[S]) -> String {
    let lowered: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();
    let patterns: Vec<String> = candidates
        .iter()
        .map(|c| c.as_ref().to_lowercase())
        .collect();

    let tiers: [&dyn Fn(&str, &str) -> bool; 3] = [
        &|header: &str, pattern: &str| header == pattern,
        &|header: &str, pattern: &str| header.contains(pattern),
        &|header: &str, pattern: &str| {
            pattern.chars().count() >= 3 && header.starts_with(&prefix3(pattern))
        },
    ];
    for tier in tiers {
        if let Some(found) = first_match(headers, &lowered, &patterns, tier) {
            return found;
        }
    }

    candidates
        .first()
        .map(|c| c.as_ref().to_string())
        .unwrap_or_default()
}

/// First header satisfying `pred` for the earliest pattern that has one
fn first_match(
    headers: &[String],
    lowered: &[String],
    patterns: &[String],
    pred: &dyn Fn(&str, &str) -> bool,
) -> Option<String> {
    patterns.iter().find_map(|pattern| {
        lowered
            .iter()
            .position(|header| pred(header.as_str(), pattern.as_str()))
            .map(|i| headers[i].clone())
    })
}

fn prefix3(pattern: &str) -> String {
    pattern.chars().take(3).collect()
}

/// Resolve all five roles against the header labels
pub fn resolve_columns(headers: &[String], patterns: &ColumnPatterns) -> ColumnMap {
    let map = ColumnMap {
        hierarchy_id: resolve_column(headers, &patterns.hierarchy_id),
        task_name: resolve_column(headers, &patterns.task_name),
        status: resolve_column(headers, &patterns.status),
        assignee: resolve_column(headers, &patterns.assignee),
        description: resolve_column(headers, &patterns.description),
    };
    tracing::debug!(?map, "resolved columns");
    map
}
