//! # isoplan-core
//!
//! Core domain model and collaborator traits for the isoplan importer.
//!
//! This crate provides:
//! - Domain types: `ProjectPlan`, `Phase`, `SubPhase`, `Task`
//! - Closed vocabularies: `TaskStatus`, `Priority`
//! - Collaborator traits: `ConsultantDirectory`, `PlanWriter`
//! - In-memory collaborators for tests and the CLI
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use isoplan_core::{Phase, ProjectPlan, SubPhase, Task, TaskStatus, Priority};
//!
//! let mut plan = ProjectPlan::new();
//! let mut phase = Phase::new("phase-1", "1", 1).title("1. Planning");
//! let mut sub = SubPhase::new("subphase-1", "1.1", 1.1, "phase-1").title("1.1. Kickoff");
//! sub.tasks.push(
//!     Task::new("task-1", "1.1.1", "subphase-1")
//!         .title("Draft Charter")
//!         .status(TaskStatus::InProgress),
//! );
//! phase.sub_phases.push(sub);
//! plan.phases.push(phase);
//!
//! assert_eq!(plan.task_count(), 1);
//! assert_eq!(plan.tasks().next().unwrap().priority, Priority::High);
//! ```

pub mod directory;
pub mod status;
pub mod store;

pub use directory::{Consultant, ConsultantDirectory, InMemoryDirectory};
pub use status::{infer_priority, normalize_status};
pub use store::{InMemoryPlanStore, PlanWriter, StoredPlan};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Type Aliases
// ============================================================================

/// Identifier of a node (phase, sub-phase or task) within one imported plan
pub type NodeId = String;

/// Identifier of a consultant in the external directory
pub type UserId = String;

// ============================================================================
// Vocabularies
// ============================================================================

/// Workflow status of an imported task
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Review,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Review => "REVIEW",
            TaskStatus::Done => "DONE",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Task priority, derived from status at import time
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Plan
// ============================================================================

/// A reconstructed Phase → SubPhase → Task hierarchy
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPlan {
    /// Phases in first-encounter order
    pub phases: Vec<Phase>,
    /// Bookkeeping from the import run that produced this plan
    pub stats: ImportStats,
}

impl ProjectPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase_count(&self) -> usize {
        self.phases.len()
    }

    pub fn sub_phase_count(&self) -> usize {
        self.phases.iter().map(|p| p.sub_phases.len()).sum()
    }

    pub fn task_count(&self) -> usize {
        self.sub_phases().map(|s| s.tasks.len()).sum()
    }

    /// All sub-phases, depth first
    pub fn sub_phases(&self) -> impl Iterator<Item = &SubPhase> {
        self.phases.iter().flat_map(|p| p.sub_phases.iter())
    }

    /// All tasks, depth first
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.sub_phases().flat_map(|s| s.tasks.iter())
    }

    /// Mutable access to every task, depth first
    pub fn tasks_mut(&mut self) -> impl Iterator<Item = &mut Task> {
        self.phases
            .iter_mut()
            .flat_map(|p| p.sub_phases.iter_mut())
            .flat_map(|s| s.tasks.iter_mut())
    }

    /// Get a phase by node ID
    pub fn get_phase(&self, id: &str) -> Option<&Phase> {
        self.phases.iter().find(|p| p.id == id)
    }

    /// Get a task by node ID
    pub fn get_task(&self, id: &str) -> Option<&Task> {
        self.tasks().find(|t| t.id == id)
    }

    /// Attach the caller-supplied project identifier to every phase
    pub fn attach_project(&mut self, project_id: &str) {
        for phase in &mut self.phases {
            phase.project_id = Some(project_id.to_string());
        }
    }

    /// Node counts of this plan
    pub fn counts(&self) -> PlanCounts {
        PlanCounts {
            phases: self.phase_count(),
            sub_phases: self.sub_phase_count(),
            tasks: self.task_count(),
        }
    }
}

// ============================================================================
// Nodes
// ============================================================================

/// Top level of the hierarchy (a bare integer id such as `"2"`)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub id: NodeId,
    /// Hierarchy number as written in the sheet
    pub number: String,
    pub title: String,
    pub order: u64,
    /// Owning project, attached right before handoff to the writer
    pub project_id: Option<String>,
    /// Created as a placeholder for a descendant row
    pub synthesized: bool,
    pub sub_phases: Vec<SubPhase>,
}

impl Phase {
    /// Create a phase; the title defaults to the hierarchy number
    pub fn new(id: impl Into<String>, number: impl Into<String>, order: u64) -> Self {
        let number = number.into();
        Self {
            id: id.into(),
            title: number.clone(),
            number,
            order,
            project_id: None,
            synthesized: false,
            sub_phases: Vec::new(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn synthesized(mut self) -> Self {
        self.synthesized = true;
        self
    }
}

/// Second level (an id such as `"2.3"`)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubPhase {
    pub id: NodeId,
    pub number: String,
    pub title: String,
    /// `"N.M"` read as a decimal number
    pub order: f64,
    pub phase_id: NodeId,
    pub synthesized: bool,
    pub tasks: Vec<Task>,
}

impl SubPhase {
    pub fn new(
        id: impl Into<String>,
        number: impl Into<String>,
        order: f64,
        phase_id: impl Into<String>,
    ) -> Self {
        let number = number.into();
        Self {
            id: id.into(),
            title: number.clone(),
            number,
            order,
            phase_id: phase_id.into(),
            synthesized: false,
            tasks: Vec::new(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn synthesized(mut self) -> Self {
        self.synthesized = true;
        self
    }
}

/// Leaf level (an id with three or more segments such as `"2.3.1"`)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: NodeId,
    pub number: String,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    /// Owner text exactly as found in the sheet
    pub assignee_name_raw: Option<String>,
    /// Directory match for `assignee_name_raw`, if any
    pub resolved_assignee_id: Option<UserId>,
    pub sub_phase_id: NodeId,
}

impl Task {
    pub fn new(
        id: impl Into<String>,
        number: impl Into<String>,
        sub_phase_id: impl Into<String>,
    ) -> Self {
        let number = number.into();
        Self {
            id: id.into(),
            title: number.clone(),
            number,
            description: None,
            status: TaskStatus::Todo,
            priority: infer_priority(TaskStatus::Todo),
            assignee_name_raw: None,
            resolved_assignee_id: None,
            sub_phase_id: sub_phase_id.into(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Set the status; priority follows from it
    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self.priority = infer_priority(status);
        self
    }

    pub fn assignee_name(mut self, name: Option<String>) -> Self {
        self.assignee_name_raw = name;
        self
    }
}

// ============================================================================
// Bookkeeping
// ============================================================================

/// Aggregate counters of one import run
///
/// Skipped and dropped rows are never reported individually; these counters
/// are the only trace they leave.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportStats {
    /// Index of the detected (or configured) header row
    pub header_row: usize,
    /// Non-blank data rows handed to the hierarchy builder
    pub rows_scanned: usize,
    /// Rows missing a hierarchy id or a task name
    pub rows_skipped: usize,
    /// Rows whose id does not follow the numbering scheme
    pub rows_dropped: usize,
    pub phases_synthesized: usize,
    pub sub_phases_synthesized: usize,
}

/// Number of nodes written for one plan
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanCounts {
    pub phases: usize,
    pub sub_phases: usize,
    pub tasks: usize,
}

impl std::ops::Add for PlanCounts {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            phases: self.phases + rhs.phases,
            sub_phases: self.sub_phases + rhs.sub_phases,
            tasks: self.tasks + rhs.tasks,
        }
    }
}

impl std::fmt::Display for PlanCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} phases, {} sub-phases, {} tasks",
            self.phases, self.sub_phases, self.tasks
        )
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Failure of the transactional writer; nothing is committed when returned
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Invalid project: {0}")]
    InvalidProject(String),

    #[error("Broken parent link: {0}")]
    BrokenLink(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_plan() -> ProjectPlan {
        let mut plan = ProjectPlan::new();

        let mut phase = Phase::new("phase-1", "1", 1).title("1. Planning");
        let mut kickoff = SubPhase::new("subphase-1", "1.1", 1.1, "phase-1").title("1.1. Kickoff");
        kickoff.tasks.push(
            Task::new("task-1", "1.1.1", "subphase-1")
                .title("Draft Charter")
                .status(TaskStatus::InProgress),
        );
        kickoff
            .tasks
            .push(Task::new("task-2", "1.1.2", "subphase-1").title("Sign Charter"));
        phase.sub_phases.push(kickoff);
        phase
            .sub_phases
            .push(SubPhase::new("subphase-2", "1.2", 1.2, "phase-1"));
        plan.phases.push(phase);
        plan.phases.push(Phase::new("phase-2", "2", 2).synthesized());
        plan
    }

    #[test]
    fn task_builder_derives_priority() {
        let task = Task::new("task-1", "1.1.1", "subphase-1")
            .title("Audit")
            .description(Some("Internal audit".into()))
            .status(TaskStatus::Done)
            .assignee_name(Some("Jane".into()));

        assert_eq!(task.title, "Audit");
        assert_eq!(task.status, TaskStatus::Done);
        assert_eq!(task.priority, Priority::Low);
        assert_eq!(task.assignee_name_raw.as_deref(), Some("Jane"));
        assert!(task.resolved_assignee_id.is_none());
    }

    #[test]
    fn new_task_defaults_to_todo_medium() {
        let task = Task::new("task-1", "3.1.1", "subphase-1");
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.title, "3.1.1");
    }

    #[test]
    fn plan_counts() {
        let plan = sample_plan();
        assert_eq!(
            plan.counts(),
            PlanCounts {
                phases: 2,
                sub_phases: 2,
                tasks: 2
            }
        );
        assert_eq!(plan.counts().to_string(), "2 phases, 2 sub-phases, 2 tasks");
    }

    #[test]
    fn plan_lookup_by_id() {
        let plan = sample_plan();
        assert_eq!(plan.get_task("task-2").unwrap().title, "Sign Charter");
        assert!(plan.get_phase("phase-2").unwrap().synthesized);
        assert!(plan.get_task("task-9").is_none());
    }

    #[test]
    fn attach_project_sets_every_phase() {
        let mut plan = sample_plan();
        plan.attach_project("proj-7");
        assert!(plan
            .phases
            .iter()
            .all(|p| p.project_id.as_deref() == Some("proj-7")));
    }

    #[test]
    fn tasks_mut_visits_all_tasks() {
        let mut plan = sample_plan();
        for task in plan.tasks_mut() {
            task.resolved_assignee_id = Some("u1".into());
        }
        assert!(plan.tasks().all(|t| t.resolved_assignee_id.is_some()));
    }

    #[test]
    fn counts_add() {
        let a = PlanCounts {
            phases: 1,
            sub_phases: 2,
            tasks: 3,
        };
        assert_eq!(
            a + a,
            PlanCounts {
                phases: 2,
                sub_phases: 4,
                tasks: 6
            }
        );
    }

    #[test]
    fn serializes_handoff_payload_in_camel_case() {
        let plan = sample_plan();
        let json = serde_json::to_value(&plan).unwrap();
        let task = &json["phases"][0]["subPhases"][0]["tasks"][0];
        assert_eq!(task["status"], "IN_PROGRESS");
        assert_eq!(task["priority"], "HIGH");
        assert_eq!(task["subPhaseId"], "subphase-1");
        assert!(task["assigneeNameRaw"].is_null());
        assert_eq!(json["phases"][0]["subPhases"][0]["phaseId"], "phase-1");
    }

    #[test]
    fn persistence_error_display() {
        let err = PersistenceError::InvalidProject("empty id".into());
        assert!(err.to_string().contains("empty id"));
        let err = PersistenceError::BrokenLink("task-3".into());
        assert!(err.to_string().contains("task-3"));
    }
}
