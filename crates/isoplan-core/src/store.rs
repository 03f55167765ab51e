//! Transactional plan writer collaborator
//!
//! [`PlanWriter`] receives a finished Phase → SubPhase → Task tree and must
//! create the whole cascade or nothing. [`InMemoryPlanStore`] honours that
//! contract by validating every parent link before committing.
//!
//! The writer owns any serialization of concurrent imports against the same
//! project; the importer itself takes no locks.

use std::collections::HashMap;

use crate::{Phase, PersistenceError, PlanCounts};

/// Atomic all-or-nothing writer for imported plans
pub trait PlanWriter {
    /// Create every phase, sub-phase and task of `phases` under `project_id`
    fn create_project_plan(
        &mut self,
        project_id: &str,
        phases: &[Phase],
    ) -> Result<PlanCounts, PersistenceError>;
}

/// One committed import
#[derive(Clone, Debug, PartialEq)]
pub struct StoredPlan {
    /// Monotonic commit sequence number (1-based)
    pub revision: u64,
    pub phases: Vec<Phase>,
}

/// Writer keeping committed plans in memory, grouped by project
///
/// Plans are appended, never merged: importing the same sheet twice stores
/// two independent trees.
#[derive(Clone, Debug, Default)]
pub struct InMemoryPlanStore {
    projects: HashMap<String, Vec<StoredPlan>>,
    next_revision: u64,
}

impl InMemoryPlanStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed plans for a project, oldest first
    pub fn plans(&self, project_id: &str) -> &[StoredPlan] {
        self.projects
            .get(project_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total nodes stored for a project across all imports
    pub fn totals(&self, project_id: &str) -> PlanCounts {
        self.plans(project_id)
            .iter()
            .map(|p| count(&p.phases))
            .fold(PlanCounts::default(), |acc, c| acc + c)
    }

    fn validate(project_id: &str, phases: &[Phase]) -> Result<(), PersistenceError> {
        if project_id.trim().is_empty() {
            return Err(PersistenceError::InvalidProject(
                "project id must not be empty".into(),
            ));
        }
        for phase in phases {
            if let Some(owner) = &phase.project_id {
                if owner != project_id {
                    return Err(PersistenceError::InvalidProject(format!(
                        "phase {} belongs to project {owner}, not {project_id}",
                        phase.id
                    )));
                }
            }
            for sub in &phase.sub_phases {
                if sub.phase_id != phase.id {
                    return Err(PersistenceError::BrokenLink(format!(
                        "sub-phase {} points at {} but is nested under {}",
                        sub.id, sub.phase_id, phase.id
                    )));
                }
                for task in &sub.tasks {
                    if task.sub_phase_id != sub.id {
                        return Err(PersistenceError::BrokenLink(format!(
                            "task {} points at {} but is nested under {}",
                            task.id, task.sub_phase_id, sub.id
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

impl PlanWriter for InMemoryPlanStore {
    fn create_project_plan(
        &mut self,
        project_id: &str,
        phases: &[Phase],
    ) -> Result<PlanCounts, PersistenceError> {
        // Validate the whole cascade first so a failure commits nothing.
        Self::validate(project_id, phases)?;

        self.next_revision += 1;
        let counts = count(phases);
        self.projects
            .entry(project_id.to_string())
            .or_default()
            .push(StoredPlan {
                revision: self.next_revision,
                phases: phases.to_vec(),
            });

        tracing::debug!(project_id, revision = self.next_revision, %counts, "plan committed");
        Ok(counts)
    }
}

fn count(phases: &[Phase]) -> PlanCounts {
    PlanCounts {
        phases: phases.len(),
        sub_phases: phases.iter().map(|p| p.sub_phases.len()).sum(),
        tasks: phases
            .iter()
            .flat_map(|p| p.sub_phases.iter())
            .map(|s| s.tasks.len())
            .sum(),
    }
}
