//! Phase / SubPhase / Task tree assembly
//!
//! Rows are consumed in sheet order. The lookup tables from hierarchy number
//! to node live only for one call of [`build_hierarchy`].
//!
//! Rules:
//! - a Phase row always creates a new Phase, even when its number was seen
//!   before; the lookup entry is overwritten so later children attach to the
//!   newest one
//! - a SubPhase or Task row whose ancestors are missing gets placeholder
//!   ancestors (`"N. Phase"`, `"N.M. Subphase"`)
//! - rows without id or name are skipped, rows with an unrecognized id are
//!   dropped; neither synthesizes anything
//! - nothing is sorted afterwards

use std::collections::HashMap;

use isoplan_core::{normalize_status, ImportStats, Phase, ProjectPlan, SubPhase, Task};

use super::HierarchyId;
use crate::columns::ColumnMap;
use crate::rows::NormalizedRow;

/// Assemble the plan tree from normalized rows
pub fn build_hierarchy(rows: &[NormalizedRow], columns: &ColumnMap) -> ProjectPlan {
    let mut builder = TreeBuilder::default();
    for row in rows {
        builder.push_row(row, columns);
    }
    builder.finish()
}

/// Position of a sub-phase: (phase index, sub-phase index)
type SubPhaseSlot = (usize, usize);

#[derive(Default)]
struct TreeBuilder {
    phases: Vec<Phase>,
    phase_by_number: HashMap<String, usize>,
    sub_phase_by_number: HashMap<String, SubPhaseSlot>,
    stats: ImportStats,
    next_phase: usize,
    next_sub_phase: usize,
    next_task: usize,
}

impl TreeBuilder {
    fn push_row(&mut self, row: &NormalizedRow, columns: &ColumnMap) {
        self.stats.rows_scanned += 1;

        let id_cell = row.text(&columns.hierarchy_id);
        let name_cell = row.text(&columns.task_name);
        let (Some(raw_id), Some(name)) = (id_cell, name_cell) else {
            self.stats.rows_skipped += 1;
            tracing::trace!("skipping row without id or task name");
            return;
        };

        match HierarchyId::classify(&raw_id) {
            HierarchyId::Phase { number, order } => {
                let title = format!("{number}. {name}");
                self.add_phase(number, title, order, false);
            }
            HierarchyId::SubPhase {
                number,
                phase,
                phase_order,
                order,
            } => {
                let phase_index = self.ensure_phase(&phase, phase_order);
                let title = format!("{number}. {name}");
                self.add_sub_phase(phase_index, number, title, order, false);
            }
            HierarchyId::Task {
                number,
                phase,
                phase_order,
                sub_phase,
            } => {
                let (p, s) = self.ensure_sub_phase(&phase, phase_order, &sub_phase);
                self.next_task += 1;
                let sub = &mut self.phases[p].sub_phases[s];
                let task = Task::new(format!("task-{}", self.next_task), number, sub.id.clone())
                    .title(name)
                    .description(row.text(&columns.description))
                    .status(normalize_status(row.text(&columns.status).as_deref()))
                    .assignee_name(row.text(&columns.assignee));
                sub.tasks.push(task);
            }
            HierarchyId::Unrecognized => {
                self.stats.rows_dropped += 1;
                tracing::trace!(id = %raw_id, "dropping row with unrecognized id");
            }
        }
    }

    fn add_phase(&mut self, number: String, title: String, order: u64, synthesized: bool) -> usize {
        self.next_phase += 1;
        let mut phase =
            Phase::new(format!("phase-{}", self.next_phase), number.clone(), order).title(title);
        if synthesized {
            phase = phase.synthesized();
            self.stats.phases_synthesized += 1;
        }
        self.phases.push(phase);
        let index = self.phases.len() - 1;
        self.phase_by_number.insert(number, index);
        index
    }

    fn add_sub_phase(
        &mut self,
        phase_index: usize,
        number: String,
        title: String,
        order: f64,
        synthesized: bool,
    ) -> SubPhaseSlot {
        self.next_sub_phase += 1;
        let phase = &mut self.phases[phase_index];
        let mut sub = SubPhase::new(
            format!("subphase-{}", self.next_sub_phase),
            number.clone(),
            order,
            phase.id.clone(),
        )
        .title(title);
        if synthesized {
            sub = sub.synthesized();
            self.stats.sub_phases_synthesized += 1;
        }
        phase.sub_phases.push(sub);
        let slot = (phase_index, phase.sub_phases.len() - 1);
        self.sub_phase_by_number.insert(number, slot);
        slot
    }

    fn ensure_phase(&mut self, number: &str, order: u64) -> usize {
        if let Some(&index) = self.phase_by_number.get(number) {
            return index;
        }
        tracing::debug!(phase = number, "synthesizing missing phase");
        self.add_phase(number.to_string(), format!("{number}. Phase"), order, true)
    }

    fn ensure_sub_phase(&mut self, phase: &str, phase_order: u64, number: &str) -> SubPhaseSlot {
        if let Some(&slot) = self.sub_phase_by_number.get(number) {
            return slot;
        }
        let phase_index = self.ensure_phase(phase, phase_order);
        tracing::debug!(sub_phase = number, "synthesizing missing sub-phase");
        self.add_sub_phase(
            phase_index,
            number.to_string(),
            format!("{number}. Subphase"),
            number.parse().unwrap_or_default(),
            true,
        )
    }

    fn finish(self) -> ProjectPlan {
        tracing::debug!(
            phases = self.phases.len(),
            skipped = self.stats.rows_skipped,
            dropped = self.stats.rows_dropped,
            "hierarchy assembled"
        );
        ProjectPlan {
            phases: self.phases,
            stats: self.stats,
        }
    }
}
