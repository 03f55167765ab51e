//! Hierarchy numbers and tree assembly
//!
//! Checklists encode nesting in a dot-separated number column:
//!
//! | Id | Segments | Kind |
//! |----|----------|------|
//! | `2` | 1 | Phase |
//! | `2.3` | 2 | SubPhase |
//! | `2.3.1`, `2.3.1.4` | 3+ | Task under SubPhase `2.3` |
//!
//! [`HierarchyId::classify`] turns a cell into one of these variants (or
//! `Unrecognized`) using the pest grammar in `grammar.pest`;
//! [`build_hierarchy`] assembles the tree.

mod builder;

pub use builder::build_hierarchy;

use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "hierarchy/grammar.pest"]
struct HierarchyParser;

/// Classified hierarchy number
#[derive(Clone, Debug, PartialEq)]
pub enum HierarchyId {
    /// Bare integer, e.g. `"2"`
    Phase { number: String, order: u64 },
    /// Two segments, e.g. `"2.3"`
    SubPhase {
        number: String,
        phase: String,
        phase_order: u64,
        order: f64,
    },
    /// Three or more segments, e.g. `"2.3.1"`; keyed to its first two
    Task {
        number: String,
        phase: String,
        phase_order: u64,
        sub_phase: String,
    },
    /// Anything outside the numbering scheme
    Unrecognized,
}

impl HierarchyId {
    /// Classify raw cell text (surrounding whitespace is ignored)
    pub fn classify(raw: &str) -> Self {
        let raw = raw.trim();
        let Some(segments) = segments(raw) else {
            return HierarchyId::Unrecognized;
        };
        // Phase numbers beyond u64 cannot be ordered
        let Ok(phase_order) = segments[0].parse::<u64>() else {
            return HierarchyId::Unrecognized;
        };

        match segments.len() {
            1 => HierarchyId::Phase {
                number: raw.to_string(),
                order: phase_order,
            },
            2 => HierarchyId::SubPhase {
                number: raw.to_string(),
                phase: segments[0].to_string(),
                phase_order,
                order: raw.parse().unwrap_or_default(),
            },
            _ => HierarchyId::Task {
                number: raw.to_string(),
                phase: segments[0].to_string(),
                phase_order,
                sub_phase: format!("{}.{}", segments[0], segments[1]),
            },
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, HierarchyId::Unrecognized)
    }
}

/// Integer segments of a well-formed hierarchy number
pub fn segments(raw: &str) -> Option<Vec<&str>> {
    let mut pairs = HierarchyParser::parse(Rule::hierarchy_id, raw).ok()?;
    let id = pairs.next()?;
    let segments: Vec<&str> = id
        .into_inner()
        .filter(|p| p.as_rule() == Rule::segment)
        .map(|p| p.as_str())
        .collect();
    (!segments.is_empty()).then_some(segments)
}
