//! Status normalization and priority inference
//!
//! Checklist authors write status in free text ("In-Progress", "Completed",
//! "To be started", ...). This module maps that text onto the closed
//! [`TaskStatus`] vocabulary and derives a [`Priority`] from the result.
//!
//! # Rules
//!
//! The upper-cased, trimmed text is checked in this order:
//!
//! | Match | Status |
//! |-------|--------|
//! | contains `IN PROGRESS`, `IN-PROGRESS` or `INPROGRESS` | `IN_PROGRESS` |
//! | contains `REVIEW` | `REVIEW` |
//! | contains `DONE` or `COMPLETED`, or equals `COMPLETE` | `DONE` |
//! | contains `TO BE` or `NOT STARTED` | `TODO` |
//! | anything else, including no value | `TODO` |
//!
//! # Example
//!
//! ```rust
//! use isoplan_core::{normalize_status, infer_priority, Priority, TaskStatus};
//!
//! let status = normalize_status(Some("in-progress"));
//! assert_eq!(status, TaskStatus::InProgress);
//! assert_eq!(infer_priority(status), Priority::High);
//! ```

use crate::{Priority, TaskStatus};

const IN_PROGRESS_MARKERS: [&str; 3] = ["IN PROGRESS", "IN-PROGRESS", "INPROGRESS"];

/// Map free-text status onto [`TaskStatus`]
pub fn normalize_status(raw: Option<&str>) -> TaskStatus {
    let Some(raw) = raw else {
        return TaskStatus::Todo;
    };
    let text = raw.trim().to_uppercase();

    if IN_PROGRESS_MARKERS.iter().any(|m| text.contains(m)) {
        TaskStatus::InProgress
    } else if text.contains("REVIEW") {
        TaskStatus::Review
    } else if text.contains("DONE") || text.contains("COMPLETED") || text == "COMPLETE" {
        TaskStatus::Done
    } else if text.contains("TO BE") || text.contains("NOT STARTED") {
        TaskStatus::Todo
    } else {
        TaskStatus::Todo
    }
}

/// Priority is a pure function of status
pub fn infer_priority(status: TaskStatus) -> Priority {
    match status {
        TaskStatus::Done => Priority::Low,
        TaskStatus::InProgress => Priority::High,
        TaskStatus::Review => Priority::Medium,
        TaskStatus::Todo => Priority::Medium,
    }
}

impl TaskStatus {
    /// Same as [`normalize_status`]
    pub fn from_raw(raw: Option<&str>) -> Self {
        normalize_status(raw)
    }

    /// Same as [`infer_priority`]
    pub fn priority(self) -> Priority {
        infer_priority(self)
    }
}
