//! Consultant directory collaborator
//!
//! The importer only needs one query from the user directory: "who does this
//! free-text owner name refer to?". [`ConsultantDirectory`] is that seam;
//! [`InMemoryDirectory`] answers it from a list of [`Consultant`] records.

use serde::{Deserialize, Serialize};

use crate::UserId;

/// Read-only name lookup against the consultant directory
pub trait ConsultantDirectory {
    /// Find a consultant whose name or email matches `text`
    fn lookup_by_name_fragment(&self, text: &str) -> Option<UserId>;
}

/// A directory record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consultant {
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

impl Consultant {
    pub fn new(
        user_id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: String::new(),
        }
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Case-insensitive substring match on first name, last name or email
    fn matches(&self, needle_lower: &str) -> bool {
        [&self.first_name, &self.last_name, &self.email]
            .iter()
            .any(|field| field.to_lowercase().contains(needle_lower))
    }
}

/// Directory backed by a vector, searched in insertion order
#[derive(Clone, Debug, Default)]
pub struct InMemoryDirectory {
    consultants: Vec<Consultant>,
}

impl InMemoryDirectory {
    pub fn new(consultants: Vec<Consultant>) -> Self {
        Self { consultants }
    }

    pub fn push(&mut self, consultant: Consultant) {
        self.consultants.push(consultant);
    }

    pub fn len(&self) -> usize {
        self.consultants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.consultants.is_empty()
    }
}

impl ConsultantDirectory for InMemoryDirectory {
    fn lookup_by_name_fragment(&self, text: &str) -> Option<UserId> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        // First match wins; there is no ranking between candidates.
        self.consultants
            .iter()
            .find(|c| c.matches(&needle))
            .map(|c| c.user_id.clone())
    }
}
