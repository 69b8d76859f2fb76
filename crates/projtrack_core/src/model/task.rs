//! Task record and lifecycle status.
//!
//! # Invariants
//! - `code` is unique across all tasks.
//! - `sub_project_id` references an existing sub-project row.

use super::importable::Importable;
use super::validation::{
    optional_text, require_parent, require_text, validate_code, EntityValidationError,
    DESCRIPTION_MAX_CHARS, NAME_MAX_CHARS,
};
use super::{EntityId, UNSAVED_ID};
use serde::{Deserialize, Serialize};

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created but not started.
    #[default]
    Todo,
    /// Work is in progress.
    InProgress,
    /// Completed successfully.
    Done,
    /// No longer actionable.
    Cancelled,
}

impl TaskStatus {
    pub fn as_db_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse_db_str(value: &str) -> Option<Self> {
        match value {
            "todo" => Some(Self::Todo),
            "in_progress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// Task belonging to one sub-project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Storage identity; `0` until persisted.
    #[serde(default)]
    pub id: EntityId,
    pub sub_project_id: EntityId,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub estimate_hours: Option<u32>,
    /// Unix epoch milliseconds, set by storage.
    #[serde(default)]
    pub created_at: i64,
}

impl Task {
    /// Creates an unsaved task with status `todo`.
    pub fn new(sub_project_id: EntityId, code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: UNSAVED_ID,
            sub_project_id,
            code: code.into(),
            name: name.into(),
            description: None,
            status: TaskStatus::Todo,
            estimate_hours: None,
            created_at: 0,
        }
    }

    pub fn validate(&self) -> Result<(), EntityValidationError> {
        require_parent("sub_project_id", self.sub_project_id)?;
        validate_code(&self.code)?;
        require_text("name", &self.name, NAME_MAX_CHARS)?;
        optional_text(
            "description",
            self.description.as_deref(),
            DESCRIPTION_MAX_CHARS,
        )
    }
}

impl Importable for Task {
    fn id(&self) -> EntityId {
        self.id
    }

    fn code(&self) -> &str {
        &self.code
    }

    fn same_business_fields(&self, other: &Self) -> bool {
        self.code == other.code
            && self.sub_project_id == other.sub_project_id
            && self.name == other.name
            && self.description == other.description
            && self.status == other.status
            && self.estimate_hours == other.estimate_hours
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_db_mapping_is_symmetric() {
        for status in [
            TaskStatus::Todo,
            TaskStatus::InProgress,
            TaskStatus::Done,
            TaskStatus::Cancelled,
        ] {
            assert_eq!(TaskStatus::parse_db_str(status.as_db_str()), Some(status));
        }
        assert_eq!(TaskStatus::parse_db_str("archived"), None);
    }

    #[test]
    fn status_change_breaks_business_equality() {
        let stored = Task::new(3, "T-1", "Write docs");
        let mut incoming = stored.clone();
        incoming.status = TaskStatus::Done;
        assert!(!stored.same_business_fields(&incoming));
    }

    #[test]
    fn json_input_defaults_identity_and_status() {
        let task: Task =
            serde_json::from_str(r#"{"sub_project_id":3,"code":"T-9","name":"Ship"}"#).unwrap();
        assert_eq!(task.id, 0);
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.estimate_hours, None);
    }
}
