//! Sub-project record.
//!
//! # Invariants
//! - `code` is unique across all sub-projects.
//! - `project_id` references an existing project row.

use super::importable::Importable;
use super::validation::{
    optional_text, require_parent, require_text, validate_code, EntityValidationError,
    DESCRIPTION_MAX_CHARS, NAME_MAX_CHARS,
};
use super::{EntityId, UNSAVED_ID};
use serde::{Deserialize, Serialize};

/// Sub-project belonging to one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubProject {
    /// Storage identity; `0` until persisted.
    #[serde(default)]
    pub id: EntityId,
    pub project_id: EntityId,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Unix epoch milliseconds, set by storage.
    #[serde(default)]
    pub created_at: i64,
}

impl SubProject {
    /// Creates an unsaved sub-project.
    pub fn new(project_id: EntityId, code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: UNSAVED_ID,
            project_id,
            code: code.into(),
            name: name.into(),
            description: None,
            created_at: 0,
        }
    }

    /// Builder-style description setter.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validates required fields before persistence.
    pub fn validate(&self) -> Result<(), EntityValidationError> {
        require_parent("project_id", self.project_id)?;
        validate_code(&self.code)?;
        require_text("name", &self.name, NAME_MAX_CHARS)?;
        optional_text(
            "description",
            self.description.as_deref(),
            DESCRIPTION_MAX_CHARS,
        )
    }
}

impl Importable for SubProject {
    fn id(&self) -> EntityId {
        self.id
    }

    fn code(&self) -> &str {
        &self.code
    }

    fn same_business_fields(&self, other: &Self) -> bool {
        self.code == other.code
            && self.project_id == other.project_id
            && self.name == other.name
            && self.description == other.description
    }
}
