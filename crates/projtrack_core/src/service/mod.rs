//! Core use-case services.
//!
//! # Responsibility
//! - Normalize and validate caller input before it reaches repositories.
//! - Route batch imports through the import reconciler.
//!
//! # Invariants
//! - Services never bypass repository persistence contracts.
//! - Services stay storage-agnostic (generic over repository traits).

pub mod sub_project_service;
pub mod task_service;

use crate::import::ImportError;
use crate::model::validation::EntityValidationError;
use crate::model::EntityId;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for project tracking use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Input failed field validation.
    Validation(EntityValidationError),
    /// Target record does not exist.
    NotFound(EntityId),
    /// Import failed outside the business-rejection path.
    Import(ImportError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::Import(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Import(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<EntityValidationError> for ServiceError {
    fn from(value: EntityValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<ImportError> for ServiceError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// Trims text input; blank optional text collapses to `None`.
pub(crate) fn normalize_text(value: &str) -> String {
    value.trim().to_string()
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::normalize_optional_text;

    #[test]
    fn blank_optional_text_becomes_none() {
        assert_eq!(normalize_optional_text(Some("   ")), None);
        assert_eq!(
            normalize_optional_text(Some(" api layer ")),
            Some("api layer".to_string())
        );
        assert_eq!(normalize_optional_text(None), None);
    }
}
