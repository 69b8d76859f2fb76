//! Repository layer contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Keep SQL details out of services and the import reconciler.
//!
//! # Invariants
//! - Write paths validate records before any SQL mutation.
//! - Read paths reject invalid persisted state instead of masking it.
//! - List order is always `id ASC` so skip/take paging is stable.

pub mod project_repo;
pub mod sub_project_repo;
pub mod task_repo;

use crate::db::DbError;
use crate::model::validation::EntityValidationError;
use crate::model::EntityId;
use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const LIST_DEFAULT_TAKE: u32 = 20;
pub const LIST_TAKE_MAX: u32 = 100;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(EntityValidationError),
    Db(DbError),
    NotFound(EntityId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<EntityValidationError> for RepoError {
    fn from(value: EntityValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Skip/take paging options for list queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Number of rows to skip.
    pub skip: u32,
    /// Maximum rows to return. Defaults to 20 and clamps to 100.
    pub take: Option<u32>,
}

impl ListQuery {
    pub fn new(skip: u32, take: u32) -> Self {
        Self {
            skip,
            take: Some(take),
        }
    }

    /// Effective row limit after defaulting and clamping.
    pub fn effective_take(&self) -> u32 {
        match self.take {
            None | Some(0) => LIST_DEFAULT_TAKE,
            Some(take) => take.min(LIST_TAKE_MAX),
        }
    }
}

/// Returns SQLite's message when `err` is a constraint violation.
pub(crate) fn constraint_violation(err: &rusqlite::Error) -> Option<String> {
    match err {
        rusqlite::Error::SqliteFailure(failure, message)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            Some(
                message
                    .clone()
                    .unwrap_or_else(|| "constraint failed".to_string()),
            )
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{ListQuery, LIST_DEFAULT_TAKE, LIST_TAKE_MAX};

    #[test]
    fn take_defaults_and_clamps() {
        assert_eq!(ListQuery::default().effective_take(), LIST_DEFAULT_TAKE);
        assert_eq!(ListQuery::new(0, 0).effective_take(), LIST_DEFAULT_TAKE);
        assert_eq!(ListQuery::new(0, 7).effective_take(), 7);
        assert_eq!(ListQuery::new(0, 500).effective_take(), LIST_TAKE_MAX);
    }
}
