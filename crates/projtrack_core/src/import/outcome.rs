use crate::model::importable::Importable;
use crate::model::validation::EntityValidationError;
use crate::model::EntityId;
use serde::{Deserialize, Serialize};

pub const EMPTY_BATCH_MESSAGE: &str = "list to import should be filled";
pub const ALREADY_IMPORTED_MESSAGE: &str = "already imported";
pub const IMPORTED_MESSAGE: &str = "imported";
const CONFLICTS_PREFIX: &str = "conflicts detected, CONFLICTS:";

/// HTTP-style classification of an import request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStatus {
    Ok,
    BadRequest,
    Conflict,
}

impl ImportStatus {
    pub fn http_code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::BadRequest => 400,
            Self::Conflict => 409,
        }
    }
}

/// Result envelope of one import request.
///
/// Business rejections (empty batch, conflicts) travel as values of this
/// type, never as errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub status: ImportStatus,
    pub message: String,
    /// Number of records actually persisted.
    pub count: usize,
}

impl ImportOutcome {
    pub fn imported(count: usize) -> Self {
        Self::new(ImportStatus::Ok, IMPORTED_MESSAGE, count)
    }

    pub fn already_imported() -> Self {
        Self::new(ImportStatus::Ok, ALREADY_IMPORTED_MESSAGE, 0)
    }

    pub fn empty_batch() -> Self {
        Self::bad_request(EMPTY_BATCH_MESSAGE)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ImportStatus::BadRequest, message, 0)
    }

    /// Conflict outcome listing colliding existing ids in the given order.
    pub fn conflicts(ids: &[EntityId]) -> Self {
        let joined = ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        Self::new(ImportStatus::Conflict, format!("{CONFLICTS_PREFIX}{joined}"), 0)
    }

    /// Rejection for a batch that carries one code twice with different fields.
    pub fn repeated_code(code: &str) -> Self {
        Self::bad_request(format!(
            "code `{code}` appears more than once with different fields"
        ))
    }

    /// BadRequest naming the first record that fails `validate`, if any.
    pub fn first_invalid<T: Importable>(
        kind: &str,
        entities: &[T],
        validate: impl Fn(&T) -> Result<(), EntityValidationError>,
    ) -> Option<Self> {
        entities.iter().find_map(|entity| {
            validate(entity)
                .err()
                .map(|err| Self::bad_request(format!("{kind} `{}`: {err}", entity.code())))
        })
    }

    pub fn is_ok(&self) -> bool {
        self.status == ImportStatus::Ok
    }

    fn new(status: ImportStatus, message: impl Into<String>, count: usize) -> Self {
        Self {
            status,
            message: message.into(),
            count,
        }
    }
}
