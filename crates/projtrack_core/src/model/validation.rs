//! Field-level validation shared by sub-project and task records.
//!
//! # Invariants
//! - Checks run field by field and stop at the first failure.
//! - Errors always name the offending field.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const CODE_MAX_CHARS: usize = 32;
pub const NAME_MAX_CHARS: usize = 200;
pub const DESCRIPTION_MAX_CHARS: usize = 2000;

static CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.\-]*$").expect("valid code regex"));

/// Validation failure for one record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityValidationError {
    /// Required text field is empty or whitespace-only.
    Blank { field: &'static str },
    /// Text field exceeds its character budget.
    TooLong { field: &'static str, max_chars: usize },
    /// Code contains characters outside `[A-Za-z0-9_.-]`.
    InvalidCode(String),
    /// Parent reference is not a persisted id.
    MissingParent { field: &'static str },
}

impl Display for EntityValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank { field } => write!(f, "{field} should be filled"),
            Self::TooLong { field, max_chars } => {
                write!(f, "{field} must be at most {max_chars} characters")
            }
            Self::InvalidCode(code) => write!(f, "code `{code}` has invalid characters"),
            Self::MissingParent { field } => write!(f, "{field} must reference a saved record"),
        }
    }
}

impl Error for EntityValidationError {}

pub(crate) fn validate_code(code: &str) -> Result<(), EntityValidationError> {
    require_text("code", code, CODE_MAX_CHARS)?;
    if !CODE_RE.is_match(code) {
        return Err(EntityValidationError::InvalidCode(code.to_string()));
    }
    Ok(())
}

pub(crate) fn require_text(
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<(), EntityValidationError> {
    if value.trim().is_empty() {
        return Err(EntityValidationError::Blank { field });
    }
    if value.chars().count() > max_chars {
        return Err(EntityValidationError::TooLong { field, max_chars });
    }
    Ok(())
}

pub(crate) fn optional_text(
    field: &'static str,
    value: Option<&str>,
    max_chars: usize,
) -> Result<(), EntityValidationError> {
    match value {
        Some(text) if text.chars().count() > max_chars => {
            Err(EntityValidationError::TooLong { field, max_chars })
        }
        _ => Ok(()),
    }
}

pub(crate) fn require_parent(field: &'static str, id: i64) -> Result<(), EntityValidationError> {
    if id <= 0 {
        return Err(EntityValidationError::MissingParent { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_accepts_dotted_and_dashed_values() {
        assert!(validate_code("SP-01").is_ok());
        assert!(validate_code("task_1.2").is_ok());
    }

    #[test]
    fn code_rejects_blank_and_bad_characters() {
        assert_eq!(
            validate_code("  "),
            Err(EntityValidationError::Blank { field: "code" })
        );
        assert!(matches!(
            validate_code("-leading"),
            Err(EntityValidationError::InvalidCode(_))
        ));
        assert!(matches!(
            validate_code("has space"),
            Err(EntityValidationError::InvalidCode(_))
        ));
    }

    #[test]
    fn require_text_counts_chars_not_bytes() {
        let name = "é".repeat(NAME_MAX_CHARS);
        assert!(require_text("name", &name, NAME_MAX_CHARS).is_ok());
        let too_long = "é".repeat(NAME_MAX_CHARS + 1);
        assert_eq!(
            require_text("name", &too_long, NAME_MAX_CHARS),
            Err(EntityValidationError::TooLong {
                field: "name",
                max_chars: NAME_MAX_CHARS
            })
        );
    }

    #[test]
    fn parent_must_be_positive() {
        assert!(require_parent("project_id", 1).is_ok());
        assert!(require_parent("project_id", 0).is_err());
    }
}
