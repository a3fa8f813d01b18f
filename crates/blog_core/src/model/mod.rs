//! Blog domain model.
//!
//! # Responsibility
//! - Define `User`, `Blog` and `Post` records and their field invariants.
//! - Generate identifiers client-side so related records can be linked
//!   before anything is persisted.
//!
//! # Invariants
//! - Every record is identified by a non-nil `EntityId`.
//! - Required text fields are non-empty. They are NOT trimmed, so a
//!   whitespace-only title is valid.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod blog;
pub mod id;
pub mod post;
pub mod user;

/// Field-level validation failure for domain records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// A required text field was the empty string.
    EmptyField(&'static str),
    /// The nil UUID is never a valid record id.
    NilId,
    /// Text could not be parsed as an id.
    InvalidId(String),
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "`{field}` must not be empty"),
            Self::NilId => write!(f, "id must not be nil"),
            Self::InvalidId(value) => write!(f, "invalid id `{value}`"),
        }
    }
}

impl Error for ModelValidationError {}

pub(crate) fn require_non_empty(
    field: &'static str,
    value: &str,
) -> Result<(), ModelValidationError> {
    if value.is_empty() {
        return Err(ModelValidationError::EmptyField(field));
    }
    Ok(())
}
