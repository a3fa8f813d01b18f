//! Account record.

use super::id::EntityId;
use super::{require_non_empty, ModelValidationError};
use serde::{Deserialize, Serialize};

/// A registered account.
///
/// Stores only the password digest, never the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct User {
    pub id: EntityId,
    /// Unique across all users.
    pub email: String,
    pub password_hash: String,
}

impl User {
    /// Creates a user with a freshly generated id.
    pub fn new(
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Result<Self, ModelValidationError> {
        Self::with_id(EntityId::new(), email, password_hash)
    }

    pub fn with_id(
        id: EntityId,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Result<Self, ModelValidationError> {
        let user = Self {
            id,
            email: email.into(),
            password_hash: password_hash.into(),
        };
        user.validate()?;
        Ok(user)
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        require_non_empty("email", &self.email)?;
        require_non_empty("password_hash", &self.password_hash)
    }
}
