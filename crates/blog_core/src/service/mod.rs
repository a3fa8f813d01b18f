//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into user/blog/post use cases.
//! - Enforce cross-record rules the store cannot see (references,
//!   duplicate emails, credential checks).
//!
//! # Invariants
//! - Services never bypass model validation before persisting.
//! - Services are storage-agnostic: they only speak the `Store` trait.

use crate::auth::CredentialError;
use crate::model::ModelValidationError;
use crate::search::SearchError;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod blog_service;
pub mod user_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Entity kind named by [`ServiceError::NotFound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    User,
    Blog,
    Post,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::User => "user",
            Self::Blog => "blog",
            Self::Post => "post",
        })
    }
}

/// Structured failure surfaced to transports, which choose the wording.
#[derive(Debug)]
pub enum ServiceError {
    /// Another account already uses this email.
    DuplicateEmail(String),
    /// A required field was empty.
    Validation(ModelValidationError),
    /// Registration input failed email/password checks.
    InvalidRegistration(CredentialError),
    InvalidCredentials,
    NotFound {
        kind: EntityKind,
        key: String,
    },
    /// The operation needs a session user and there is none.
    NotAuthenticated,
    InvalidQuery {
        query: String,
        message: String,
    },
    Store(StoreError),
}

impl ServiceError {
    pub(crate) fn not_found(kind: EntityKind, key: impl ToString) -> Self {
        Self::NotFound {
            kind,
            key: key.to_string(),
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateEmail(email) => write!(f, "email `{email}` is already registered"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidRegistration(err) => write!(f, "{err}"),
            Self::InvalidCredentials => write!(f, "invalid email or password"),
            Self::NotFound { kind, key } => write!(f, "{kind} not found: {key}"),
            Self::NotAuthenticated => write!(f, "no user is logged in"),
            Self::InvalidQuery { query, message } => {
                write!(f, "invalid search query `{query}`: {message}")
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::InvalidRegistration(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModelValidationError> for ServiceError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<CredentialError> for ServiceError {
    fn from(value: CredentialError) -> Self {
        Self::InvalidRegistration(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<SearchError> for ServiceError {
    fn from(value: SearchError) -> Self {
        match value {
            SearchError::InvalidQuery { query, message } => Self::InvalidQuery { query, message },
            SearchError::Store(err) => Self::Store(err),
        }
    }
}
