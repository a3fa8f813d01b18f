//! Credential helpers.
//!
//! # Responsibility
//! - Digest passwords before storage and before every comparison.
//! - Check registration input shape (email format, password length).
//!
//! # Invariants
//! - `hash_password` is deterministic: the same password always yields the
//!   same lowercase hex digest.
//!
//! Single-round SHA-256 is weak credential storage; a slow salted KDF is
//! the correct replacement once stored hashes no longer need to match.

use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_CHARS: usize = 8;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9.+_-]+@[A-Za-z0-9._-]+\.[a-zA-Z]*$").expect("valid email regex")
});

/// Registration input rejected before any store access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    InvalidEmail(String),
    PasswordTooShort { min_chars: usize },
}

impl Display for CredentialError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEmail(email) => write!(f, "invalid email address `{email}`"),
            Self::PasswordTooShort { min_chars } => {
                write!(f, "password must be at least {min_chars} characters")
            }
        }
    }
}

impl Error for CredentialError {}

/// Returns the lowercase hex SHA-256 digest of `password`.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Compares two digests without early exit on the first differing byte.
pub fn hashes_match(stored: &str, candidate: &str) -> bool {
    let stored = stored.as_bytes();
    let candidate = candidate.as_bytes();
    if stored.len() != candidate.len() {
        return false;
    }
    stored
        .iter()
        .zip(candidate)
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

/// Checks email format and minimum password length.
pub fn check_registration(email: &str, password: &str) -> Result<(), CredentialError> {
    if !EMAIL_RE.is_match(email) {
        return Err(CredentialError::InvalidEmail(email.to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(CredentialError::PasswordTooShort {
            min_chars: MIN_PASSWORD_CHARS,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{check_registration, hash_password, hashes_match, CredentialError};

    #[test]
    fn hash_is_deterministic_sha256_hex() {
        assert_eq!(
            hash_password("password1"),
            "0b14d501a594442a01c6859541bcb3e8164d183d32937b851835442f69d5c94e"
        );
        assert_eq!(hash_password("x"), hash_password("x"));
        assert_ne!(hash_password("x"), hash_password("y"));
    }

    #[test]
    fn hashes_match_requires_exact_equality() {
        let digest = hash_password("secret-pass");
        assert!(hashes_match(&digest, &digest.clone()));
        assert!(!hashes_match(&digest, &hash_password("secret-pasS")));
        assert!(!hashes_match(&digest, &digest[..10]));
    }

    #[test]
    fn registration_rejects_bad_email_and_short_password() {
        assert!(check_registration("a@b.com", "password1").is_ok());
        assert!(check_registration("first.last+tag@mail.example.org", "12345678").is_ok());
        assert_eq!(
            check_registration("not-an-email", "password1"),
            Err(CredentialError::InvalidEmail("not-an-email".to_string()))
        );
        assert_eq!(
            check_registration("a@b.com", "short"),
            Err(CredentialError::PasswordTooShort { min_chars: 8 })
        );
    }
}
