//! Per-visitor session context.
//!
//! Transports own session persistence (cookies, CLI flags); the core only
//! reads and writes the single "current user email" slot.

/// Tracks which user, if any, the current visitor is acting as.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    email: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Session already bound to `email`, e.g. restored from a cookie.
    pub fn for_email(email: impl Into<String>) -> Self {
        let mut session = Self::anonymous();
        session.bind(email);
        session
    }

    pub fn bind(&mut self, email: impl Into<String>) {
        self.email = Some(email.into());
    }

    pub fn clear(&mut self) {
        self.email = None;
    }

    /// Current user email; an empty stored value counts as anonymous.
    pub fn current_email(&self) -> Option<&str> {
        self.email.as_deref().filter(|email| !email.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_email().is_some()
    }
}
