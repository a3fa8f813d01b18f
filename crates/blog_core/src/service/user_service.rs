//! Account use cases: registration, login and the user → blogs relation.
//!
//! # Invariants
//! - Email uniqueness is checked right before insert. The check and the
//!   insert are not atomic; a store-level unique violation on `email` is
//!   reported as the same `DuplicateEmail` error.
//! - Password hashes are compared in constant time.

use crate::auth::hashes_match;
use crate::model::blog::Blog;
use crate::model::id::EntityId;
use crate::model::user::User;
use crate::service::{EntityKind, ServiceError, ServiceResult};
use crate::session::Session;
use crate::store::{Filter, Store, StoreError};
use log::{info, warn};

/// Use-case service for accounts.
pub struct UserService<S: Store> {
    store: S,
}

impl<S: Store> UserService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Persists a new account and binds `session` to it.
    ///
    /// `password_hash` must already be digested (see `auth::hash_password`).
    pub fn register_user(
        &self,
        email: &str,
        password_hash: &str,
        session: &mut Session,
    ) -> ServiceResult<User> {
        if self.find_user(email)?.is_some() {
            warn!("event=user_register module=service status=rejected error_code=duplicate_email");
            return Err(ServiceError::DuplicateEmail(email.to_string()));
        }

        let user = User::new(email, password_hash)?;
        match self.store.insert(&user) {
            Ok(()) => {}
            Err(StoreError::UniqueViolation { field, .. }) if field == "email" => {
                warn!("event=user_register module=service status=rejected error_code=duplicate_email_race");
                return Err(ServiceError::DuplicateEmail(email.to_string()));
            }
            Err(err) => return Err(err.into()),
        }

        session.bind(user.email.as_str());
        info!(
            "event=user_register module=service status=ok user_id={}",
            user.id
        );
        Ok(user)
    }

    /// True iff a user with exactly this email and password hash exists.
    pub fn validate_credentials(&self, email: &str, password_hash: &str) -> ServiceResult<bool> {
        Ok(self
            .find_user(email)?
            .is_some_and(|user| hashes_match(&user.password_hash, password_hash)))
    }

    /// Checks credentials and binds `session` on success.
    ///
    /// On failure the session is cleared and `InvalidCredentials` returned.
    /// A failing lookup also clears the session before its error propagates.
    pub fn login(
        &self,
        email: &str,
        password_hash: &str,
        session: &mut Session,
    ) -> ServiceResult<User> {
        let user = self
            .find_user(email)
            .inspect_err(|err| {
                session.clear();
                warn!("event=user_login module=service status=error error={err}");
            })?
            .filter(|user| hashes_match(&user.password_hash, password_hash));

        match user {
            Some(user) => {
                session.bind(user.email.as_str());
                info!("event=user_login module=service status=ok user_id={}", user.id);
                Ok(user)
            }
            None => {
                session.clear();
                warn!("event=user_login module=service status=rejected error_code=invalid_credentials");
                Err(ServiceError::InvalidCredentials)
            }
        }
    }

    pub fn find_by_email(&self, email: &str) -> ServiceResult<User> {
        self.find_user(email)?
            .ok_or_else(|| ServiceError::not_found(EntityKind::User, email))
    }

    pub fn find_by_id(&self, id: &EntityId) -> ServiceResult<User> {
        self.store
            .find_one::<User>(&Filter::new().eq("id", *id))?
            .ok_or_else(|| ServiceError::not_found(EntityKind::User, id))
    }

    /// Resolves the acting user from session state.
    pub fn current_user(&self, session: &Session) -> ServiceResult<User> {
        let email = session
            .current_email()
            .ok_or(ServiceError::NotAuthenticated)?;
        self.find_by_email(email)
    }

    /// All blogs whose `author_id` is `user.id`, in creation order.
    pub fn list_blogs(&self, user: &User) -> ServiceResult<Vec<Blog>> {
        Ok(self
            .store
            .find::<Blog>(&Filter::new().eq("author_id", user.id))?)
    }

    fn find_user(&self, email: &str) -> ServiceResult<Option<User>> {
        Ok(self
            .store
            .find_one::<User>(&Filter::new().eq("email", email))?)
    }
}
