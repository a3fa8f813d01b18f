//! Core domain logic for the multi-user blog.
//! Users own blogs, blogs own posts, and users search their own posts.
//! This crate is the single source of truth for those invariants.

pub mod app;
pub mod auth;
pub mod db;
pub mod logging;
pub mod model;
pub mod search;
pub mod service;
pub mod session;
pub mod store;

pub use app::{BlogApp, BlogsView, PostsView, SearchView};
pub use auth::{check_registration, hash_password, CredentialError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::blog::Blog;
pub use model::id::EntityId;
pub use model::post::Post;
pub use model::user::User;
pub use model::ModelValidationError;
pub use search::{search_posts, HighlightMarker, SearchError, SearchQuery};
pub use service::blog_service::BlogService;
pub use service::user_service::UserService;
pub use service::{EntityKind, ServiceError, ServiceResult};
pub use session::Session;
pub use store::{Collection, Filter, MemoryStore, SqliteStore, Store, StoreError, StoreResult};

/// Minimal health-check API for transport wiring.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
