//! Blog record.
//!
//! # Invariants
//! - `author_id` points at an existing `User`; `author` is that user's email
//!   copied at creation time.
//! - `title` and `description` are non-empty.

use super::id::EntityId;
use super::post::Post;
use super::{require_non_empty, ModelValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Blog {
    pub id: EntityId,
    pub author_id: EntityId,
    /// Denormalized author email.
    pub author: String,
    pub title: String,
    pub description: String,
}

impl Blog {
    /// Creates a blog with a freshly generated id.
    pub fn new(
        author: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        author_id: EntityId,
    ) -> Result<Self, ModelValidationError> {
        Self::with_id(EntityId::new(), author, title, description, author_id)
    }

    pub fn with_id(
        id: EntityId,
        author: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        author_id: EntityId,
    ) -> Result<Self, ModelValidationError> {
        let blog = Self {
            id,
            author_id,
            author: author.into(),
            title: title.into(),
            description: description.into(),
        };
        blog.validate()?;
        Ok(blog)
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        require_non_empty("title", &self.title)?;
        require_non_empty("description", &self.description)
    }

    /// Builds (but does not persist) a post in this blog.
    ///
    /// The post inherits the blog's id and author.
    pub fn new_post(
        &self,
        title: impl Into<String>,
        content: impl Into<String>,
        created_date: i64,
    ) -> Result<Post, ModelValidationError> {
        Post::new(self.id, title, content, self.author.clone(), created_date)
    }
}
