//! Post record.

use super::id::EntityId;
use super::{require_non_empty, ModelValidationError};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// A single article inside a blog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Post {
    pub id: EntityId,
    pub blog_id: EntityId,
    pub title: String,
    pub content: String,
    /// Denormalized author email, used to scope search.
    pub author: String,
    /// Unix epoch milliseconds.
    pub created_date: i64,
}

impl Post {
    /// Creates a post with a freshly generated id.
    pub fn new(
        blog_id: EntityId,
        title: impl Into<String>,
        content: impl Into<String>,
        author: impl Into<String>,
        created_date: i64,
    ) -> Result<Self, ModelValidationError> {
        let post = Self {
            id: EntityId::new(),
            blog_id,
            title: title.into(),
            content: content.into(),
            author: author.into(),
            created_date,
        };
        post.validate()?;
        Ok(post)
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        require_non_empty("title", &self.title)?;
        require_non_empty("content", &self.content)
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
}
