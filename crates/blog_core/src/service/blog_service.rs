//! Blog and post use cases.
//!
//! # Invariants
//! - A blog is only written when its `author_id` resolves to a user.
//! - A post is only written when its `blog_id` resolves to a blog.
//! - Empty titles, descriptions and contents are rejected; nothing is
//!   trimmed first.

use crate::model::blog::Blog;
use crate::model::id::EntityId;
use crate::model::post::{now_epoch_ms, Post};
use crate::model::user::User;
use crate::service::{EntityKind, ServiceError, ServiceResult};
use crate::store::{Filter, Store};
use log::info;

/// Use-case service for blogs and their posts.
pub struct BlogService<S: Store> {
    store: S,
}

impl<S: Store> BlogService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validates and persists a blog owned by `author_id`.
    pub fn create_blog(
        &self,
        author: &str,
        title: &str,
        description: &str,
        author_id: EntityId,
    ) -> ServiceResult<Blog> {
        let blog = Blog::new(author, title, description, author_id)?;
        if self
            .store
            .find_one::<User>(&Filter::new().eq("id", author_id))?
            .is_none()
        {
            return Err(ServiceError::not_found(EntityKind::User, author_id));
        }

        self.store.insert(&blog)?;
        info!(
            "event=blog_create module=service status=ok blog_id={} author_id={}",
            blog.id, blog.author_id
        );
        Ok(blog)
    }

    /// Validates and persists a post in `blog_id`, stamped with the current time.
    pub fn create_post(
        &self,
        blog_id: EntityId,
        title: &str,
        content: &str,
        author: &str,
    ) -> ServiceResult<Post> {
        let post = Post::new(blog_id, title, content, author, now_epoch_ms())?;
        self.load_blog(&blog_id)?;

        self.store.insert(&post)?;
        info!(
            "event=post_create module=service status=ok post_id={} blog_id={}",
            post.id, post.blog_id
        );
        Ok(post)
    }

    /// All posts whose `blog_id` is `blog.id`, in creation order.
    pub fn list_posts(&self, blog: &Blog) -> ServiceResult<Vec<Post>> {
        Ok(self
            .store
            .find::<Post>(&Filter::new().eq("blog_id", blog.id))?)
    }

    pub fn load_blog(&self, id: &EntityId) -> ServiceResult<Blog> {
        self.store
            .find_one::<Blog>(&Filter::new().eq("id", *id))?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Blog, id))
    }

    pub fn load_post(&self, id: &EntityId) -> ServiceResult<Post> {
        self.store
            .find_one::<Post>(&Filter::new().eq("id", *id))?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Post, id))
    }
}
