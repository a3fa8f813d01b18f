//! Transport-neutral request facade.
//!
//! # Responsibility
//! - Resolve the acting user from `Session` and run the matching use case.
//! - Return the view data a transport renders (blog lists, post lists,
//!   search results). Rendering itself happens elsewhere.
//!
//! # Invariants
//! - Operations that need a user fail with `NotAuthenticated` on an
//!   anonymous session, before touching the store.
//! - Failed registration input or failed login leaves the session anonymous.

use crate::auth::{check_registration, hash_password};
use crate::model::blog::Blog;
use crate::model::id::EntityId;
use crate::model::post::Post;
use crate::model::user::User;
use crate::search::{search_posts, SearchQuery};
use crate::service::blog_service::BlogService;
use crate::service::user_service::UserService;
use crate::service::{ServiceError, ServiceResult};
use crate::session::Session;
use crate::store::Store;
use serde::Serialize;

/// A user's blog list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlogsView {
    pub user_id: EntityId,
    pub email: String,
    pub blogs: Vec<Blog>,
}

/// One blog's posts plus the acting user's blogs for navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostsView {
    pub blog: Blog,
    pub posts: Vec<Post>,
    pub blogs: Vec<Blog>,
}

/// Highlighted matches plus the acting user's blogs for navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchView {
    pub query: String,
    pub posts: Vec<Post>,
    pub blogs: Vec<Blog>,
}

/// Request-level entry points over one store handle.
pub struct BlogApp<S: Store + Clone> {
    store: S,
    users: UserService<S>,
    blogs: BlogService<S>,
}

impl<S: Store + Clone> BlogApp<S> {
    pub fn new(store: S) -> Self {
        Self {
            users: UserService::new(store.clone()),
            blogs: BlogService::new(store.clone()),
            store,
        }
    }

    pub fn users(&self) -> &UserService<S> {
        &self.users
    }

    pub fn blogs(&self) -> &BlogService<S> {
        &self.blogs
    }

    /// Registers from a plain password and logs the new user in.
    pub fn register(
        &self,
        session: &mut Session,
        email: &str,
        password: &str,
    ) -> ServiceResult<BlogsView> {
        if let Err(err) = check_registration(email, password) {
            session.clear();
            return Err(err.into());
        }
        let user = self
            .users
            .register_user(email, &hash_password(password), session)?;
        self.blogs_view(user)
    }

    /// Logs in from a plain password.
    pub fn login(
        &self,
        session: &mut Session,
        email: &str,
        password: &str,
    ) -> ServiceResult<BlogsView> {
        let user = self.users.login(email, &hash_password(password), session)?;
        self.blogs_view(user)
    }

    /// Landing data: `None` for anonymous visitors, the blog list otherwise.
    pub fn home(&self, session: &Session) -> ServiceResult<Option<BlogsView>> {
        if !session.is_authenticated() {
            return Ok(None);
        }
        self.user_blogs(session, None).map(Some)
    }

    /// Blogs of `user_id`, or of the session user when no id is given.
    pub fn user_blogs(
        &self,
        session: &Session,
        user_id: Option<&EntityId>,
    ) -> ServiceResult<BlogsView> {
        let user = match user_id {
            Some(id) => self.users.find_by_id(id)?,
            None => self.users.current_user(session)?,
        };
        self.blogs_view(user)
    }

    pub fn blog_posts(&self, session: &Session, blog_id: &EntityId) -> ServiceResult<PostsView> {
        let user = self.users.current_user(session)?;
        let blog = self.blogs.load_blog(blog_id)?;
        let posts = self.blogs.list_posts(&blog)?;
        let blogs = self.users.list_blogs(&user)?;
        Ok(PostsView { blog, posts, blogs })
    }

    /// Creates a blog authored by the session user.
    pub fn create_blog(
        &self,
        session: &Session,
        title: &str,
        description: &str,
    ) -> ServiceResult<BlogsView> {
        let user = self.users.current_user(session)?;
        self.blogs
            .create_blog(&user.email, title, description, user.id)?;
        self.blogs_view(user)
    }

    /// Creates a post in `blog_id` authored by the session user.
    pub fn create_post(
        &self,
        session: &Session,
        blog_id: &EntityId,
        title: &str,
        content: &str,
    ) -> ServiceResult<PostsView> {
        let user = self.users.current_user(session)?;
        self.blogs
            .create_post(*blog_id, title, content, &user.email)?;
        self.blog_posts(session, blog_id)
    }

    /// Searches the session user's posts. An absent query is invalid.
    pub fn search(&self, session: &Session, raw_query: Option<&str>) -> ServiceResult<SearchView> {
        let user = self.users.current_user(session)?;
        let text = raw_query.ok_or_else(|| ServiceError::InvalidQuery {
            query: String::new(),
            message: "missing search parameter".to_string(),
        })?;

        let query = SearchQuery::new(text);
        let posts = search_posts(&self.store, &user.email, &query)?;
        let blogs = self.users.list_blogs(&user)?;
        Ok(SearchView {
            query: query.text,
            posts,
            blogs,
        })
    }

    fn blogs_view(&self, user: User) -> ServiceResult<BlogsView> {
        let blogs = self.users.list_blogs(&user)?;
        Ok(BlogsView {
            user_id: user.id,
            email: user.email,
            blogs,
        })
    }
}
