//! Store-backed post search.
//!
//! # Invariants
//! - Only posts whose `author` equals the searching user's email are
//!   returned.
//! - Matching is a case-insensitive literal substring test per term, over
//!   `title` then `content`, so every hit has something to highlight.
//! - Each post appears once, at the position it was first matched.

use super::highlight::{HighlightMarker, Highlighter};
use crate::model::post::Post;
use crate::store::{Filter, Store, StoreError};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

const SEARCH_FIELDS: [&str; 2] = ["title", "content"];

pub type SearchResult<T> = Result<T, SearchError>;

#[derive(Debug)]
pub enum SearchError {
    /// The query has no usable terms or a term cannot be highlighted.
    InvalidQuery { query: String, message: String },
    Store(StoreError),
}

impl Display for SearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidQuery { query, message } => {
                write!(f, "invalid search query `{query}`: {message}")
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SearchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidQuery { .. } => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for SearchError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Raw user query plus rendering options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    pub marker: HighlightMarker,
}

impl SearchQuery {
    /// Query with the default `<mark>` marker.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marker: HighlightMarker::default(),
        }
    }

    pub fn with_marker(mut self, marker: HighlightMarker) -> Self {
        self.marker = marker;
        self
    }
}

/// Splits a raw query on whitespace.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Finds `author_email`'s posts matching any query term, highlighted.
///
/// # Errors
/// - `InvalidQuery` when the query holds no terms.
/// - `Store` when a lookup fails.
pub fn search_posts<S: Store>(
    store: &S,
    author_email: &str,
    query: &SearchQuery,
) -> SearchResult<Vec<Post>> {
    let terms = tokenize(&query.text);
    if terms.is_empty() {
        return Err(SearchError::InvalidQuery {
            query: query.text.clone(),
            message: "query contains no search terms".to_string(),
        });
    }

    let highlighter =
        Highlighter::new(&terms, query.marker.clone()).map_err(|err| SearchError::InvalidQuery {
            query: query.text.clone(),
            message: err.to_string(),
        })?;

    let mut matches: Vec<Post> = Vec::new();
    for field in SEARCH_FIELDS {
        for term in &terms {
            let filter = Filter::new()
                .eq("author", author_email)
                .contains(field, *term);
            for post in store.find::<Post>(&filter)? {
                if !matches.contains(&post) {
                    matches.push(post);
                }
            }
        }
    }
    debug!(
        "event=search_match module=search status=ok terms={} candidates={}",
        terms.len(),
        matches.len()
    );

    let results = matches
        .into_iter()
        .map(|mut post| {
            post.title = highlighter.apply(&post.title);
            post.content = highlighter.apply(&post.content);
            post
        })
        .collect::<Vec<_>>();

    info!(
        "event=search module=search status=ok terms={} hits={}",
        terms.len(),
        results.len()
    );
    Ok(results)
}
