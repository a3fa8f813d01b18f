//! Keyword search over a user's own posts.
//!
//! # Responsibility
//! - Tokenize raw queries and match terms against post titles and content.
//! - Wrap matched text in highlight markers for display.

pub mod engine;
pub mod highlight;

pub use engine::{search_posts, tokenize, SearchError, SearchQuery, SearchResult};
pub use highlight::{HighlightMarker, Highlighter};
