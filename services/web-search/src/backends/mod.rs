//! Search backend implementations
//!
//! This module provides a trait-based abstraction for search backends.
//! Currently supports Google Programmable Search (Custom Search JSON API).

use async_trait::async_trait;

use crate::error::SearchResult;
use crate::types::{PageRequest, SearchPage};

pub mod google;

/// Trait for search backends
///
/// A backend serves exactly one page per call. Pagination, result caps and
/// courtesy delays belong to [`crate::PagedSearchClient`].
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Get the name of this backend
    fn name(&self) -> &str;

    /// Fetch one page of results
    ///
    /// A page with no items is an empty [`SearchPage`], not an error.
    async fn search_page(&self, request: &PageRequest) -> SearchResult<SearchPage>;

    /// Check if this backend is configured and available
    fn is_available(&self) -> bool;
}
