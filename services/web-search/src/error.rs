//! Error types for search backend operations

use thiserror::Error;

/// Errors that can occur while requesting a page of search results
#[derive(Error, Debug)]
pub enum SearchError {
    /// The request never produced a response (DNS, connect, timeout)
    #[error("search request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("search API error {status}: {body}")]
    Api {
        /// HTTP status code returned by the API
        status: u16,
        /// Response body, usually a JSON error document
        body: String,
    },

    /// The response body was not the expected JSON shape
    #[error("failed to parse search response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Credentials or endpoint are missing
    #[error("search backend '{0}' is not configured")]
    NotConfigured(String),
}

/// Result type alias for search operations
pub type SearchResult<T> = Result<T, SearchError>;
