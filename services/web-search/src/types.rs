//! Common types for search results and fetched pages
//!
//! These types are shared by the search backends, the paged client and the
//! page fetcher.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum results the search API returns per request
pub const PAGE_SIZE: usize = 10;

/// Hard cap on results the search API serves for one query
pub const MAX_TOTAL_RESULTS: usize = 100;

/// A query term and how many results to collect for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// The search query string
    pub term: String,
    /// Total results wanted, already clamped to [`MAX_TOTAL_RESULTS`]
    pub total_results: usize,
}

impl SearchQuery {
    /// Create a query, clamping `total_results` to the API cap.
    ///
    /// Values above the cap are reduced with a warning rather than rejected.
    pub fn new(term: impl Into<String>, total_results: usize) -> Self {
        let term = term.into();
        let total_results = if total_results > MAX_TOTAL_RESULTS {
            tracing::warn!(
                "API limit is {} results. Clamping {} to {} for '{}'",
                MAX_TOTAL_RESULTS,
                total_results,
                MAX_TOTAL_RESULTS,
                term
            );
            MAX_TOTAL_RESULTS
        } else {
            total_results
        };

        Self {
            term,
            total_results,
        }
    }

    /// Number of page requests needed to reach `total_results`
    pub fn page_count(&self) -> usize {
        self.total_results.div_ceil(PAGE_SIZE)
    }
}

/// One page request against the search API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// The search query string
    pub query: String,
    /// Results requested on this page (1..=10)
    pub num: usize,
    /// 1-based index of the first result on this page
    pub start: usize,
}

/// Links returned for one page, in API relevance order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage {
    pub links: Vec<String>,
}

/// Ordered links collected for one query across all pages
///
/// May hold fewer links than requested when the API runs dry or a page
/// request fails part way through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultSet {
    /// The query that was executed
    pub query: SearchQuery,
    /// Result links in relevance order
    pub links: Vec<String>,
    /// Set when pagination stopped early because a page request failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResultSet {
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// True when fewer links came back than were requested
    pub fn is_partial(&self) -> bool {
        self.links.len() < self.query.total_results
    }
}

/// Outcome of scraping one URL
///
/// The `Display` form is the status string written to the output table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrapeStatus {
    /// Text was extracted
    Success,
    /// The link was not an http(s) URL, so nothing was fetched
    InvalidUrl,
    /// The server answered with a non-200 status
    HttpStatus(u16),
    /// The content type was not `text/html`
    NotHtml,
    /// The page parsed but had no visible text
    NoText,
    /// The request failed before a response arrived; holds the error category
    Transport(String),
}

impl ScrapeStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ScrapeStatus::Success)
    }
}

impl fmt::Display for ScrapeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrapeStatus::Success => write!(f, "Success"),
            ScrapeStatus::InvalidUrl => write!(f, "Invalid URL"),
            ScrapeStatus::HttpStatus(code) => write!(f, "Failed: HTTP {}", code),
            ScrapeStatus::NotHtml => write!(f, "Failed: Not an HTML page"),
            ScrapeStatus::NoText => write!(f, "Failed: No text found on page"),
            ScrapeStatus::Transport(category) => write!(f, "Failed: {}", category),
        }
    }
}

/// Result of fetching and cleaning one URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRecord {
    /// The fetched URL
    pub url: String,
    /// Cleaned page text, present only on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Scrape outcome
    pub status: ScrapeStatus,
}

impl FetchRecord {
    pub fn success(url: &str, text: String) -> Self {
        Self {
            url: url.to_string(),
            text: Some(text),
            status: ScrapeStatus::Success,
        }
    }

    pub fn failed(url: &str, status: ScrapeStatus) -> Self {
        Self {
            url: url.to_string(),
            text: None,
            status,
        }
    }
}
