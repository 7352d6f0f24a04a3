//! Web Search Library
//!
//! Paged retrieval against a size-limited search API, plus page fetching
//! and text cleaning for the analysis stage.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use web_search::{backends::google::GoogleCseBackend, PagedSearchClient, SearchQuery};
//!
//! let backend = GoogleCseBackend::new(config.clone())?;
//! let client = PagedSearchClient::new(backend, &config);
//! let results = client.search(&SearchQuery::new("News", 25)).await;
//! ```
//!
//! # Configuration
//! Credentials and tunables arrive through [`SearchConfig`] and
//! [`FetchConfig`]; nothing is read from the environment here.

pub mod backends;
pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod types;

// Re-export the main entry points
pub use backends::google::GoogleCseBackend;
pub use backends::SearchBackend;
pub use client::PagedSearchClient;
pub use config::{FetchConfig, SearchConfig};
pub use error::{SearchError, SearchResult};
pub use fetch::{PageFetcher, PageSource};

// Re-export data types for direct API usage
pub use types::{
    FetchRecord, PageRequest, ScrapeStatus, SearchPage, SearchQuery, SearchResultSet,
    MAX_TOTAL_RESULTS, PAGE_SIZE,
};
