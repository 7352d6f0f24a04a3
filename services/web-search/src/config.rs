//! Configuration for the search and fetch services
//!
//! These structs are plain data handed to each component's constructor.
//! Loading them from files or the environment is the caller's job.

use serde::{Deserialize, Serialize};

/// Search API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// API key for the search service
    #[serde(default)]
    pub api_key: String,
    /// Custom search engine (collection) id
    #[serde(default)]
    pub engine_id: String,
    /// Query terms to search for
    #[serde(default)]
    pub terms: Vec<String>,
    /// Total results wanted per term (capped at 100)
    #[serde(default = "default_total_results")]
    pub total_results: usize,
    /// Pause between page requests, in milliseconds
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,
    /// Search API endpoint
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,
}

/// Page fetch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// User-Agent header sent with every fetch
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Maximum characters of cleaned text kept per page
    #[serde(default = "default_max_text_chars")]
    pub max_text_chars: usize,
}

// Default value functions
fn default_total_results() -> usize {
    10
}

fn default_page_delay_ms() -> u64 {
    100
}

fn default_search_endpoint() -> String {
    "https://www.googleapis.com/customsearch/v1".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
        .to_string()
}

fn default_max_text_chars() -> usize {
    35_000
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            engine_id: String::new(),
            terms: Vec::new(),
            total_results: default_total_results(),
            page_delay_ms: default_page_delay_ms(),
            endpoint: default_search_endpoint(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            user_agent: default_user_agent(),
            max_text_chars: default_max_text_chars(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_defaults() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout_seconds, 10);
        assert_eq!(config.max_text_chars, 35_000);
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_search_partial_deserialize() {
        let config: SearchConfig =
            serde_json::from_str(r#"{"api_key": "k", "engine_id": "cx"}"#).unwrap();
        assert_eq!(config.total_results, 10);
        assert_eq!(config.page_delay_ms, 100);
        assert!(config.endpoint.contains("customsearch/v1"));
        assert!(config.terms.is_empty());
    }
}
