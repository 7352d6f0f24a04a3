//! Google Custom Search backend
//!
//! Implements the SearchBackend trait against the Custom Search JSON API.
//! See: https://developers.google.com/custom-search/v1/reference/rest/v1/cse/list

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::SearchBackend;
use crate::config::SearchConfig;
use crate::error::{SearchError, SearchResult};
use crate::types::{PageRequest, SearchPage};

/// Google Custom Search backend
pub struct GoogleCseBackend {
    client: Client,
    config: SearchConfig,
}

impl GoogleCseBackend {
    pub fn new(config: SearchConfig) -> SearchResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("press-monitor/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }
}

// Custom Search API response types
#[derive(Debug, Deserialize)]
struct CseResponse {
    /// Absent when the page has no results
    #[serde(default)]
    items: Vec<CseItem>,
}

#[derive(Debug, Deserialize)]
struct CseItem {
    link: String,
}

#[async_trait]
impl SearchBackend for GoogleCseBackend {
    fn name(&self) -> &str {
        "google-cse"
    }

    fn is_available(&self) -> bool {
        !self.config.api_key.is_empty()
            && !self.config.engine_id.is_empty()
            && !self.config.endpoint.is_empty()
    }

    async fn search_page(&self, request: &PageRequest) -> SearchResult<SearchPage> {
        if !self.is_available() {
            return Err(SearchError::NotConfigured(self.name().to_string()));
        }

        tracing::debug!(
            query = %request.query,
            num = request.num,
            start = request.start,
            "Custom Search page request"
        );

        let params = [
            ("key", self.config.api_key.clone()),
            ("cx", self.config.engine_id.clone()),
            ("q", request.query.clone()),
            ("num", request.num.to_string()),
            ("start", request.start.to_string()),
        ];

        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Api { status, body });
        }

        let body = response.text().await?;
        let cse_response: CseResponse = serde_json::from_str(&body)?;

        Ok(SearchPage {
            links: cse_response.items.into_iter().map(|item| item.link).collect(),
        })
    }
}
