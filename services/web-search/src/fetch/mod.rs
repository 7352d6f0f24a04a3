//! Page fetch service for retrieving and cleaning web content
//!
//! Every outcome, including transport failures, comes back as a
//! [`FetchRecord`] carrying a [`ScrapeStatus`]. Nothing here returns an error
//! for a bad page.

pub mod clean;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::config::FetchConfig;
use crate::error::SearchResult;
use crate::types::{FetchRecord, ScrapeStatus};
use clean::{clean_html, truncate_chars};

/// Source of cleaned page text, one URL at a time
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch `url` and return its cleaned text or the reason there is none
    async fn fetch(&self, url: &str) -> FetchRecord;
}

/// HTTP page fetcher with configurable client
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
    config: FetchConfig,
}

impl PageFetcher {
    /// Create a new PageFetcher with the given configuration
    pub fn new(config: &FetchConfig) -> SearchResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    async fn fetch_page(&self, url: &str) -> Result<FetchRecord, reqwest::Error> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Ok(FetchRecord::failed(
                url,
                ScrapeStatus::HttpStatus(status.as_u16()),
            ));
        }

        let is_html = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.to_ascii_lowercase().contains("text/html"));
        if !is_html {
            return Ok(FetchRecord::failed(url, ScrapeStatus::NotHtml));
        }

        let body = response.text().await?;
        let text = clean_html(&body);
        if text.is_empty() {
            return Ok(FetchRecord::failed(url, ScrapeStatus::NoText));
        }

        Ok(FetchRecord::success(
            url,
            truncate_chars(text, self.config.max_text_chars),
        ))
    }
}

#[async_trait]
impl PageSource for PageFetcher {
    async fn fetch(&self, url: &str) -> FetchRecord {
        match self.fetch_page(url).await {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!("Fetch of {} failed: {}", url, e);
                FetchRecord::failed(url, ScrapeStatus::Transport(error_category(&e).to_string()))
            }
        }
    }
}

/// Short name for the kind of transport failure
pub fn error_category(error: &reqwest::Error) -> &'static str {
    if error.is_timeout() {
        "Timeout"
    } else if error.is_connect() {
        "Connect"
    } else if error.is_redirect() {
        "Redirect"
    } else if error.is_decode() {
        "Decode"
    } else if error.is_body() {
        "Body"
    } else if error.is_builder() {
        "Builder"
    } else {
        "Request"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn fetcher() -> PageFetcher {
        PageFetcher::new(&FetchConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_success_returns_clean_text() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/article")
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body("<html><body><script>x()</script><p>Grid  connected.</p></body></html>")
            .create_async()
            .await;

        let url = format!("{}/article", server.url());
        let record = fetcher().fetch(&url).await;

        assert_eq!(record.status, ScrapeStatus::Success);
        assert_eq!(record.text.as_deref(), Some("Grid connected."));
        assert_eq!(record.url, url);
    }

    #[tokio::test]
    async fn test_sends_browser_user_agent() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/ua")
            .match_header("user-agent", FetchConfig::default().user_agent.as_str())
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<p>ok</p>")
            .create_async()
            .await;

        fetcher().fetch(&format!("{}/ua", server.url())).await;
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_http_404() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/missing")
            .with_status(404)
            .with_header("content-type", "text/html")
            .with_body("<p>Not Found</p>")
            .create_async()
            .await;

        let record = fetcher().fetch(&format!("{}/missing", server.url())).await;

        assert!(record.text.is_none());
        assert_eq!(record.status.to_string(), "Failed: HTTP 404");
    }

    #[tokio::test]
    async fn test_non_html_content_type() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/report.pdf")
            .with_status(200)
            .with_header("content-type", "application/pdf")
            .with_body("<html><body><p>Looks like HTML but is not</p></body></html>")
            .create_async()
            .await;

        let record = fetcher()
            .fetch(&format!("{}/report.pdf", server.url()))
            .await;

        assert!(record.text.is_none());
        assert_eq!(record.status.to_string(), "Failed: Not an HTML page");
    }

    #[tokio::test]
    async fn test_empty_page() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/blank")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html><head><style>p{}</style></head><body>   </body></html>")
            .create_async()
            .await;

        let record = fetcher().fetch(&format!("{}/blank", server.url())).await;

        assert!(record.text.is_none());
        assert_eq!(record.status, ScrapeStatus::NoText);
    }

    #[tokio::test]
    async fn test_long_page_is_truncated() {
        let mut server = Server::new_async().await;
        let body = format!("<html><body><p>{}</p></body></html>", "x".repeat(50_000));
        server
            .mock("GET", "/long")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(body)
            .create_async()
            .await;

        let record = fetcher().fetch(&format!("{}/long", server.url())).await;
        let text = record.text.unwrap();

        assert_eq!(text.len(), 35_000 + 3);
        assert!(text.ends_with("..."));
    }

    #[tokio::test]
    async fn test_transport_error_is_a_status() {
        // Nothing listens on the discard port.
        let record = fetcher().fetch("http://127.0.0.1:9/").await;

        assert!(record.text.is_none());
        assert!(matches!(record.status, ScrapeStatus::Transport(_)));
        assert!(record.status.to_string().starts_with("Failed: "));
    }
}
