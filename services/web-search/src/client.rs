//! Paged search client
//!
//! Collects up to `total_results` links for a query by walking the search
//! API ten results at a time. Page failures end pagination for that query
//! and never escape: the caller always gets whatever was collected.

use std::time::Duration;

use crate::backends::SearchBackend;
use crate::config::SearchConfig;
use crate::types::{PageRequest, SearchQuery, SearchResultSet, PAGE_SIZE};

/// Drives a [`SearchBackend`] across pages for one query at a time
pub struct PagedSearchClient<B> {
    backend: B,
    page_delay: Duration,
}

impl<B: SearchBackend> PagedSearchClient<B> {
    pub fn new(backend: B, config: &SearchConfig) -> Self {
        Self {
            backend,
            page_delay: Duration::from_millis(config.page_delay_ms),
        }
    }

    /// Override the pause between page requests
    pub fn with_page_delay(mut self, page_delay: Duration) -> Self {
        self.page_delay = page_delay;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Collect links for `query`, one page request at a time.
    pub async fn search(&self, query: &SearchQuery) -> SearchResultSet {
        let mut links: Vec<String> = Vec::new();
        let mut error = None;

        for page in 0..query.page_count() {
            let start = page * PAGE_SIZE + 1;
            let num = PAGE_SIZE.min(query.total_results.saturating_sub(links.len()));
            if num == 0 {
                break;
            }

            if page > 0 && !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }

            tracing::info!(
                "Fetching results {} - {} for '{}'",
                start,
                start + num - 1,
                query.term
            );

            let request = PageRequest {
                query: query.term.clone(),
                num,
                start,
            };

            match self.backend.search_page(&request).await {
                Ok(result) => links.extend(result.links),
                Err(e) => {
                    tracing::warn!(
                        "An error occurred while searching for '{}': {}",
                        query.term,
                        e
                    );
                    error = Some(e.to_string());
                    break;
                }
            }
        }

        tracing::info!("Found {} total results for '{}'", links.len(), query.term);

        SearchResultSet {
            query: query.clone(),
            links,
            error,
        }
    }

    /// Search every term in order, pairing each with its result set.
    pub async fn search_all(&self, terms: &[String], total_results: usize) -> Vec<SearchResultSet> {
        let mut results = Vec::with_capacity(terms.len());
        for term in terms {
            tracing::info!("Searching for: '{}'", term);
            let query = SearchQuery::new(term.as_str(), total_results);
            results.push(self.search(&query).await);
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{SearchError, SearchResult};
    use crate::types::SearchPage;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Serves `per_page` synthetic links per request (capped at the requested
    /// count) and records every request it sees.
    struct RecordingBackend {
        requests: Mutex<Vec<PageRequest>>,
        per_page: Option<usize>,
        fail_on_call: Option<usize>,
    }

    impl RecordingBackend {
        fn new() -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                per_page: None,
                fail_on_call: None,
            }
        }

        fn requests(&self) -> Vec<PageRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SearchBackend for RecordingBackend {
        fn name(&self) -> &str {
            "recording"
        }

        fn is_available(&self) -> bool {
            true
        }

        async fn search_page(&self, request: &PageRequest) -> SearchResult<SearchPage> {
            let call = {
                let mut requests = self.requests.lock().unwrap();
                requests.push(request.clone());
                requests.len()
            };

            if self.fail_on_call == Some(call) {
                return Err(SearchError::Api {
                    status: 500,
                    body: "backend error".into(),
                });
            }

            let served = self.per_page.map_or(request.num, |n| n.min(request.num));
            Ok(SearchPage {
                links: (0..served)
                    .map(|i| format!("https://example.com/{}", request.start + i))
                    .collect(),
            })
        }
    }

    fn client(backend: RecordingBackend) -> PagedSearchClient<RecordingBackend> {
        PagedSearchClient::new(backend, &SearchConfig::default()).with_page_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_single_short_page() {
        let client = client(RecordingBackend::new());
        let results = client.search(&SearchQuery::new("News", 5)).await;

        assert_eq!(results.len(), 5);
        assert!(results.error.is_none());
        assert_eq!(
            client.backend().requests(),
            vec![PageRequest {
                query: "News".into(),
                num: 5,
                start: 1
            }]
        );
    }

    #[tokio::test]
    async fn test_page_plan_for_every_total() {
        for total in 1..=100 {
            let client = client(RecordingBackend::new());
            let results = client.search(&SearchQuery::new("News", total)).await;
            let requests = client.backend().requests();

            assert_eq!(requests.len(), total.div_ceil(10), "total {total}");
            assert_eq!(results.len(), total);

            let mut remaining = total;
            for (i, request) in requests.iter().enumerate() {
                assert_eq!(request.start, i * 10 + 1);
                assert_eq!(request.num, remaining.min(10));
                remaining -= request.num;
            }
            for pair in requests.windows(2) {
                assert_eq!(pair[1].start, pair[0].start + pair[0].num);
            }
        }
    }

    #[tokio::test]
    async fn test_over_cap_is_clamped() {
        let client = client(RecordingBackend::new());
        let results = client.search(&SearchQuery::new("News", 150)).await;

        assert_eq!(results.query.total_results, 100);
        assert_eq!(results.len(), 100);
        assert_eq!(client.backend().requests().len(), 10);
        assert_eq!(client.backend().requests().last().unwrap().start, 91);
    }

    #[tokio::test(start_paused = true)]
    async fn test_page_delay_only_between_pages() {
        let client = PagedSearchClient::new(RecordingBackend::new(), &SearchConfig::default())
            .with_page_delay(Duration::from_millis(100));

        let started = tokio::time::Instant::now();
        let results = client.search(&SearchQuery::new("News", 30)).await;

        assert_eq!(results.len(), 30);
        assert_eq!(client.backend().requests().len(), 3);
        assert_eq!(started.elapsed(), Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_page_has_no_delay() {
        let client = PagedSearchClient::new(RecordingBackend::new(), &SearchConfig::default())
            .with_page_delay(Duration::from_millis(100));

        let started = tokio::time::Instant::now();
        client.search(&SearchQuery::new("News", 10)).await;

        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_failure_returns_partial_results() {
        let mut backend = RecordingBackend::new();
        backend.fail_on_call = Some(3);
        let client = client(backend);

        let results = client.search(&SearchQuery::new("News", 50)).await;

        assert_eq!(results.len(), 20);
        assert!(results.is_partial());
        assert!(results.error.as_deref().unwrap().contains("500"));
        assert_eq!(client.backend().requests().len(), 3);
    }

    #[tokio::test]
    async fn test_failure_on_first_page_is_empty() {
        let mut backend = RecordingBackend::new();
        backend.fail_on_call = Some(1);
        let client = client(backend);

        let results = client.search(&SearchQuery::new("News", 30)).await;

        assert!(results.is_empty());
        assert!(results.error.is_some());
    }

    #[tokio::test]
    async fn test_short_pages_widen_next_request() {
        let mut backend = RecordingBackend::new();
        backend.per_page = Some(4);
        let client = client(backend);

        let results = client.search(&SearchQuery::new("News", 15)).await;
        let requests = client.backend().requests();

        // First page yields only 4 of 10, so the second asks for min(10, 11).
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].num, 10);
        assert_eq!(requests[1].start, 11);
        assert_eq!(results.len(), 8);
    }

    #[tokio::test]
    async fn test_search_all_keeps_term_order() {
        let client = client(RecordingBackend::new());
        let terms = vec!["ENEC".to_string(), "Barakah".to_string()];

        let results = client.search_all(&terms, 3).await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].query.term, "ENEC");
        assert_eq!(results[1].query.term, "Barakah");
        assert!(results.iter().all(|r| r.len() == 3));
    }
}
