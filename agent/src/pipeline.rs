//! Stage 2 pipeline driver
//!
//! Walks the stage 1 rows in order: validate the link, fetch and clean the
//! page, analyze the text. Every failure is recorded on its own row and the
//! loop moves on, so the output always has one row per input row.

use std::collections::BTreeMap;
use std::time::Duration;

use web_search::{PageSource, ScrapeStatus};

use crate::analysis::{AnalysisRecord, ContentAnalyzer, ANALYSIS_SUCCESS};
use crate::llm::Llm;
use crate::table::InputRow;

/// One output row: the input row plus scrape and analysis results
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRow {
    pub input: InputRow,
    pub scrape_status: ScrapeStatus,
    /// `None` when the row never reached analysis
    pub analysis_status: Option<String>,
    pub analysis: AnalysisRecord,
}

impl OutputRow {
    /// Row that stopped before analysis
    fn not_analyzed(input: &InputRow, scrape_status: ScrapeStatus) -> Self {
        Self {
            input: input.clone(),
            scrape_status,
            analysis_status: None,
            analysis: AnalysisRecord::not_applicable(),
        }
    }

    pub fn is_analyzed(&self) -> bool {
        self.analysis_status.as_deref() == Some(ANALYSIS_SUCCESS)
    }
}

/// Counts of row outcomes for the end-of-run report
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub rows: usize,
    pub analyzed: usize,
    /// Rows per scrape status string
    pub scrape_statuses: BTreeMap<String, usize>,
}

impl RunSummary {
    pub fn from_rows(rows: &[OutputRow]) -> Self {
        let mut summary = Self {
            rows: rows.len(),
            ..Default::default()
        };
        for row in rows {
            *summary
                .scrape_statuses
                .entry(row.scrape_status.to_string())
                .or_default() += 1;
            if row.is_analyzed() {
                summary.analyzed += 1;
            }
        }
        summary
    }
}

/// True for absolute http(s) URLs with a host
pub fn is_plausible_url(link: &str) -> bool {
    match url::Url::parse(link.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

/// Fetches and analyzes rows strictly one at a time
pub struct PipelineDriver<P, L> {
    pages: P,
    analyzer: ContentAnalyzer<L>,
    row_delay: Duration,
}

impl<P: PageSource, L: Llm> PipelineDriver<P, L> {
    pub fn new(pages: P, analyzer: ContentAnalyzer<L>, row_delay: Duration) -> Self {
        Self {
            pages,
            analyzer,
            row_delay,
        }
    }

    /// Process every row in order. Output length always equals input length.
    pub async fn run(&self, rows: &[InputRow]) -> Vec<OutputRow> {
        tracing::info!("Found {} links to analyze", rows.len());

        let mut results = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            let output = self.process_row(index, rows.len(), row).await;
            let analyzed = output.is_analyzed();
            results.push(output);

            // Pace outbound requests after each fully processed row
            if analyzed && !self.row_delay.is_zero() {
                tokio::time::sleep(self.row_delay).await;
            }
        }
        results
    }

    async fn process_row(&self, index: usize, total: usize, row: &InputRow) -> OutputRow {
        let position = index + 1;

        if !is_plausible_url(&row.link) {
            tracing::info!("Skipping [#{}] (Invalid URL): {}", position, row.link);
            return OutputRow::not_analyzed(row, ScrapeStatus::InvalidUrl);
        }

        tracing::info!("Analyzing [#{}/{}]: {}", position, total, row.link);

        let fetched = self.pages.fetch(row.link.trim()).await;
        let text = match fetched.text {
            Some(text) if fetched.status.is_success() => text,
            _ => {
                tracing::warn!("[#{}] Scrape Status: {}", position, fetched.status);
                return OutputRow::not_analyzed(row, fetched.status);
            }
        };

        tracing::info!(
            "[#{}] Scrape Status: Success (found {} chars)",
            position,
            text.chars().count()
        );

        match self.analyzer.analyze(&text).await {
            Ok(analysis) => {
                tracing::info!(
                    "[#{}] Analysis Status: Success (Sentiment: {})",
                    position,
                    analysis.sentiment_label
                );
                OutputRow {
                    input: row.clone(),
                    scrape_status: fetched.status,
                    analysis_status: Some(ANALYSIS_SUCCESS.to_string()),
                    analysis,
                }
            }
            Err(e) => {
                let status = e.to_string();
                tracing::warn!("[#{}] Analysis Status: {}", position, status);
                OutputRow {
                    input: row.clone(),
                    scrape_status: fetched.status,
                    analysis_status: Some(status.clone()),
                    analysis: AnalysisRecord::failed(status),
                }
            }
        }
    }
}
