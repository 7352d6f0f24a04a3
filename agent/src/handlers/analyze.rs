//! Stage 2 handler: fetch and analyze every link of a search results file

use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use web_search::PageFetcher;

use super::search::output_path;
use super::CommandContext;
use crate::analysis::ContentAnalyzer;
use crate::config::PressConfig;
use crate::llm::{GeminiClient, Llm};
use crate::pipeline::{PipelineDriver, RunSummary};
use crate::table;

/// Handle the `analyze` command. Returns the path of the written CSV.
pub async fn run_analyze(ctx: &CommandContext) -> Result<PathBuf> {
    let (path, summary) = analyze_stage(&ctx.config).await?;
    println!("{}", format_tally(&summary));
    println!("Analysis complete. Saved to {}", path.display());
    Ok(path)
}

/// Validate, resolve the input file, run the pipeline and write the output
pub async fn analyze_stage(config: &PressConfig) -> Result<(PathBuf, RunSummary)> {
    config.validate_analysis()?;

    let input = match &config.pipeline.input_file {
        Some(path) => path.clone(),
        None => table::latest_search_file(&config.pipeline.output_dir)?,
    };
    tracing::info!("Reading links from {}", input.display());
    let input_table = table::read_input_table(&input)?;

    let llm = GeminiClient::new(&config.llm)?;
    tracing::info!("Analyzing with model {}", llm.model());

    let driver = PipelineDriver::new(
        PageFetcher::new(&config.fetch)?,
        ContentAnalyzer::new(llm, config.llm.subject.clone()),
        Duration::from_millis(config.pipeline.row_delay_ms),
    );
    let rows = driver.run(&input_table.rows).await;

    let path = output_path(&config.pipeline.output_dir, &table::analysis_filename(&input))?;
    table::write_output_table(&path, &input_table.headers, &rows)?;
    Ok((path, RunSummary::from_rows(&rows)))
}

/// Row counts per scrape status plus analysis successes
pub fn format_tally(summary: &RunSummary) -> String {
    let mut out = format!(
        "\nProcessed {} rows, {} analyzed successfully",
        summary.rows, summary.analyzed
    );
    for (status, count) in &summary.scrape_statuses {
        let _ = write!(out, "\n  {:<32} {}", status, count);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[test]
    fn test_tally() {
        let summary = RunSummary {
            rows: 3,
            analyzed: 1,
            scrape_statuses: BTreeMap::from([
                ("Invalid URL".to_string(), 1),
                ("Success".to_string(), 2),
            ]),
        };
        let text = format_tally(&summary);
        assert!(text.contains("Processed 3 rows, 1 analyzed successfully"));
        assert!(text.contains("Invalid URL"));
        assert!(text.lines().any(|l| l.trim_start().starts_with("Success") && l.ends_with('2')));
    }

    #[tokio::test]
    async fn test_missing_gemini_key_is_fatal() {
        let config = PressConfig::default();
        let err = analyze_stage(&config).await.unwrap_err();
        assert!(err.to_string().contains("llm.api_key"));
    }

    #[tokio::test]
    async fn test_no_search_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let mut config = PressConfig::default();
        config.llm.api_key = "key".into();
        config.pipeline.output_dir = dir.path().to_path_buf();

        let err = analyze_stage(&config).await.unwrap_err();
        assert!(err.downcast_ref::<table::TableError>().is_some());
    }
}
