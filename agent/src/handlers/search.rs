//! Stage 1 handler: search every term and save the links

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use web_search::{GoogleCseBackend, PagedSearchClient, SearchResultSet};

use super::CommandContext;
use crate::cli::SearchArgs;
use crate::config::PressConfig;
use crate::table;

/// Handle the `search` command. Returns the path of the written CSV.
pub async fn run_search(ctx: &mut CommandContext, args: &SearchArgs) -> Result<PathBuf> {
    ctx.apply_search_args(args);
    let today = chrono::Local::now().date_naive();
    let (path, results) = search_stage(&ctx.config, today).await?;

    print!("{}", format_preview(&results));
    println!("{}", format_summary(&results, &path));
    Ok(path)
}

/// Validate, search every configured term and write the dated results file
pub async fn search_stage(
    config: &PressConfig,
    date: NaiveDate,
) -> Result<(PathBuf, Vec<SearchResultSet>)> {
    config.validate_search()?;

    let backend = GoogleCseBackend::new(config.search.clone())?;
    let client = PagedSearchClient::new(backend, &config.search);

    let results = client
        .search_all(&config.search.terms, config.search.total_results)
        .await;

    let path = output_path(&config.pipeline.output_dir, &table::search_results_filename(date))?;
    table::write_search_results(&path, &results)?;
    Ok((path, results))
}

pub(crate) fn output_path(dir: &Path, name: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    Ok(dir.join(name))
}

/// Numbered links per term, or a no-results line
pub fn format_preview(results: &[SearchResultSet]) -> String {
    let mut out = String::new();
    for result in results {
        let _ = writeln!(out, "\n--- Results for '{}' ---", result.query.term);
        if result.is_empty() {
            let _ = writeln!(out, "No results found.");
        }
        for (i, link) in result.links.iter().enumerate() {
            let _ = writeln!(out, "{}. {}", i + 1, link);
        }
        if let Some(error) = &result.error {
            let _ = writeln!(out, "(stopped early: {})", error);
        }
    }
    out
}

fn format_summary(results: &[SearchResultSet], path: &Path) -> String {
    let total: usize = results.iter().map(SearchResultSet::len).sum();
    format!(
        "\nCollected {} links for {} terms. Saved to {}",
        total,
        results.len(),
        path.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use web_search::SearchQuery;

    #[test]
    fn test_preview() {
        let results = vec![
            SearchResultSet {
                query: SearchQuery::new("News", 10),
                links: vec!["https://a.example/".into(), "https://b.example/".into()],
                error: None,
            },
            SearchResultSet {
                query: SearchQuery::new("Barakah", 10),
                links: vec![],
                error: Some("API error 429".into()),
            },
        ];

        let preview = format_preview(&results);
        assert!(preview.contains("--- Results for 'News' ---"));
        assert!(preview.contains("1. https://a.example/\n2. https://b.example/"));
        assert!(preview.contains("--- Results for 'Barakah' ---\nNo results found."));
        assert!(preview.contains("stopped early: API error 429"));
    }

    #[tokio::test]
    async fn test_search_stage_rejects_placeholder_key_before_network() {
        let mut config = PressConfig::default();
        config.search.api_key = "YOUR_GOOGLE_API_KEY_HERE".into();
        config.search.engine_id = "cx".into();
        config.search.terms = vec!["News".into()];
        // Unroutable endpoint: reaching the network would fail differently
        config.search.endpoint = "http://127.0.0.1:9/".into();

        let date = NaiveDate::from_ymd_opt(2025, 11, 2).unwrap();
        let err = search_stage(&config, date).await.unwrap_err();
        assert!(err.to_string().contains("search.api_key"));
    }
}
