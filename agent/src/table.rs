//! Tabular input/output for both pipeline stages
//!
//! Stage 1 writes `Search Term,Link` rows. Stage 2 reads them back, keeps
//! every input column and appends the analysis columns.

use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

use web_search::SearchResultSet;

use crate::pipeline::OutputRow;

pub const SEARCH_TERM_COLUMN: &str = "Search Term";
pub const LINK_COLUMN: &str = "Link";

/// Link cell written for a term that produced no results
pub const NO_RESULTS_LINK: &str = "No results found";

/// Columns appended by stage 2, in order
pub const ANALYSIS_COLUMNS: [&str; 6] = [
    "scrape_status",
    "summary",
    "sentiment_score",
    "sentiment_label",
    "key_topics",
    "relevance_to_enec",
];

const SEARCH_FILE_PREFIX: &str = "search_results_";
const ANALYSIS_FILE_PREFIX: &str = "analysis_of_";

/// Table I/O errors. All are fatal to the run.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("I/O error on {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error in {}: {}", .path.display(), .source)]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{} has no '{}' column", .path.display(), .column)]
    MissingColumn { path: PathBuf, column: &'static str },
    #[error("no search_results_*.csv file found in {}. Run the search stage first", .0.display())]
    NoInputFile(PathBuf),
}

/// One row of the stage 1 table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRow {
    /// Every cell of the row, in header order
    pub fields: Vec<String>,
    pub term: String,
    pub link: String,
}

impl InputRow {
    /// Row with only the two required columns
    pub fn new(term: impl Into<String>, link: impl Into<String>) -> Self {
        let term = term.into();
        let link = link.into();
        Self {
            fields: vec![term.clone(), link.clone()],
            term,
            link,
        }
    }
}

/// A stage 1 table as read back by stage 2
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputTable {
    pub headers: Vec<String>,
    pub rows: Vec<InputRow>,
}

/// `search_results_YYYY-MM-DD.csv`
pub fn search_results_filename(date: NaiveDate) -> String {
    format!("{}{}.csv", SEARCH_FILE_PREFIX, date.format("%Y-%m-%d"))
}

/// `analysis_of_<input file name>`
pub fn analysis_filename(input: &Path) -> String {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "search_results.csv".to_string());
    format!("{}{}", ANALYSIS_FILE_PREFIX, name)
}

/// Newest `search_results_*.csv` in `dir`, by creation time where the
/// platform records it and modification time otherwise.
pub fn latest_search_file(dir: &Path) -> Result<PathBuf, TableError> {
    let io_err = |source| TableError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if !name.starts_with(SEARCH_FILE_PREFIX) || !name.ends_with(".csv") {
            continue;
        }

        let metadata = entry.metadata().map_err(io_err)?;
        if !metadata.is_file() {
            continue;
        }
        let stamp = metadata
            .created()
            .or_else(|_| metadata.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);

        if newest.as_ref().map_or(true, |(best, _)| stamp > *best) {
            newest = Some((stamp, entry.path()));
        }
    }

    newest
        .map(|(_, path)| path)
        .ok_or_else(|| TableError::NoInputFile(dir.to_path_buf()))
}

/// Write stage 1 results, one row per link.
///
/// A term with no links gets a single [`NO_RESULTS_LINK`] row.
pub fn write_search_results(path: &Path, results: &[SearchResultSet]) -> Result<(), TableError> {
    let csv_err = |source| TableError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    writer
        .write_record([SEARCH_TERM_COLUMN, LINK_COLUMN])
        .map_err(csv_err)?;

    for result in results {
        let term = result.query.term.as_str();
        if result.is_empty() {
            writer.write_record([term, NO_RESULTS_LINK]).map_err(csv_err)?;
            continue;
        }
        for link in &result.links {
            writer.write_record([term, link.as_str()]).map_err(csv_err)?;
        }
    }

    writer.flush().map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!("Saved search results to {}", path.display());
    Ok(())
}

/// Read a stage 1 table. Extra named columns are kept; every row is padded or
/// cut to the header width.
pub fn read_input_table(path: &Path) -> Result<InputTable, TableError> {
    let csv_err = |source| TableError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| TableError::MissingColumn {
                path: path.to_path_buf(),
                column: name,
            })
    };
    let term_index = column(SEARCH_TERM_COLUMN)?;
    let link_index = column(LINK_COLUMN)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        let mut fields: Vec<String> = record.iter().map(str::to_string).collect();
        if fields.len() > headers.len() {
            tracing::warn!(
                "Row {} has {} cells for {} columns, dropping the extra cells",
                rows.len() + 1,
                fields.len(),
                headers.len()
            );
        }
        fields.resize(headers.len(), String::new());

        rows.push(InputRow {
            term: fields[term_index].clone(),
            link: fields[link_index].clone(),
            fields,
        });
    }

    Ok(InputTable { headers, rows })
}

/// Write stage 2 output: input headers followed by [`ANALYSIS_COLUMNS`].
pub fn write_output_table(
    path: &Path,
    headers: &[String],
    rows: &[OutputRow],
) -> Result<(), TableError> {
    let csv_err = |source| TableError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;

    let header_row = headers
        .iter()
        .map(String::as_str)
        .chain(ANALYSIS_COLUMNS);
    writer.write_record(header_row).map_err(csv_err)?;

    for row in rows {
        let analysis = &row.analysis;
        let mut record: Vec<String> = row.input.fields.clone();
        // Keep the analysis cells under their own headers
        record.resize(headers.len(), String::new());
        record.extend([
            row.scrape_status.to_string(),
            analysis.summary.clone(),
            analysis.sentiment_score_cell(),
            analysis.sentiment_label.to_string(),
            analysis.key_topics_cell(),
            analysis.relevance_to_enec.to_string(),
        ]);
        writer.write_record(&record).map_err(csv_err)?;
    }

    writer.flush().map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!("Saved analysis to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisRecord, SentimentLabel, ANALYSIS_SUCCESS};
    use tempfile::TempDir;
    use web_search::{ScrapeStatus, SearchQuery};

    fn result_set(term: &str, links: &[&str]) -> SearchResultSet {
        SearchResultSet {
            query: SearchQuery::new(term, 10),
            links: links.iter().map(|l| l.to_string()).collect(),
            error: None,
        }
    }

    #[test]
    fn test_filenames() {
        let date = NaiveDate::from_ymd_opt(2025, 11, 2).unwrap();
        assert_eq!(search_results_filename(date), "search_results_2025-11-02.csv");
        assert_eq!(
            analysis_filename(Path::new("/data/search_results_2025-11-02.csv")),
            "analysis_of_search_results_2025-11-02.csv"
        );
    }

    #[test]
    fn test_write_search_results_with_empty_term() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("search_results_2025-11-02.csv");

        write_search_results(
            &path,
            &[
                result_set("News", &["https://a.example/1", "https://b.example/2"]),
                result_set("Barakah, Unit 4", &[]),
            ],
        )
        .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "Search Term,Link\n\
             News,https://a.example/1\n\
             News,https://b.example/2\n\
             \"Barakah, Unit 4\",No results found\n"
        );
    }

    #[test]
    fn test_read_keeps_extra_columns_in_any_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("input.csv");
        std::fs::write(
            &path,
            "Link,Rank,Search Term\nhttps://a.example,1,News\nnot-a-url,2,News\n",
        )
        .unwrap();

        let table = read_input_table(&path).unwrap();

        assert_eq!(table.headers, vec!["Link", "Rank", "Search Term"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].term, "News");
        assert_eq!(table.rows[0].link, "https://a.example");
        assert_eq!(table.rows[1].fields, vec!["not-a-url", "2", "News"]);
    }

    #[test]
    fn test_overlong_row_keeps_output_columns_aligned() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("input.csv");
        std::fs::write(
            &input,
            "Search Term,Link\nNews,not-a-url,stray,cells\nNews\n",
        )
        .unwrap();

        let table = read_input_table(&input).unwrap();
        assert_eq!(table.rows[0].fields, vec!["News", "not-a-url"]);
        assert_eq!(table.rows[1].fields, vec!["News", ""]);

        let rows: Vec<OutputRow> = table
            .rows
            .iter()
            .map(|input| OutputRow {
                input: input.clone(),
                scrape_status: ScrapeStatus::InvalidUrl,
                analysis_status: None,
                analysis: AnalysisRecord::not_applicable(),
            })
            .collect();

        let output = dir.path().join("analysis_of_input.csv");
        write_output_table(&output, &table.headers, &rows).unwrap();

        let mut reader = csv::Reader::from_path(&output).unwrap();
        let header_len = reader.headers().unwrap().len();
        for record in reader.records() {
            let record = record.unwrap();
            assert_eq!(record.len(), header_len);
            assert_eq!(&record[2], "Invalid URL");
        }
    }

    #[test]
    fn test_read_missing_column() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("input.csv");
        std::fs::write(&path, "Search Term,URL\nNews,https://a.example\n").unwrap();

        let err = read_input_table(&path).unwrap_err();
        assert!(matches!(err, TableError::MissingColumn { column: "Link", .. }));
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_input_table(Path::new("/nonexistent/search_results.csv")).unwrap_err();
        assert!(matches!(err, TableError::Csv { .. }));
    }

    #[test]
    fn test_write_output_appends_analysis_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("analysis_of_input.csv");

        let headers = vec![SEARCH_TERM_COLUMN.to_string(), LINK_COLUMN.to_string()];
        let rows = vec![
            OutputRow {
                input: InputRow::new("News", "not-a-url"),
                scrape_status: ScrapeStatus::InvalidUrl,
                analysis_status: None,
                analysis: AnalysisRecord::not_applicable(),
            },
            OutputRow {
                input: InputRow::new("News", "https://a.example"),
                scrape_status: ScrapeStatus::Success,
                analysis_status: Some(ANALYSIS_SUCCESS.to_string()),
                analysis: AnalysisRecord {
                    summary: "Plant online.".into(),
                    sentiment_score: 0.5,
                    sentiment_label: SentimentLabel::Positive,
                    key_topics: vec!["Energy".into(), "Safety".into()],
                    relevance_to_enec: 4,
                },
            },
        ];

        write_output_table(&path, &headers, &rows).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let header: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(
            header,
            vec![
                "Search Term",
                "Link",
                "scrape_status",
                "summary",
                "sentiment_score",
                "sentiment_label",
                "key_topics",
                "relevance_to_enec"
            ]
        );

        let records: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].iter().collect::<Vec<_>>(),
            vec!["News", "not-a-url", "Invalid URL", "", "0.0", "N/A", "[]", "1"]
        );
        assert_eq!(&records[1][6], r#"["Energy","Safety"]"#);
        assert_eq!(&records[1][4], "0.5");
    }

    #[test]
    fn test_latest_search_file() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            latest_search_file(dir.path()),
            Err(TableError::NoInputFile(_))
        ));

        let older = dir.path().join("search_results_2025-11-01.csv");
        std::fs::write(&older, "Search Term,Link\n").unwrap();
        std::thread::sleep(std::time::Duration::from_millis(20));
        let newer = dir.path().join("search_results_2025-11-02.csv");
        std::fs::write(&newer, "Search Term,Link\n").unwrap();
        std::fs::write(dir.path().join("analysis_of_x.csv"), "").unwrap();
        std::fs::write(dir.path().join("search_results_notes.txt"), "").unwrap();

        assert_eq!(latest_search_file(dir.path()).unwrap(), newer);
    }
}
