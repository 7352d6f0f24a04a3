//! Content analysis
//!
//! Sends cleaned page text to an [`Llm`] with the analyst prompt, pulls a
//! JSON object out of the reply and turns it into an [`AnalysisRecord`].

pub mod extract;
pub mod prompt;
pub mod record;

pub use extract::ExtractorChain;
pub use record::{AnalysisRecord, SentimentLabel};

use serde_json::Value;
use thiserror::Error;

use crate::llm::{Llm, LlmError};

/// Status string recorded for a successful analysis
pub const ANALYSIS_SUCCESS: &str = "Analysis Success";

/// Why an analysis produced no record.
///
/// The `Display` form is the status string placed in the output row.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// No extractor recognised a JSON object in the reply
    #[error("Analysis Error: {0}")]
    NoJson(String),

    /// Parsed JSON lacked the fields a record needs
    #[error("Analysis Error: {0}")]
    Schema(String),

    /// The extracted substring was not valid JSON
    #[error("JSON Decode Error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The model call itself failed (quota, safety block, network)
    #[error("Gemini API Error: {0}")]
    Llm(#[from] LlmError),
}

/// Runs the analyst prompt against an LLM for one subject
pub struct ContentAnalyzer<L> {
    llm: L,
    subject: String,
    extractors: ExtractorChain,
}

impl<L: Llm> ContentAnalyzer<L> {
    pub fn new(llm: L, subject: impl Into<String>) -> Self {
        Self {
            llm,
            subject: subject.into(),
            extractors: ExtractorChain::new(),
        }
    }

    /// Analyze `text` and return the structured record.
    pub async fn analyze(&self, text: &str) -> Result<AnalysisRecord, AnalysisError> {
        let prompt = prompt::build_prompt(&self.subject, text);
        let response = self.llm.generate(&prompt).await?;
        self.parse_response(&response)
    }

    /// Turn a raw model reply into a record
    pub fn parse_response(&self, response: &str) -> Result<AnalysisRecord, AnalysisError> {
        let Some((json, extractor)) = self.extractors.extract(response) else {
            tracing::warn!("Model did not return recognisable JSON");
            return Err(AnalysisError::NoJson(response.to_string()));
        };
        tracing::debug!("JSON located by {}", extractor);

        // Anything after the first complete value is prose, not JSON
        let value = match serde_json::Deserializer::from_str(json)
            .into_iter::<Value>()
            .next()
        {
            Some(parsed) => parsed?,
            // Blank candidate, e.g. an empty ```json fence
            None => {
                return Err(match serde_json::from_str::<Value>(json) {
                    Err(e) => AnalysisError::Decode(e),
                    Ok(_) => AnalysisError::NoJson(response.to_string()),
                })
            }
        };

        AnalysisRecord::from_value(&value).ok_or_else(|| {
            AnalysisError::Schema(format!("expected an object with a summary, got {}", value))
        })
    }
}
