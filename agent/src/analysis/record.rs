//! Structured analysis output
//!
//! Model output is accepted best-effort: `summary` must be present, every
//! other field falls back to its default and out-of-range values are clamped.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Sentiment towards the subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
    #[serde(rename = "N/A")]
    NotApplicable,
    Error,
}

impl SentimentLabel {
    /// Match a model-supplied label, ignoring case and surrounding space
    pub fn from_model(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "positive" => Some(SentimentLabel::Positive),
            "negative" => Some(SentimentLabel::Negative),
            "neutral" => Some(SentimentLabel::Neutral),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::NotApplicable => "N/A",
            SentimentLabel::Error => "Error",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sentiment and topic analysis of one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub summary: String,
    /// In [-1.0, 1.0]
    pub sentiment_score: f64,
    pub sentiment_label: SentimentLabel,
    pub key_topics: Vec<String>,
    /// In 1..=5
    pub relevance_to_enec: u8,
}

impl Default for AnalysisRecord {
    fn default() -> Self {
        Self::not_applicable()
    }
}

impl AnalysisRecord {
    /// Placeholder for rows that never reached analysis
    pub fn not_applicable() -> Self {
        Self {
            summary: String::new(),
            sentiment_score: 0.0,
            sentiment_label: SentimentLabel::NotApplicable,
            key_topics: Vec::new(),
            relevance_to_enec: 1,
        }
    }

    /// Placeholder for rows whose analysis failed; the status goes in `summary`
    pub fn failed(status: impl Into<String>) -> Self {
        Self {
            summary: status.into(),
            sentiment_label: SentimentLabel::Error,
            ..Self::not_applicable()
        }
    }

    /// Build a record from a parsed JSON object.
    ///
    /// Returns `None` when `value` is not an object or has no `summary`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let summary = match object.get("summary")? {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };

        let mut record = Self {
            summary,
            ..Self::not_applicable()
        };

        if let Some(score) = object.get("sentiment_score") {
            match as_f64(score) {
                Some(s) if (-1.0..=1.0).contains(&s) => record.sentiment_score = s,
                Some(s) if s.is_finite() => {
                    tracing::warn!("sentiment_score {} out of range, clamping", s);
                    record.sentiment_score = s.clamp(-1.0, 1.0);
                }
                _ => tracing::warn!("Ignoring unusable sentiment_score: {}", score),
            }
        }

        if let Some(label) = object.get("sentiment_label") {
            match label.as_str().and_then(SentimentLabel::from_model) {
                Some(l) => record.sentiment_label = l,
                None => tracing::warn!("Unrecognised sentiment_label: {}", label),
            }
        }

        match object.get("key_topics") {
            Some(Value::Array(items)) => {
                record.key_topics = items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s.trim().to_string()),
                        Value::Null => None,
                        other => Some(other.to_string()),
                    })
                    .filter(|s| !s.is_empty())
                    .collect();
            }
            Some(Value::String(topic)) if !topic.trim().is_empty() => {
                tracing::warn!("key_topics was a single string, wrapping it");
                record.key_topics = vec![topic.trim().to_string()];
            }
            Some(other) => tracing::warn!("Ignoring unusable key_topics: {}", other),
            None => {}
        }

        if let Some(relevance) = object.get("relevance_to_enec") {
            match as_f64(relevance) {
                Some(r) if r.is_finite() => {
                    let clamped = r.round().clamp(1.0, 5.0);
                    if clamped != r {
                        tracing::warn!("relevance_to_enec {} adjusted to {}", r, clamped);
                    }
                    record.relevance_to_enec = clamped as u8;
                }
                _ => tracing::warn!("Ignoring unusable relevance_to_enec: {}", relevance),
            }
        }

        Some(record)
    }

    /// `key_topics` as a JSON array for a single table cell
    pub fn key_topics_cell(&self) -> String {
        serde_json::to_string(&self.key_topics).unwrap_or_else(|_| "[]".to_string())
    }

    /// `sentiment_score` with at least one fractional digit
    pub fn sentiment_score_cell(&self) -> String {
        format!("{:?}", self.sentiment_score)
    }
}

/// Numbers may arrive as JSON numbers or numeric strings
fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
