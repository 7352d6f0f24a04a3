//! LLM abstraction layer

mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from a single generation call
#[derive(Error, Debug)]
pub enum LlmError {
    /// The request never produced a response
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status (quota, auth, bad request)
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The prompt or the candidate was stopped by a safety filter
    #[error("response blocked: {0}")]
    Blocked(String),

    /// The API answered but returned no candidate text
    #[error("empty response from model")]
    EmptyResponse,

    /// The response body was not the expected JSON shape
    #[error("malformed API response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Trait for LLM backends
#[async_trait]
pub trait Llm: Send + Sync {
    /// Send a single prompt and get the raw response text
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    /// Get the model name
    fn model(&self) -> &str;
}
