//! Markdown code fence extractor
//!
//! Handles responses like:
//! ````text
//! Sure! Here is the analysis:
//! ```json
//! {"summary": "..."}
//! ```
//! ````

use regex::Regex;

use super::JsonExtractor;

/// Extracts the body of the first code fence tagged `json`
pub struct FencedBlockExtractor {
    fence_re: Regex,
}

impl Default for FencedBlockExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FencedBlockExtractor {
    pub fn new() -> Self {
        Self {
            // Non-greedy so a second fence later in the reply is left alone
            fence_re: Regex::new(r"(?s)```json[ \t]*\r?\n(.*?)\r?\n[ \t]*```").unwrap(),
        }
    }
}

impl JsonExtractor for FencedBlockExtractor {
    fn extract<'a>(&self, response: &'a str) -> Option<&'a str> {
        let caps = self.fence_re.captures(response)?;
        caps.get(1).map(|m| m.as_str())
    }

    fn name(&self) -> &'static str {
        "FencedBlockExtractor"
    }

    fn priority(&self) -> u32 {
        100
    }
}
