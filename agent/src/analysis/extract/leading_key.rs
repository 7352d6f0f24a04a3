//! Leading key extractor
//!
//! Finds the first `{` immediately followed (modulo whitespace) by a known
//! key and takes everything from there to the end of the response.

use regex::Regex;

use super::JsonExtractor;

/// Extracts from the first `{"<key>":` to the end of the response
pub struct LeadingKeyExtractor {
    start_re: Regex,
}

impl LeadingKeyExtractor {
    pub fn new(key: &str) -> Self {
        let pattern = format!(r#"\{{\s*"{}"\s*:"#, regex::escape(key));
        Self {
            start_re: Regex::new(&pattern).unwrap(),
        }
    }
}

impl JsonExtractor for LeadingKeyExtractor {
    fn extract<'a>(&self, response: &'a str) -> Option<&'a str> {
        let m = self.start_re.find(response)?;
        Some(&response[m.start()..])
    }

    fn name(&self) -> &'static str {
        "LeadingKeyExtractor"
    }

    fn priority(&self) -> u32 {
        50
    }
}
