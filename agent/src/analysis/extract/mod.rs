//! JSON extraction from free-form model output
//!
//! Models wrap their JSON in different ways - some return it bare, some in a
//! markdown code fence, some with a sentence of prose in front. Each format
//! gets its own extractor and the chain tries them in priority order; the
//! first one that finds a candidate wins.

mod fenced;
mod leading_key;

pub use fenced::FencedBlockExtractor;
pub use leading_key::LeadingKeyExtractor;

// ============================================================================
// Extractor Trait
// ============================================================================

/// Trait for locating a JSON object inside a model response
pub trait JsonExtractor: Send + Sync {
    /// Return the substring to parse, or `None` if this format is absent
    fn extract<'a>(&self, response: &'a str) -> Option<&'a str>;

    /// Extractor name for logging/debugging
    fn name(&self) -> &'static str;

    /// Priority (higher = try first)
    fn priority(&self) -> u32;
}

// ============================================================================
// Extractor Chain
// ============================================================================

/// Ordered list of extractors
pub struct ExtractorChain {
    extractors: Vec<Box<dyn JsonExtractor>>,
}

impl Default for ExtractorChain {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractorChain {
    /// Create a chain with all built-in extractors
    pub fn new() -> Self {
        let mut extractors: Vec<Box<dyn JsonExtractor>> = vec![
            Box::new(LeadingKeyExtractor::new("summary")),
            Box::new(FencedBlockExtractor::new()),
        ];

        extractors.sort_by(|a, b| b.priority().cmp(&a.priority()));

        Self { extractors }
    }

    /// Find the JSON candidate in `response`.
    ///
    /// Returns the substring and the name of the extractor that found it.
    pub fn extract<'a>(&self, response: &'a str) -> Option<(&'a str, &'static str)> {
        self.extractors
            .iter()
            .find_map(|e| e.extract(response).map(|json| (json, e.name())))
    }

    /// Get list of registered extractor names, in the order they are tried
    pub fn extractor_names(&self) -> Vec<&'static str> {
        self.extractors.iter().map(|e| e.name()).collect()
    }
}
