//! Analyst prompt template

/// Build the analysis prompt for `text` about `subject`.
///
/// The schema block names exactly the five fields the record reads.
pub fn build_prompt(subject: &str, text: &str) -> String {
    format!(
        r#"You are an expert public relations and sentiment analyst.
Your task is to analyze the following article text.
The primary subject of interest is "{subject}".

Based *only* on the text provided, return a JSON object with the following schema:

{{
  "summary": "A concise 1-2 sentence summary of the article.",
  "sentiment_score": "A float between -1.0 (very negative) and 1.0 (very positive) representing the sentiment towards {subject}. If {subject} is not mentioned, this should be 0.0.",
  "sentiment_label": "A single word: 'Positive', 'Negative', or 'Neutral'.",
  "key_topics": "A list of 2-3 main topics discussed (e.g., ['Nuclear Safety', 'Government Policy', 'Barakah Plant']).",
  "relevance_to_enec": "An integer from 1 (Not relevant) to 5 (Highly relevant) indicating if the article is about {subject}."
}}

Here is the article text:
---
{text}
---
"#
    )
}
