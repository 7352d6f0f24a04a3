//! HTML to plain text cleaning

use scraper::{ElementRef, Html};

/// Elements whose contents are never visible text.
///
/// The parser runs with scripting enabled, so `noscript` bodies arrive as
/// raw markup text and must be dropped with the element.
const SKIPPED_ELEMENTS: [&str; 3] = ["script", "style", "noscript"];

/// Marker appended when text is cut to the character budget
pub const TRUNCATION_MARKER: &str = "...";

/// Extract visible text from an HTML document.
///
/// Script, style and noscript subtrees are dropped, text nodes are joined with single
/// spaces and all whitespace runs collapse to one space.
pub fn clean_html(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut pieces = Vec::new();
    collect_text(document.root_element(), &mut pieces);

    pieces
        .iter()
        .flat_map(|piece| piece.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

fn collect_text<'a>(element: ElementRef<'a>, pieces: &mut Vec<&'a str>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                pieces.push(trimmed);
            }
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if !SKIPPED_ELEMENTS.contains(&child_element.value().name()) {
                collect_text(child_element, pieces);
            }
        }
    }
}

/// Cut `text` to at most `max_chars` characters, appending
/// [`TRUNCATION_MARKER`] when anything was removed.
pub fn truncate_chars(text: String, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => {
            let mut truncated = text;
            truncated.truncate(byte_index);
            truncated.push_str(TRUNCATION_MARKER);
            truncated
        }
        None => text,
    }
}
