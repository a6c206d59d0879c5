//! Lede extraction: the first segment of a delimited document.

use crate::input::Documents;

/// Segment delimiter used in the scraped news corpus.
pub const DEFAULT_DELIMITER: &str = "<br/>";

/// First segment of `document`, or the whole document when `delimiter` is absent or empty.
pub fn lede<'d>(document: &'d str, delimiter: &str) -> &'d str {
    if delimiter.is_empty() {
        return document;
    }
    document.split(delimiter).next().unwrap_or(document)
}

/// Lede of every document, in input order.
pub fn get_lede(documents: &Documents<'_>, delimiter: &str) -> Vec<String> {
    documents.iter().map(|d| lede(d, delimiter).to_string()).collect()
}
