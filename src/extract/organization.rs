use super::{DocumentExtractor, ExtractionResult};
use crate::task::ExtractorKind;
use regex::Regex;

/// Capitalized words ending in an organizational head noun, with an optional
/// `of ...`/`for ...` tail: "American Federation of Teachers".
const HEADED: &str = concat!(
    r"\b(?:[A-Z][\w'&.-]*\s+(?:(?:of(?:\s+the)?|for(?:\s+the)?|and|on|against)\s+)*)+",
    r"(?:Coalition|Union|Committee|Association|Alliance|Party|Federation|Council|Movement|",
    r"League|Society|Front|Network|Organization|Congress|Caucus|Collective|Campaign|Brigade|",
    r"Foundation|Guild)\b",
    r"(?:\s+(?:of|for|on|against)\s+(?:the\s+)?[A-Z][\w'-]*(?:\s+[A-Z][\w'-]*)*)?"
);

/// Movement names of the form "Students for a Democratic Society".
const FOR_CAUSE: &str = r"\b[A-Z][a-z]+\s+for\s+(?:(?:a|an|the)\s+)?[A-Z][\w'-]*(?:\s+[A-Z][\w'-]*)*";

/// Social movement organizations mentioned in a document.
pub struct OrganizationExtractor {
    patterns: [Regex; 2],
}

impl OrganizationExtractor {
    pub fn new() -> Self {
        Self {
            patterns: [
                Regex::new(HEADED).expect("headed pattern is valid"),
                Regex::new(FOR_CAUSE).expect("for-cause pattern is valid"),
            ],
        }
    }

    /// Spans from all patterns, longest first at each start, nested spans dropped.
    fn spans(&self, document: &str) -> Vec<(usize, usize)> {
        let mut spans: Vec<(usize, usize)> = self
            .patterns
            .iter()
            .flat_map(|p| p.find_iter(document).map(|m| (m.start(), m.end())))
            .collect();
        spans.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

        let mut kept: Vec<(usize, usize)> = Vec::new();
        for span in spans {
            if kept.last().is_some_and(|&(_, end)| span.0 < end) {
                continue;
            }
            kept.push(span);
        }
        kept
    }
}

impl Default for OrganizationExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentExtractor for OrganizationExtractor {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::Organization
    }

    fn extract_one(&self, document: &str, verbose: bool) -> ExtractionResult {
        let mut names: Vec<String> = Vec::new();

        for (start, end) in self.spans(document) {
            let raw = &document[start..end];
            let name = raw.strip_prefix("The ").unwrap_or(raw).trim();
            if verbose {
                log::debug!("organization: {name:?}");
            }
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }

        if names.is_empty() {
            ExtractionResult::Absent
        } else {
            ExtractionResult::Organizations(names)
        }
    }
}
