use super::{DocumentExtractor, ExtractionResult};
use crate::task::ExtractorKind;
use regex::Regex;

/// Wire-story dateline: `CHICAGO, Ill. (AP) --`. A bare `-` or `:` only
/// counts after an agency tag, so `UPDATE:` is not a place.
const DATELINE: &str = concat!(
    r"^\s*([A-Z][A-Z.'\- ]*[A-Z.](?:,\s+[A-Z][A-Za-z.]+(?:\s[A-Z][A-Za-z.]+)?)?)",
    r"\s*(?:\([A-Za-z ]+\)\s*(?:--|—|–|-|:)|--|—|–)"
);

/// `in`/`at` followed by a capitalized place phrase, optionally `, Region`.
const PLACE: &str = concat!(
    r"\b(?:[Ii]n|[Aa]t)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*",
    r"(?:,\s+[A-Z][a-z]+\.?(?:\s+[A-Z][a-z]+)*)?)"
);

const NOT_PLACES: &[&str] = &[
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday",
    "Saturday", "Sunday",
];

pub struct LocationExtractor {
    dateline: Regex,
    place: Regex,
}

impl LocationExtractor {
    pub fn new() -> Self {
        Self {
            dateline: Regex::new(DATELINE).expect("dateline pattern is valid"),
            place: Regex::new(PLACE).expect("place pattern is valid"),
        }
    }

    fn from_dateline<'d>(&self, document: &'d str) -> Option<&'d str> {
        self.dateline
            .captures(document)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim())
    }

    fn from_place_phrase<'d>(&self, document: &'d str) -> Option<&'d str> {
        self.place
            .captures_iter(document)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str())
            .find(|p| {
                let first = p.split(|c: char| c.is_whitespace() || c == ',').next().unwrap_or("");
                !NOT_PLACES.contains(&first)
            })
    }
}

impl Default for LocationExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentExtractor for LocationExtractor {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::Location
    }

    fn extract_one(&self, document: &str, verbose: bool) -> ExtractionResult {
        if let Some(place) = self.from_dateline(document) {
            if verbose {
                log::debug!("location: dateline {place:?}");
            }
            return ExtractionResult::Location(place.to_string());
        }

        match self.from_place_phrase(document) {
            Some(place) => {
                if verbose {
                    log::debug!("location: phrase {place:?}");
                }
                ExtractionResult::Location(place.to_string())
            }
            None => ExtractionResult::Absent,
        }
    }
}
