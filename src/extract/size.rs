use super::{DocumentExtractor, ExtractionResult};
use crate::task::ExtractorKind;
use regex::Regex;
use std::sync::LazyLock;

/// A count (digits or number words) followed within three words by a crowd noun.
static CROWD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)\b(\d{1,3}(?:,\d{3})+|\d+|",
        r"(?:tens|hundreds) of thousands|dozens|scores|hundreds|thousands|",
        r"a dozen|a hundred|a thousand|",
        r"one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve|thirteen|fourteen|",
        r"fifteen|sixteen|seventeen|eighteen|nineteen|twenty|thirty|forty|fifty|sixty|seventy|",
        r"eighty|ninety)\b",
        r"(?:\s+[\w-]+){0,2}?\s+",
        r"(protesters|protestors|demonstrators|people|persons|students|marchers|activists|",
        r"workers|supporters|participants|residents|members|picketers|strikers|women|men|",
        r"individuals|youths|citizens)\b",
    ))
    .expect("crowd pattern is valid")
});

/// Estimated crowd size: the largest count attached to a crowd noun.
pub struct SizeExtractor {
    pattern: &'static Regex,
}

impl SizeExtractor {
    pub fn new() -> Self {
        Self { pattern: &CROWD }
    }
}

impl Default for SizeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentExtractor for SizeExtractor {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::Size
    }

    fn extract_one(&self, document: &str, verbose: bool) -> ExtractionResult {
        let mut best: Option<u64> = None;

        for caps in self.pattern.captures_iter(document) {
            let Some(count) = parse_count(&caps[1]) else {
                continue;
            };
            if verbose {
                log::debug!("size: {:?} -> {count}", &caps[0]);
            }
            best = Some(best.map_or(count, |b| b.max(count)));
        }

        best.map_or(ExtractionResult::Absent, ExtractionResult::Size)
    }
}

/// Numeric value of a count phrase. Vague plurals map to a conservative figure.
fn parse_count(raw: &str) -> Option<u64> {
    let lower = raw.to_lowercase();
    let value = match lower.as_str() {
        "a dozen" => 12,
        "dozens" => 24,
        "scores" => 40,
        "a hundred" => 100,
        "hundreds" => 200,
        "a thousand" => 1_000,
        "thousands" => 2_000,
        "tens of thousands" => 20_000,
        "hundreds of thousands" => 200_000,
        "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        "thirteen" => 13,
        "fourteen" => 14,
        "fifteen" => 15,
        "sixteen" => 16,
        "seventeen" => 17,
        "eighteen" => 18,
        "nineteen" => 19,
        "twenty" => 20,
        "thirty" => 30,
        "forty" => 40,
        "fifty" => 50,
        "sixty" => 60,
        "seventy" => 70,
        "eighty" => 80,
        "ninety" => 90,
        digits if looks_like_year(digits) => return None,
        digits => return digits.replace(',', "").parse().ok(),
    };
    Some(value)
}

/// Four bare digits in 1900..=2099 read as a year, not a head count.
fn looks_like_year(digits: &str) -> bool {
    digits.len() == 4 && digits.parse::<u16>().is_ok_and(|y| (1900..=2099).contains(&y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(doc: &str) -> ExtractionResult {
        SizeExtractor::new().extract_one(doc, false)
    }

    #[test]
    fn test_digits_next_to_noun() {
        assert_eq!(size("About 300 protesters gathered downtown."), ExtractionResult::Size(300));
    }

    #[test]
    fn test_thousands_separator_and_largest_wins() {
        assert_eq!(
            size("Police said 1,200 people marched, though organizers counted 5,000 marchers."),
            ExtractionResult::Size(5_000)
        );
    }

    #[test]
    fn test_number_words() {
        assert_eq!(size("Dozens of students occupied the hall."), ExtractionResult::Size(24));
        assert_eq!(
            size("Tens of thousands of demonstrators filled the square."),
            ExtractionResult::Size(20_000)
        );
        assert_eq!(size("Twelve striking workers were arrested."), ExtractionResult::Size(12));
    }

    #[test]
    fn test_noun_too_far_away() {
        assert_eq!(size("The 12 demands were read aloud to the crowd."), ExtractionResult::Absent);
        assert_eq!(size("In 1968 many angry young people marched."), ExtractionResult::Absent);
    }

    #[test]
    fn test_year_is_not_a_count() {
        assert_eq!(size("In 2017 students marched."), ExtractionResult::Absent);
        assert_eq!(
            size("In 2017 students marched, and 40 workers joined them."),
            ExtractionResult::Size(40)
        );
        assert_eq!(size("Some 1,999 protesters came."), ExtractionResult::Size(1_999));
        assert_eq!(size("About 3000 strikers picketed."), ExtractionResult::Size(3_000));
    }

    #[test]
    fn test_no_count() {
        assert!(size("Students rallied outside the capitol.").is_absent());
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("12,500"), Some(12_500));
        assert_eq!(parse_count("Hundreds"), Some(200));
        assert_eq!(parse_count("a Dozen"), Some(12));
        assert_eq!(parse_count("1968"), None);
    }
}
