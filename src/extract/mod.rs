//! Per-document fact extraction (organization, size, location).
//!
//! Each extractor is built once, on first use, and is read-only afterwards.
//! Documents are processed independently; no state carries between them.

mod location;
mod organization;
mod size;

pub use location::LocationExtractor;
pub use organization::OrganizationExtractor;
pub use size::SizeExtractor;

use crate::input::Documents;
use crate::task::ExtractorKind;
use rayon::prelude::*;
use serde::Serialize;
use std::sync::OnceLock;

/// A structured fact pulled from one document, or an explicit absence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum ExtractionResult {
    Size(u64),
    Location(String),
    /// Distinct names, in order of first appearance. Never empty.
    Organizations(Vec<String>),
    Absent,
}

impl ExtractionResult {
    pub fn is_absent(&self) -> bool {
        matches!(self, ExtractionResult::Absent)
    }
}

pub trait DocumentExtractor: Send + Sync {
    fn kind(&self) -> ExtractorKind;

    /// Extract from a single document. `verbose` logs each match.
    fn extract_one(&self, document: &str, verbose: bool) -> ExtractionResult;
}

/// Lazily built extractors, one slot per kind.
#[derive(Default)]
pub struct ExtractorCache {
    slots: [OnceLock<Box<dyn DocumentExtractor>>; 3],
}

impl ExtractorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: ExtractorKind) -> &dyn DocumentExtractor {
        self.slots[kind.index()]
            .get_or_init(|| {
                log::debug!("constructing {kind} extractor");
                build(kind)
            })
            .as_ref()
    }

    pub fn is_built(&self, kind: ExtractorKind) -> bool {
        self.slots[kind.index()].get().is_some()
    }
}

impl std::fmt::Debug for ExtractorCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let built: Vec<ExtractorKind> = ExtractorKind::ALL
            .into_iter()
            .filter(|k| self.is_built(*k))
            .collect();
        f.debug_struct("ExtractorCache").field("built", &built).finish()
    }
}

fn build(kind: ExtractorKind) -> Box<dyn DocumentExtractor> {
    match kind {
        ExtractorKind::Organization => Box::new(OrganizationExtractor::new()),
        ExtractorKind::Size => Box::new(SizeExtractor::new()),
        ExtractorKind::Location => Box::new(LocationExtractor::new()),
    }
}

/// Apply the `kind` extractor to every document, preserving order.
pub fn extract_all(
    extractors: &ExtractorCache,
    kind: ExtractorKind,
    documents: &Documents<'_>,
    verbose: bool,
    parallel: bool,
) -> Vec<ExtractionResult> {
    let extractor = extractors.get(kind);
    let docs = documents.as_slice();
    log::debug!("extracting {kind} from {} documents", docs.len());
    if parallel {
        docs.par_iter().map(|d| extractor.extract_one(d, verbose)).collect()
    } else {
        docs.iter().map(|d| extractor.extract_one(d, verbose)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_builds_lazily_and_once() {
        let cache = ExtractorCache::new();
        assert!(!cache.is_built(ExtractorKind::Size));
        let a = cache.get(ExtractorKind::Size) as *const dyn DocumentExtractor as *const ();
        let b = cache.get(ExtractorKind::Size) as *const dyn DocumentExtractor as *const ();
        assert_eq!(a, b);
        assert!(cache.is_built(ExtractorKind::Size));
        assert!(!cache.is_built(ExtractorKind::Location));
    }

    #[test]
    fn test_each_slot_holds_its_kind() {
        let cache = ExtractorCache::new();
        for kind in ExtractorKind::ALL {
            assert_eq!(cache.get(kind).kind(), kind);
        }
    }

    #[test]
    fn test_extract_all_is_document_independent() {
        let cache = ExtractorCache::new();
        let d1 = "About 300 protesters gathered downtown.";
        let d2 = "No crowd mentioned here.";

        let both = extract_all(&cache, ExtractorKind::Size, &Documents::normalize(vec![d1, d2]), false, false);
        let one = extract_all(&cache, ExtractorKind::Size, &Documents::normalize(vec![d1]), false, false);
        let two = extract_all(&cache, ExtractorKind::Size, &Documents::normalize(vec![d2]), false, false);
        assert_eq!(both, vec![one[0].clone(), two[0].clone()]);

        let reversed = extract_all(&cache, ExtractorKind::Size, &Documents::normalize(vec![d2, d1]), false, true);
        assert_eq!(reversed, vec![both[1].clone(), both[0].clone()]);
    }

    #[test]
    fn test_result_serializes_tagged() {
        let json = serde_json::to_value(ExtractionResult::Size(300)).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "size", "value": 300}));
        let json = serde_json::to_value(ExtractionResult::Absent).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "absent"}));
    }
}
