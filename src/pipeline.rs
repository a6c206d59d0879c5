//! The `Mpeds` orchestrator: one explicit owner for the model cache and the
//! extractor cache, shared by every task operation.

use crate::artifact::{ArtifactStore, FsArtifactStore};
use crate::classify::{ClassificationStage, ProbabilityOutcome};
use crate::extract::{ExtractionResult, ExtractorCache, extract_all};
use crate::input::{Documents, Input};
use crate::lede::{self, DEFAULT_DELIMITER};
use crate::model_cache::ModelCache;
use crate::task::{ExtractorKind, Task};
use crate::Result;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Runtime settings, resolved from config and CLI flags.
#[derive(Debug, Clone)]
pub struct Settings {
    pub artifact_dir: PathBuf,
    pub versions: HashMap<Task, String>,
    pub delimiter: String,
    pub parallel: bool,
    pub verbose: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            artifact_dir: PathBuf::from("classifiers"),
            versions: HashMap::new(),
            delimiter: DEFAULT_DELIMITER.into(),
            parallel: false,
            verbose: true,
        }
    }
}

#[derive(Debug)]
pub struct Mpeds {
    models: ModelCache,
    extractors: ExtractorCache,
    settings: Settings,
}

impl Mpeds {
    /// Orchestrator reading artifacts from `settings.artifact_dir`.
    pub fn new(settings: Settings) -> Self {
        let store = Arc::new(FsArtifactStore::new(settings.artifact_dir.clone()));
        Self::with_store(store, settings)
    }

    /// Orchestrator over any artifact store.
    pub fn with_store(store: Arc<dyn ArtifactStore>, settings: Settings) -> Self {
        Self {
            models: ModelCache::with_versions(store, &settings.versions),
            extractors: ExtractorCache::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn models(&self) -> &ModelCache {
        &self.models
    }

    pub fn extractors(&self) -> &ExtractorCache {
        &self.extractors
    }

    fn stage(&self) -> ClassificationStage<'_> {
        ClassificationStage::new(&self.models, self.settings.parallel)
    }

    /// One label per document for `task`.
    pub fn classify<'a>(&self, task: Task, input: impl Into<Input<'a>>) -> Result<Vec<String>> {
        self.classify_documents(task, &Documents::normalize(input))
    }

    pub fn classify_documents(&self, task: Task, documents: &Documents<'_>) -> Result<Vec<String>> {
        self.stage().classify(task, documents)
    }

    /// Probability rows with their class ordering, or `Unsupported` for margin-only models.
    pub fn classify_with_probabilities<'a>(
        &self,
        task: Task,
        input: impl Into<Input<'a>>,
    ) -> Result<ProbabilityOutcome> {
        self.classify_documents_with_probabilities(task, &Documents::normalize(input))
    }

    pub fn classify_documents_with_probabilities(
        &self,
        task: Task,
        documents: &Documents<'_>,
    ) -> Result<ProbabilityOutcome> {
        self.stage().classify_with_probabilities(task, documents)
    }

    /// Run the `kind` extractor on every document.
    pub fn extract<'a>(&self, kind: ExtractorKind, input: impl Into<Input<'a>>) -> Vec<ExtractionResult> {
        self.extract_documents(kind, &Documents::normalize(input))
    }

    pub fn extract_documents(&self, kind: ExtractorKind, documents: &Documents<'_>) -> Vec<ExtractionResult> {
        extract_all(
            &self.extractors,
            kind,
            documents,
            self.settings.verbose,
            self.settings.parallel,
        )
    }

    /// First segment of each document, split on the configured delimiter.
    pub fn get_lede<'a>(&self, input: impl Into<Input<'a>>) -> Vec<String> {
        self.lede_documents(&Documents::normalize(input))
    }

    pub fn lede_documents(&self, documents: &Documents<'_>) -> Vec<String> {
        lede::get_lede(documents, &self.settings.delimiter)
    }

    /// Lede of a single document.
    pub fn lede<'d>(&self, document: &'d str) -> &'d str {
        lede::lede(document, &self.settings.delimiter)
    }

    // Per-task shorthands.

    pub fn haystack<'a>(&self, input: impl Into<Input<'a>>) -> Result<Vec<String>> {
        self.classify(Task::Relevance, input)
    }

    pub fn form<'a>(&self, input: impl Into<Input<'a>>) -> Result<Vec<String>> {
        self.classify(Task::Form, input)
    }

    pub fn form_probabilities<'a>(&self, input: impl Into<Input<'a>>) -> Result<ProbabilityOutcome> {
        self.classify_with_probabilities(Task::Form, input)
    }

    pub fn issue<'a>(&self, input: impl Into<Input<'a>>) -> Result<Vec<String>> {
        self.classify(Task::Issue, input)
    }

    /// Always `Unsupported`: the issue model is a linear SVM.
    pub fn issue_probabilities<'a>(&self, input: impl Into<Input<'a>>) -> Result<ProbabilityOutcome> {
        self.classify_with_probabilities(Task::Issue, input)
    }

    pub fn target<'a>(&self, input: impl Into<Input<'a>>) -> Result<Vec<String>> {
        self.classify(Task::Target, input)
    }

    pub fn target_probabilities<'a>(&self, input: impl Into<Input<'a>>) -> Result<ProbabilityOutcome> {
        self.classify_with_probabilities(Task::Target, input)
    }

    pub fn smo<'a>(&self, input: impl Into<Input<'a>>) -> Vec<ExtractionResult> {
        self.extract(ExtractorKind::Organization, input)
    }

    pub fn size<'a>(&self, input: impl Into<Input<'a>>) -> Vec<ExtractionResult> {
        self.extract(ExtractorKind::Size, input)
    }

    pub fn location<'a>(&self, input: impl Into<Input<'a>>) -> Vec<ExtractionResult> {
        self.extract(ExtractorKind::Location, input)
    }
}
