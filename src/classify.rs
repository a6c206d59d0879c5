//! Classification stage: normalize, ensure the task model, vectorize, predict.

use crate::input::Documents;
use crate::model_cache::{ModelCache, TaskModel};
use crate::task::Task;
use crate::{MpedsError, Result};
use rayon::prelude::*;
use serde::Serialize;

/// Per-document probability rows; column `j` is the probability of `classes[j]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityTable {
    pub classes: Vec<String>,
    pub probabilities: Vec<Vec<f64>>,
}

/// Result of a probability request.
///
/// `Unsupported` is an expected outcome for tasks whose model only produces
/// margins (the issue task). It is a value, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbabilityOutcome {
    Probabilities(ProbabilityTable),
    Unsupported { task: Task },
}

impl ProbabilityOutcome {
    pub fn is_supported(&self) -> bool {
        matches!(self, ProbabilityOutcome::Probabilities(_))
    }

    /// Convert `Unsupported` into `MpedsError::UnsupportedOperation`.
    pub fn into_table(self) -> Result<ProbabilityTable> {
        match self {
            ProbabilityOutcome::Probabilities(table) => Ok(table),
            ProbabilityOutcome::Unsupported { task } => Err(MpedsError::UnsupportedOperation { task }),
        }
    }
}

pub struct ClassificationStage<'c> {
    models: &'c ModelCache,
    parallel: bool,
}

impl<'c> ClassificationStage<'c> {
    pub fn new(models: &'c ModelCache, parallel: bool) -> Self {
        Self { models, parallel }
    }

    /// One label per document, index-aligned with the input.
    pub fn classify(&self, task: Task, documents: &Documents<'_>) -> Result<Vec<String>> {
        let model = self.models.ensure_loaded(task)?;
        log::debug!("vectorizing and predicting {} documents for {task}", documents.len());
        Ok(self.map_documents(documents, |doc| {
            let x = model.vectorizer.transform(doc);
            model.classifier.predict(&x).to_string()
        }))
    }

    /// Probability rows plus the classifier's class ordering, or `Unsupported`.
    pub fn classify_with_probabilities(&self, task: Task, documents: &Documents<'_>) -> Result<ProbabilityOutcome> {
        if !task.supports_probabilities() {
            log::warn!("{task} classification model does not support probability estimates");
            return Ok(ProbabilityOutcome::Unsupported { task });
        }

        let model = self.models.ensure_loaded(task)?;
        if !model.classifier.supports_probabilities() {
            log::warn!("{task} classifier was trained with {:?} loss; no probability estimates", model.classifier.loss());
            return Ok(ProbabilityOutcome::Unsupported { task });
        }

        log::debug!("predicting {task} probabilities for {} documents", documents.len());
        let rows = self.map_documents(documents, |doc| probabilities(model, doc));
        Ok(ProbabilityOutcome::Probabilities(ProbabilityTable {
            classes: model.classifier.classes().to_vec(),
            probabilities: rows,
        }))
    }

    fn map_documents<T, F>(&self, documents: &Documents<'_>, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(&str) -> T + Sync + Send,
    {
        let docs = documents.as_slice();
        if self.parallel {
            docs.par_iter().map(|d| f(d.as_ref())).collect()
        } else {
            docs.iter().map(|d| f(d.as_ref())).collect()
        }
    }
}

fn probabilities(model: &TaskModel, doc: &str) -> Vec<f64> {
    let x = model.vectorizer.transform(doc);
    // Checked supports_probabilities() before mapping.
    model.classifier.predict_proba(&x).unwrap_or_default()
}
