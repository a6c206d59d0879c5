//! Linear classifier exported from scikit-learn (`SGDClassifier`,
//! `LogisticRegression`, `LinearSVC`).
//!
//! Binary problems carry a single coefficient row whose positive side is
//! `classes[1]`. Multi-class problems carry one row per class.

use crate::vectorizer::FeatureVector;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Loss {
    /// Logistic regression; calibrated probabilities.
    Log,
    /// Smoothed hinge; probabilities via the clipped-margin estimate.
    ModifiedHuber,
    /// Linear SVM; margins only.
    Hinge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MultiClass {
    #[default]
    Ovr,
    Multinomial,
}

#[derive(Debug, Deserialize)]
pub struct ExportedClassifier {
    pub classes: Vec<String>,
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
    pub loss: Loss,
    #[serde(default)]
    pub multi_class: MultiClass,
}

#[derive(Debug)]
pub struct LinearClassifier {
    classes: Vec<String>,
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
    loss: Loss,
    multi_class: MultiClass,
    n_features: usize,
}

impl LinearClassifier {
    pub fn from_exported(exported: ExportedClassifier) -> Result<Self, String> {
        let n_classes = exported.classes.len();
        if n_classes < 2 {
            return Err(format!("need at least 2 classes, got {n_classes}"));
        }
        let expected_rows = if n_classes == 2 { 1 } else { n_classes };
        if exported.coef.len() != expected_rows {
            return Err(format!(
                "{n_classes} classes need {expected_rows} coefficient rows, got {}",
                exported.coef.len()
            ));
        }
        if exported.intercept.len() != expected_rows {
            return Err(format!(
                "{n_classes} classes need {expected_rows} intercepts, got {}",
                exported.intercept.len()
            ));
        }
        let n_features = exported.coef[0].len();
        if let Some(i) = exported.coef.iter().position(|row| row.len() != n_features) {
            return Err(format!(
                "coefficient row {i} has {} columns, expected {n_features}",
                exported.coef[i].len()
            ));
        }

        Ok(Self {
            classes: exported.classes,
            coef: exported.coef,
            intercept: exported.intercept,
            loss: exported.loss,
            multi_class: exported.multi_class,
            n_features,
        })
    }

    /// Class labels in column order of [`predict_proba`](Self::predict_proba).
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn loss(&self) -> Loss {
        self.loss
    }

    pub fn supports_probabilities(&self) -> bool {
        self.loss != Loss::Hinge
    }

    /// Signed distance to each separating hyperplane.
    pub fn decision_function(&self, x: &FeatureVector) -> Vec<f64> {
        self.coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, b)| x.dot(row) + b)
            .collect()
    }

    pub fn predict(&self, x: &FeatureVector) -> &str {
        let scores = self.decision_function(x);
        let idx = if self.is_binary() {
            usize::from(scores[0] > 0.0)
        } else {
            argmax(&scores)
        };
        &self.classes[idx]
    }

    /// Probability per class, or `None` when the loss has no probability model.
    pub fn predict_proba(&self, x: &FeatureVector) -> Option<Vec<f64>> {
        let scores = self.decision_function(x);
        let probs = match self.loss {
            Loss::Hinge => return None,
            Loss::Log if self.is_binary() => {
                let p = sigmoid(scores[0]);
                vec![1.0 - p, p]
            }
            Loss::Log => match self.multi_class {
                MultiClass::Multinomial => softmax(&scores),
                MultiClass::Ovr => normalize(scores.into_iter().map(sigmoid).collect()),
            },
            Loss::ModifiedHuber if self.is_binary() => {
                let p = clipped_margin(scores[0]);
                vec![1.0 - p, p]
            }
            Loss::ModifiedHuber => normalize(scores.into_iter().map(clipped_margin).collect()),
        };
        Some(probs)
    }

    fn is_binary(&self) -> bool {
        self.classes.len() == 2
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn clipped_margin(z: f64) -> f64 {
    (z.clamp(-1.0, 1.0) + 1.0) / 2.0
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    normalize(exps)
}

/// Scale to sum 1; an all-zero row becomes uniform.
fn normalize(mut row: Vec<f64>) -> Vec<f64> {
    let sum: f64 = row.iter().sum();
    if sum > 0.0 {
        for v in &mut row {
            *v /= sum;
        }
    } else {
        let uniform = 1.0 / row.len() as f64;
        row.iter_mut().for_each(|v| *v = uniform);
    }
    row
}

/// Index of the largest score; ties go to the lowest index.
fn argmax(scores: &[f64]) -> usize {
    let mut best = 0;
    for (i, &s) in scores.iter().enumerate().skip(1) {
        if s > scores[best] {
            best = i;
        }
    }
    best
}
