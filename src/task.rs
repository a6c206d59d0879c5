//! Task and extractor identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A document classification task backed by a trained (vectorizer, classifier) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Task {
    /// Is this document about a protest event at all ("haystack" filter).
    #[value(alias = "haystack")]
    #[serde(alias = "haystack")]
    Relevance,
    /// Tactical form of the protest.
    Form,
    /// Grievance issue.
    Issue,
    /// Target of the protest.
    Target,
}

impl Task {
    pub const ALL: [Task; 4] = [Task::Relevance, Task::Form, Task::Issue, Task::Target];

    /// Dense index, used for per-task slots.
    pub(crate) fn index(self) -> usize {
        match self {
            Task::Relevance => 0,
            Task::Form => 1,
            Task::Issue => 2,
            Task::Target => 3,
        }
    }

    /// File stem shared by the task's artifacts.
    pub fn artifact_stem(self) -> &'static str {
        match self {
            Task::Relevance => "haystack",
            Task::Form => "form",
            Task::Issue => "issue",
            Task::Target => "target",
        }
    }

    /// Artifact version used when the config does not pin one.
    pub fn default_version(self) -> &'static str {
        match self {
            Task::Relevance => "all-source_2017-05-24",
            Task::Form | Task::Issue => "2017-05-23",
            Task::Target => "2017-06-27",
        }
    }

    /// Whether the trained model for this task can produce probability estimates.
    ///
    /// The issue model was trained with hinge loss (a linear SVM), which only
    /// yields margins.
    pub fn supports_probabilities(self) -> bool {
        !matches!(self, Task::Issue)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Task::Relevance => "relevance",
            Task::Form => "form",
            Task::Issue => "issue",
            Task::Target => "target",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which per-document fact extractor to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorKind {
    /// Social movement organizations named in the text.
    #[value(alias = "smo")]
    #[serde(alias = "smo")]
    Organization,
    /// Crowd size estimate.
    Size,
    /// Where the event took place.
    Location,
}

impl ExtractorKind {
    pub const ALL: [ExtractorKind; 3] = [
        ExtractorKind::Organization,
        ExtractorKind::Size,
        ExtractorKind::Location,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            ExtractorKind::Organization => 0,
            ExtractorKind::Size => 1,
            ExtractorKind::Location => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExtractorKind::Organization => "organization",
            ExtractorKind::Size => "size",
            ExtractorKind::Location => "location",
        }
    }
}

impl fmt::Display for ExtractorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
