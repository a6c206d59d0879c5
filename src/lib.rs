pub mod artifact;
pub mod classifier;
pub mod classify;
pub mod cli;
pub mod commands;
pub mod config;
pub mod extract;
pub mod input;
pub mod lede;
pub mod model_cache;
pub mod pipeline;
pub mod task;
pub mod vectorizer;

pub use artifact::{ArtifactKey, ArtifactRole, ArtifactStore, FsArtifactStore, MemoryArtifactStore};
pub use classify::{ProbabilityOutcome, ProbabilityTable};
pub use extract::{DocumentExtractor, ExtractionResult};
pub use input::{Documents, Input};
pub use model_cache::{ModelCache, TaskModel};
pub use pipeline::{Mpeds, Settings};
pub use task::{ExtractorKind, Task};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MpedsError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Missing or corrupt artifact. Never cached; a later call retries the load.
    #[error("cannot load {role} artifact for {task}: {reason}")]
    ArtifactLoad {
        task: Task,
        role: ArtifactRole,
        reason: String,
    },

    #[error("{task} classifier does not support probability estimates")]
    UnsupportedOperation { task: Task },

    #[error("config: {0}")]
    Config(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MpedsError>;
