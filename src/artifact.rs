//! Versioned artifact store.
//!
//! Each task has two artifacts, a vectorizer and a classifier, addressed by
//! `(task, role, version)`. Stores only hand back bytes; [`load_artifact`]
//! turns them into typed values.

use crate::task::Task;
use crate::{MpedsError, Result};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactRole {
    Vectorizer,
    Classifier,
}

impl fmt::Display for ArtifactRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactRole::Vectorizer => f.write_str("vectorizer"),
            ArtifactRole::Classifier => f.write_str("classifier"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactKey {
    pub task: Task,
    pub role: ArtifactRole,
    pub version: String,
}

impl ArtifactKey {
    pub fn new(task: Task, role: ArtifactRole, version: impl Into<String>) -> Self {
        Self {
            task,
            role,
            version: version.into(),
        }
    }

    /// File name under an artifact directory, e.g. `form-vect_2017-05-23.json`.
    pub fn file_name(&self) -> String {
        let stem = self.task.artifact_stem();
        match self.role {
            ArtifactRole::Vectorizer => format!("{stem}-vect_{}.json", self.version),
            ArtifactRole::Classifier => format!("{stem}_{}.json", self.version),
        }
    }

    fn load_error(&self, reason: impl Into<String>) -> MpedsError {
        MpedsError::ArtifactLoad {
            task: self.task,
            role: self.role,
            reason: reason.into(),
        }
    }
}

/// Source of raw artifact bytes.
pub trait ArtifactStore: Send + Sync {
    fn fetch(&self, key: &ArtifactKey) -> Result<Vec<u8>>;
}

/// Fetch and decode one artifact. All failures map to `ArtifactLoad`.
pub fn load_artifact<T: DeserializeOwned>(store: &dyn ArtifactStore, key: &ArtifactKey) -> Result<T> {
    let raw = store.fetch(key).map_err(|e| match e {
        err @ MpedsError::ArtifactLoad { .. } => err,
        other => key.load_error(other.to_string()),
    })?;
    serde_json::from_slice(&raw).map_err(|e| key.load_error(format!("corrupt artifact: {e}")))
}

/// Artifacts as JSON files in one directory.
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, key: &ArtifactKey) -> PathBuf {
        self.root.join(key.file_name())
    }
}

impl ArtifactStore for FsArtifactStore {
    fn fetch(&self, key: &ArtifactKey) -> Result<Vec<u8>> {
        let path = self.path_for(key);
        log::debug!("reading {} artifact {}", key.role, path.display());
        std::fs::read(&path).map_err(|e| key.load_error(format!("{}: {e}", path.display())))
    }
}

/// In-process artifacts (embedded models, tests). Counts fetches per key.
#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    entries: HashMap<ArtifactKey, Vec<u8>>,
    fetches: Mutex<HashMap<ArtifactKey, usize>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: ArtifactKey, bytes: impl Into<Vec<u8>>) {
        self.entries.insert(key, bytes.into());
    }

    pub fn with(mut self, key: ArtifactKey, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(key, bytes);
        self
    }

    /// Number of fetches made for `key`, successful or not.
    pub fn fetch_count(&self, key: &ArtifactKey) -> usize {
        self.fetches
            .lock()
            .map(|f| f.get(key).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Total fetches across all keys.
    pub fn total_fetches(&self) -> usize {
        self.fetches.lock().map(|f| f.values().sum()).unwrap_or(0)
    }
}

impl ArtifactStore for MemoryArtifactStore {
    fn fetch(&self, key: &ArtifactKey) -> Result<Vec<u8>> {
        if let Ok(mut fetches) = self.fetches.lock() {
            *fetches.entry(key.clone()).or_insert(0) += 1;
        }
        self.entries
            .get(key)
            .cloned()
            .ok_or_else(|| key.load_error(format!("no artifact {}", key.file_name())))
    }
}
