//! Per-task lazy model cache.
//!
//! Each task's (vectorizer, classifier) pair is loaded on first use and then
//! kept for the life of the cache. First use is guarded by a sync `OnceCell`:
//! concurrent callers block on the one in-flight load instead of racing it.
//! A failed load leaves the slot empty so the next caller retries.

use crate::artifact::{ArtifactKey, ArtifactRole, ArtifactStore, load_artifact};
use crate::classifier::{ExportedClassifier, LinearClassifier};
use crate::task::Task;
use crate::vectorizer::{ExportedVectorizer, TfidfVectorizer};
use crate::{MpedsError, Result};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::sync::Arc;

/// Immutable (vectorizer, classifier) pair bound to one task.
#[derive(Debug)]
pub struct TaskModel {
    pub task: Task,
    pub version: String,
    pub vectorizer: TfidfVectorizer,
    pub classifier: LinearClassifier,
}

impl TaskModel {
    /// Load vectorizer first, then classifier, and check they agree on width.
    fn load(store: &dyn ArtifactStore, task: Task, version: &str) -> Result<Self> {
        log::info!("loading {task} vectorizer ({version})");
        let key = ArtifactKey::new(task, ArtifactRole::Vectorizer, version);
        let exported: ExportedVectorizer = load_artifact(store, &key)?;
        let vectorizer = TfidfVectorizer::from_exported(exported).map_err(|reason| MpedsError::ArtifactLoad {
            task,
            role: ArtifactRole::Vectorizer,
            reason,
        })?;

        log::info!("loading {task} classifier ({version})");
        let key = ArtifactKey::new(task, ArtifactRole::Classifier, version);
        let exported: ExportedClassifier = load_artifact(store, &key)?;
        let classifier = LinearClassifier::from_exported(exported).map_err(|reason| MpedsError::ArtifactLoad {
            task,
            role: ArtifactRole::Classifier,
            reason,
        })?;

        if vectorizer.n_features() != classifier.n_features() {
            return Err(MpedsError::ArtifactLoad {
                task,
                role: ArtifactRole::Classifier,
                reason: format!(
                    "classifier expects {} features but vectorizer produces {}",
                    classifier.n_features(),
                    vectorizer.n_features()
                ),
            });
        }

        log::info!(
            "{task} model ready ({} features, {} classes)",
            vectorizer.n_features(),
            classifier.classes().len()
        );

        Ok(Self {
            task,
            version: version.to_string(),
            vectorizer,
            classifier,
        })
    }
}

pub struct ModelCache {
    store: Arc<dyn ArtifactStore>,
    versions: [String; 4],
    slots: [OnceCell<TaskModel>; 4],
}

impl ModelCache {
    /// Cache over `store` using each task's default artifact version.
    pub fn new(store: Arc<dyn ArtifactStore>) -> Self {
        Self::with_versions(store, &HashMap::new())
    }

    /// Cache over `store`; `versions` pins artifact versions per task.
    pub fn with_versions(store: Arc<dyn ArtifactStore>, versions: &HashMap<Task, String>) -> Self {
        let versions = Task::ALL.map(|task| {
            versions
                .get(&task)
                .cloned()
                .unwrap_or_else(|| task.default_version().to_string())
        });
        Self {
            store,
            versions,
            slots: Default::default(),
        }
    }

    /// Return the task's model, loading it if this is the first request.
    pub fn ensure_loaded(&self, task: Task) -> Result<&TaskModel> {
        self.slots[task.index()]
            .get_or_try_init(|| TaskModel::load(self.store.as_ref(), task, self.version(task)))
    }

    pub fn is_loaded(&self, task: Task) -> bool {
        self.slots[task.index()].get().is_some()
    }

    pub fn version(&self, task: Task) -> &str {
        &self.versions[task.index()]
    }
}

impl std::fmt::Debug for ModelCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let loaded: Vec<Task> = Task::ALL.into_iter().filter(|t| self.is_loaded(*t)).collect();
        f.debug_struct("ModelCache")
            .field("versions", &self.versions)
            .field("loaded", &loaded)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::MemoryArtifactStore;

    const VECT: &str = r#"{"vocabulary": {"march": 0, "strike": 1}, "idf": [1.0, 1.0]}"#;
    const CLF: &str = r#"{"classes": ["0", "1"], "coef": [[1.0, -1.0]], "intercept": [0.0], "loss": "log"}"#;

    fn store_for(task: Task, version: &str) -> MemoryArtifactStore {
        MemoryArtifactStore::new()
            .with(ArtifactKey::new(task, ArtifactRole::Vectorizer, version), VECT)
            .with(ArtifactKey::new(task, ArtifactRole::Classifier, version), CLF)
    }

    #[test]
    fn test_loads_once() {
        let store = Arc::new(store_for(Task::Form, "2017-05-23"));
        let cache = ModelCache::new(store.clone());

        assert!(!cache.is_loaded(Task::Form));
        let first = cache.ensure_loaded(Task::Form).unwrap() as *const TaskModel;
        let second = cache.ensure_loaded(Task::Form).unwrap() as *const TaskModel;
        assert_eq!(first, second);
        assert!(cache.is_loaded(Task::Form));
        assert_eq!(store.total_fetches(), 2);
    }

    #[test]
    fn test_versions_override_defaults() {
        let store = Arc::new(store_for(Task::Target, "v9"));
        let versions = HashMap::from([(Task::Target, "v9".to_string())]);
        let cache = ModelCache::with_versions(store, &versions);
        assert_eq!(cache.version(Task::Target), "v9");
        assert_eq!(cache.version(Task::Form), "2017-05-23");
        assert_eq!(cache.ensure_loaded(Task::Target).unwrap().version, "v9");
    }

    #[test]
    fn test_failure_is_not_cached() {
        let store = Arc::new(MemoryArtifactStore::new());
        let cache = ModelCache::new(store.clone());

        assert!(matches!(
            cache.ensure_loaded(Task::Issue),
            Err(MpedsError::ArtifactLoad { role: ArtifactRole::Vectorizer, .. })
        ));
        assert!(cache.ensure_loaded(Task::Issue).is_err());
        let key = ArtifactKey::new(Task::Issue, ArtifactRole::Vectorizer, "2017-05-23");
        assert_eq!(store.fetch_count(&key), 2);
        assert!(!cache.is_loaded(Task::Issue));
    }

    #[test]
    fn test_width_mismatch_is_rejected() {
        let clf = r#"{"classes": ["0", "1"], "coef": [[1.0, -1.0, 0.5]], "intercept": [0.0], "loss": "log"}"#;
        let store = MemoryArtifactStore::new()
            .with(ArtifactKey::new(Task::Form, ArtifactRole::Vectorizer, "2017-05-23"), VECT)
            .with(ArtifactKey::new(Task::Form, ArtifactRole::Classifier, "2017-05-23"), clf);
        let cache = ModelCache::new(Arc::new(store));
        let err = cache.ensure_loaded(Task::Form).unwrap_err();
        assert!(err.to_string().contains("expects 3 features"));
    }

    #[test]
    fn test_concurrent_first_use_loads_once() {
        let store = Arc::new(store_for(Task::Relevance, "all-source_2017-05-24"));
        let cache = ModelCache::new(store.clone());

        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    cache.ensure_loaded(Task::Relevance).unwrap();
                });
            }
        });

        for role in [ArtifactRole::Vectorizer, ArtifactRole::Classifier] {
            let key = ArtifactKey::new(Task::Relevance, role, "all-source_2017-05-24");
            assert_eq!(store.fetch_count(&key), 1);
        }
    }
}
