//! Model artifact locations parsed from environment variables.

use crate::domain::insurance::ModelId;
use std::env;
use std::path::{Path, PathBuf};

/// Artifact path per model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelPaths {
    pub random_forest: PathBuf,
    pub decision_tree: PathBuf,
}

impl ModelPaths {
    /// Default artifact names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            random_forest: dir.join(ModelId::RandomForest.artifact_file_name()),
            decision_tree: dir.join(ModelId::DecisionTree.artifact_file_name()),
        }
    }

    pub fn path_for(&self, model_id: ModelId) -> &Path {
        match model_id {
            ModelId::RandomForest => &self.random_forest,
            ModelId::DecisionTree => &self.decision_tree,
        }
    }

    pub fn from_env() -> Self {
        let dir = env::var("MODEL_DIR").unwrap_or_else(|_| "model".to_string());
        let defaults = Self::in_dir(dir);
        Self {
            random_forest: env::var("RANDOM_FOREST_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.random_forest),
            decision_tree: env::var("DECISION_TREE_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.decision_tree),
        }
    }
}
