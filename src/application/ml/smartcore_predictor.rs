use super::predictor::ChargeRegressor;
use crate::domain::errors::{InferenceFailure, RegistryError};
use crate::domain::insurance::ModelId;
use smartcore::ensemble::random_forest_regressor::RandomForestRegressor;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_regressor::DecisionTreeRegressor;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{error, info};

pub type ForestModel = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;
pub type TreeModel = DecisionTreeRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

enum Model {
    Forest(ForestModel),
    Tree(TreeModel),
}

/// smartcore regressor deserialized from a JSON artifact.
pub struct SmartCoreRegressor {
    model: Model,
    model_id: ModelId,
}

impl SmartCoreRegressor {
    pub fn from_forest(model: ForestModel) -> Self {
        Self {
            model: Model::Forest(model),
            model_id: ModelId::RandomForest,
        }
    }

    pub fn from_tree(model: TreeModel) -> Self {
        Self {
            model: Model::Tree(model),
            model_id: ModelId::DecisionTree,
        }
    }

    /// Load the artifact for `model_id` from `path`.
    pub fn load(model_id: ModelId, path: &Path) -> Result<Self, RegistryError> {
        let fatal = |reason: String| {
            error!("Failed to load model {} from {:?}: {}", model_id, path, reason);
            RegistryError::FatalLoad {
                model_id,
                path: path.to_path_buf(),
                reason,
            }
        };

        let mut buffer = Vec::new();
        File::open(path)
            .and_then(|mut file| file.read_to_end(&mut buffer))
            .map_err(|e| fatal(e.to_string()))?;

        // Smartcore deserialization (serde_json)
        let regressor = match model_id {
            ModelId::RandomForest => serde_json::from_slice::<ForestModel>(&buffer).map(Self::from_forest),
            ModelId::DecisionTree => serde_json::from_slice::<TreeModel>(&buffer).map(Self::from_tree),
        }
        .map_err(|e| fatal(format!("Failed to deserialize model: {}", e)))?;

        info!("Successfully loaded {} model from {:?}", model_id.display_name(), path);
        Ok(regressor)
    }
}

impl ChargeRegressor for SmartCoreRegressor {
    fn predict_one(&self, features: &[f64]) -> Result<f64, InferenceFailure> {
        let expected = self.model_id.schema().width();
        if features.len() != expected {
            return Err(InferenceFailure::Predict(format!(
                "expected {} features, got {}",
                expected,
                features.len()
            )));
        }

        let input_matrix = DenseMatrix::from_2d_vec(&vec![features.to_vec()])
            .map_err(|e| InferenceFailure::Matrix(e.to_string()))?;

        let predictions = match &self.model {
            Model::Forest(model) => model.predict(&input_matrix),
            Model::Tree(model) => model.predict(&input_matrix),
        }
        .map_err(|e| InferenceFailure::Predict(e.to_string()))?;

        predictions.first().copied().ok_or(InferenceFailure::EmptyOutput)
    }

    fn name(&self) -> &str {
        match self.model {
            Model::Forest(_) => "SmartCore Random Forest",
            Model::Tree(_) => "SmartCore Decision Tree",
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{fit_forest, fit_tree};
    use super::*;

    #[test]
    fn test_tree_predicts_smoker_jump() {
        let regressor = SmartCoreRegressor::from_tree(fit_tree());
        let non_smoker = regressor
            .predict_one(&[42.0, 0.0, 25.0, 1.0, 0.0, 1.0, 0.0, 0.0])
            .unwrap();
        let smoker = regressor
            .predict_one(&[42.0, 0.0, 25.0, 1.0, 1.0, 1.0, 0.0, 0.0])
            .unwrap();
        assert!(smoker > non_smoker + 10_000.0);
    }

    #[test]
    fn test_wrong_width_is_inference_failure() {
        let regressor = SmartCoreRegressor::from_forest(fit_forest());
        // One-hot layout sent to the raw-region model
        let err = regressor
            .predict_one(&[30.0, 0.0, 22.0, 1.0, 0.0, 1.0, 0.0, 0.0])
            .unwrap_err();
        assert!(err.to_string().contains("expected 6 features, got 8"));
    }

    #[test]
    fn test_load_round_trip_forest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("random_forest_model.json");
        let model = fit_forest();
        std::fs::write(&path, serde_json::to_vec(&model).unwrap()).unwrap();
        let original = SmartCoreRegressor::from_forest(model);

        let loaded = SmartCoreRegressor::load(ModelId::RandomForest, &path).unwrap();
        let row = [50.0, 0.0, 25.0, 1.0, 1.0, 3.0];
        assert_eq!(loaded.predict_one(&row).unwrap(), original.predict_one(&row).unwrap());
        assert_eq!(loaded.name(), "SmartCore Random Forest");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let err = SmartCoreRegressor::load(ModelId::DecisionTree, &path).err().unwrap();
        match err {
            RegistryError::FatalLoad { model_id, path: failed, .. } => {
                assert_eq!(model_id, ModelId::DecisionTree);
                assert_eq!(failed, path);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_load_garbage_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decision_tree_model.json");
        std::fs::write(&path, b"not a model").unwrap();
        let err = SmartCoreRegressor::load(ModelId::DecisionTree, &path).err().unwrap();
        assert!(err.to_string().contains("deserialize"));
    }
}
