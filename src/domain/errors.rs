use crate::domain::insurance::model_id::ModelId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning a raw request into a prediction
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("{field} out of range: got {value}, allowed [{min}, {max}]")]
    Validation {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("BMI {bmi:.2} outside allowed range [{min}, {max}]")]
    DerivedConstraint { bmi: f64, min: f64, max: f64 },

    #[error("Unknown model: {model_id}")]
    UnknownModel { model_id: String },

    #[error("Inference failed for {model_id}")]
    Inference {
        model_id: ModelId,
        #[source]
        source: InferenceFailure,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl PredictionError {
    /// True when the caller's input caused the failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::DerivedConstraint { .. } | Self::UnknownModel { .. }
        )
    }

    /// Short stable label, used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::DerivedConstraint { .. } => "derived_constraint",
            Self::UnknownModel { .. } => "unknown_model",
            Self::Inference { .. } => "inference",
            Self::Registry(_) => "registry",
        }
    }
}

/// Errors related to building or querying the model registry
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Failed to load model {model_id} from {}: {reason}", .path.display())]
    FatalLoad {
        model_id: ModelId,
        path: PathBuf,
        reason: String,
    },

    #[error("Registry is missing models: {missing:?}")]
    Incomplete { missing: Vec<ModelId> },

    #[error("Model not loaded: {model_id}")]
    NotFound { model_id: ModelId },
}

/// Failures reported by a regressor during single-row inference
#[derive(Debug, Error)]
pub enum InferenceFailure {
    #[error("Matrix creation failed: {0}")]
    Matrix(String),

    #[error("Prediction failed: {0}")]
    Predict(String),

    #[error("No prediction returned")]
    EmptyOutput,

    #[error("Non-finite prediction: {0}")]
    NonFinite(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_formatting() {
        let error = PredictionError::Validation {
            field: "age",
            value: 70.0,
            min: 18.0,
            max: 64.0,
        };

        let msg = error.to_string();
        assert!(msg.contains("age"));
        assert!(msg.contains("70"));
        assert!(msg.contains("[18, 64]"));
        assert!(error.is_client_error());
    }

    #[test]
    fn test_derived_constraint_formatting() {
        let error = PredictionError::DerivedConstraint {
            bmi: 150.0,
            min: 15.0,
            max: 50.0,
        };

        assert!(error.to_string().contains("150.00"));
        assert_eq!(error.kind(), "derived_constraint");
    }

    #[test]
    fn test_inference_error_is_not_client_error() {
        let error = PredictionError::Inference {
            model_id: ModelId::DecisionTree,
            source: InferenceFailure::EmptyOutput,
        };

        assert!(!error.is_client_error());
        assert!(error.to_string().contains("decision_tree"));
        let source = std::error::Error::source(&error).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("No prediction returned"));
    }

    #[test]
    fn test_fatal_load_names_artifact() {
        let error = RegistryError::FatalLoad {
            model_id: ModelId::RandomForest,
            path: PathBuf::from("model/random_forest_model.json"),
            reason: "No such file or directory".to_string(),
        };

        let msg = error.to_string();
        assert!(msg.contains("random_forest"));
        assert!(msg.contains("model/random_forest_model.json"));
    }
}
