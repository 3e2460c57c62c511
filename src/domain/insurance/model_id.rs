use crate::domain::errors::PredictionError;
use crate::domain::ml::feature_registry::FeatureSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trained regressor families served by the pipeline.
///
/// Each variant is bound to exactly one training-time feature schema, see
/// [`ModelId::schema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelId {
    /// Tree ensemble, trained on the raw region code.
    RandomForest,
    /// Single tree, trained on one-hot region columns.
    DecisionTree,
}

impl ModelId {
    pub const ALL: [ModelId; 2] = [ModelId::RandomForest, ModelId::DecisionTree];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelId::RandomForest => "random_forest",
            ModelId::DecisionTree => "decision_tree",
        }
    }

    /// Human readable name used in display text.
    pub fn display_name(&self) -> &'static str {
        match self {
            ModelId::RandomForest => "Random Forest",
            ModelId::DecisionTree => "Decision Tree",
        }
    }

    pub fn schema(&self) -> FeatureSchema {
        match self {
            ModelId::RandomForest => FeatureSchema::RawRegion,
            ModelId::DecisionTree => FeatureSchema::OneHotRegion,
        }
    }

    /// Default artifact file name inside the model directory.
    pub fn artifact_file_name(&self) -> &'static str {
        match self {
            ModelId::RandomForest => "random_forest_model.json",
            ModelId::DecisionTree => "decision_tree_model.json",
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelId {
    type Err = PredictionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random_forest" => Ok(ModelId::RandomForest),
            "decision_tree" => Ok(ModelId::DecisionTree),
            _ => Err(PredictionError::UnknownModel {
                model_id: s.to_string(),
            }),
        }
    }
}
