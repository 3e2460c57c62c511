//! Model registry
//!
//! Holds one trained regressor per [`ModelId`]. The registry is built once at
//! startup, either from the configured artifacts or from in-process
//! regressors, and is read-only afterwards. A registry only exists when every
//! model id is present; there is no partially loaded state.

use super::predictor::ChargeRegressor;
use super::smartcore_predictor::SmartCoreRegressor;
use crate::config::ModelPaths;
use crate::domain::errors::RegistryError;
use crate::domain::insurance::ModelId;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

pub struct ModelRegistry {
    models: HashMap<ModelId, Arc<dyn ChargeRegressor>>,
}

impl ModelRegistry {
    /// Load every known model from its artifact, failing on the first one
    /// that is missing or unreadable.
    pub fn load(paths: &ModelPaths) -> Result<Self, RegistryError> {
        let mut models: HashMap<ModelId, Arc<dyn ChargeRegressor>> = HashMap::new();
        for model_id in ModelId::ALL {
            let regressor = SmartCoreRegressor::load(model_id, paths.path_for(model_id))?;
            models.insert(model_id, Arc::new(regressor));
        }

        info!(
            "Loaded {} models: {}",
            models.len(),
            ModelId::ALL.map(|id| id.display_name()).join(", ")
        );
        Ok(Self { models })
    }

    /// Build from already constructed regressors. Every [`ModelId`] must be covered.
    pub fn from_regressors(
        regressors: impl IntoIterator<Item = (ModelId, Arc<dyn ChargeRegressor>)>,
    ) -> Result<Self, RegistryError> {
        let models: HashMap<_, _> = regressors.into_iter().collect();
        let missing: Vec<ModelId> = ModelId::ALL
            .into_iter()
            .filter(|id| !models.contains_key(id))
            .collect();
        if !missing.is_empty() {
            return Err(RegistryError::Incomplete { missing });
        }
        Ok(Self { models })
    }

    pub fn lookup(&self, model_id: ModelId) -> Result<&dyn ChargeRegressor, RegistryError> {
        self.models
            .get(&model_id)
            .map(|m| m.as_ref())
            .ok_or(RegistryError::NotFound { model_id })
    }

    pub fn model_ids(&self) -> Vec<ModelId> {
        let mut ids: Vec<_> = self.models.keys().copied().collect();
        ids.sort();
        ids
    }
}
