use crate::domain::errors::{InferenceFailure, PredictionError};
use crate::domain::insurance::{ModelId, PredictionResult};
use crate::domain::ml::FeatureVector;
use tracing::{debug, warn};

/// Interface for trained charge regressors.
///
/// Implementations are shared across concurrent requests and MUST be safe for
/// read-only inference from several threads at once (immutable tree models
/// are).
pub trait ChargeRegressor: Send + Sync {
    /// Run inference on one row and return the scalar output in USD.
    fn predict_one(&self, features: &[f64]) -> Result<f64, InferenceFailure>;

    /// Get model name/type
    fn name(&self) -> &str;
}

/// Run `vector` through `regressor`, clamp, convert and format.
pub fn predict(
    vector: &FeatureVector,
    model_id: ModelId,
    regressor: &dyn ChargeRegressor,
) -> Result<PredictionResult, PredictionError> {
    debug!(
        "Model input for {}: {:?}",
        model_id,
        vector.named().collect::<Vec<_>>()
    );

    let raw = regressor
        .predict_one(vector.values())
        .and_then(|value| {
            if value.is_finite() {
                Ok(value)
            } else {
                Err(InferenceFailure::NonFinite(value))
            }
        })
        .map_err(|source| PredictionError::Inference { model_id, source })?;
    debug!("Raw prediction USD: {}", raw);

    if raw < 0.0 {
        warn!("Negative prediction from {}: {}, clamping to 0", model_id, raw);
    }

    Ok(PredictionResult::from_model_output(model_id, raw))
}
