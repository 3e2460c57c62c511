//! Request-to-prediction pipeline.
//!
//! validate → encode for the selected model → registry lookup → predict.
//! The service holds only shared read-only state, so one instance serves any
//! number of concurrent callers. Failures are never retried.

use crate::application::ml::predictor;
use crate::application::ml::registry::ModelRegistry;
use crate::domain::errors::PredictionError;
use crate::domain::insurance::{PredictionInput, PredictionRequest, PredictionResult};
use crate::domain::ml::encode;
use crate::domain::repositories::{PredictionHistoryRepository, PredictionRecord};
use crate::infrastructure::observability::Metrics;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Records returned by [`PredictionService::history`] when no limit is given.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

#[derive(Clone)]
pub struct PredictionService {
    registry: Arc<ModelRegistry>,
    metrics: Metrics,
    history: Option<Arc<dyn PredictionHistoryRepository>>,
    history_limit: usize,
}

impl PredictionService {
    pub fn new(registry: Arc<ModelRegistry>, metrics: Metrics) -> Self {
        Self {
            registry,
            metrics,
            history: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Persist successful predictions made through [`Self::predict_and_record`].
    pub fn with_history(mut self, history: Arc<dyn PredictionHistoryRepository>) -> Self {
        self.history = Some(history);
        self
    }

    /// Default number of records [`Self::history`] returns.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Validate `input` and predict its charges.
    pub fn predict_charges(&self, input: &PredictionInput) -> Result<PredictionResult, PredictionError> {
        self.run(input).map(|(_, result)| result)
    }

    /// Predict for an already validated request.
    pub fn predict_request(&self, request: &PredictionRequest) -> Result<PredictionResult, PredictionError> {
        let outcome = self.infer(request);
        if let Err(e) = &outcome {
            self.report_failure(e);
        }
        outcome
    }

    /// Like [`Self::predict_charges`], then store the result in the history
    /// repository when one is configured. Storage failures are logged and do
    /// not fail the prediction.
    pub async fn predict_and_record(
        &self,
        input: &PredictionInput,
        owner: Option<&str>,
    ) -> Result<PredictionResult, PredictionError> {
        let (request, result) = self.run(input)?;

        if let Some(history) = &self.history {
            let record = PredictionRecord::new(owner.map(str::to_string), request, result.clone());
            if let Err(e) = history.save(&record).await {
                error!("Failed to save prediction {}: {:#}", record.id, e);
            }
        }

        Ok(result)
    }

    /// Recent predictions, newest first; scoped to `owner` when given.
    /// `limit` falls back to the configured history limit.
    pub async fn history(
        &self,
        owner: Option<&str>,
        limit: Option<usize>,
    ) -> anyhow::Result<Vec<PredictionRecord>> {
        let Some(history) = &self.history else {
            return Ok(Vec::new());
        };
        let limit = limit.unwrap_or(self.history_limit);
        match owner {
            Some(owner) => history.find_by_owner(owner, limit).await,
            None => history.find_recent(limit).await,
        }
    }

    fn run(&self, input: &PredictionInput) -> Result<(PredictionRequest, PredictionResult), PredictionError> {
        info!("Received prediction input: {:?}", input);
        let outcome = input
            .validate()
            .and_then(|request| self.infer(&request).map(|result| (request, result)));
        if let Err(e) = &outcome {
            self.report_failure(e);
        }
        outcome
    }

    fn infer(&self, request: &PredictionRequest) -> Result<PredictionResult, PredictionError> {
        let model_id = request.model_id();
        let started = Instant::now();

        let vector = encode(request, model_id);
        let regressor = self.registry.lookup(model_id)?;
        debug!("Using regressor {} for {}", regressor.name(), model_id);
        let result = predictor::predict(&vector, model_id, regressor)?;

        let label = model_id.as_str();
        self.metrics
            .observe_inference_latency(label, started.elapsed().as_secs_f64());
        self.metrics.inc_predictions(label);
        if result.clamped {
            self.metrics.inc_clamped(label);
        }

        info!("Prediction succeeded: {}", result.display_text);
        Ok(result)
    }

    fn report_failure(&self, e: &PredictionError) {
        self.metrics.inc_errors(e.kind());
        if e.is_client_error() {
            warn!("Rejected prediction input: {}", e);
        } else {
            error!("Prediction failed: {:?}", e);
        }
    }
}
