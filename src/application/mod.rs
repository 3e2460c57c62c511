// Model loading, registry and inference
pub mod ml;

// Request-to-prediction pipeline
pub mod prediction_service;

// CSV batch scoring
pub mod batch;

pub use prediction_service::PredictionService;
