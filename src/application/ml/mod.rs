pub mod predictor;
pub mod registry;
pub mod smartcore_predictor;

pub use predictor::ChargeRegressor;
pub use registry::ModelRegistry;
pub use smartcore_predictor::SmartCoreRegressor;
