pub mod model_id;
pub mod prediction;
pub mod request;

pub use model_id::ModelId;
pub use prediction::{PredictionResult, USD_TO_VND};
pub use request::{PredictionInput, PredictionRequest, Region, Sex};
