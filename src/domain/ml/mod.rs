pub mod feature_registry;

pub use feature_registry::{FeatureSchema, FeatureVector, encode, encode_for};
