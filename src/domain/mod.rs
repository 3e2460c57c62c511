// Requests, model ids and prediction results
pub mod insurance;

// Feature schemas and encoding
pub mod ml;

// Repository traits
pub mod repositories;

// Domain-specific error types
pub mod errors;
