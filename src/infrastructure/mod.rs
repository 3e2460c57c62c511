pub mod observability;
pub mod repositories;

pub use repositories::InMemoryPredictionRepository;
