//! Repository Pattern Abstractions
//!
//! Prediction history is persisted by an external collaborator (the account
//! and storage layers). This module defines the port it implements.
//!
//! # Current Implementation
//!
//! `InMemoryPredictionRepository` provides thread-safe, in-memory storage
//! using `Arc<RwLock>` for concurrent access.
//!
//! # Example
//!
//! ```rust,no_run
//! use insurance_charges::domain::repositories::PredictionHistoryRepository;
//! use insurance_charges::infrastructure::InMemoryPredictionRepository;
//!
//! # async {
//! let repo = InMemoryPredictionRepository::new();
//! // repo.save(&record).await?;
//! // let recent = repo.find_recent(10).await?;
//! # };
//! ```

use crate::domain::insurance::{PredictionRequest, PredictionResult};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A stored prediction.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionRecord {
    pub id: Uuid,
    /// User id from the auth layer; `None` for anonymous predictions.
    pub owner: Option<String>,
    pub request: PredictionRequest,
    pub result: PredictionResult,
    pub created_at: DateTime<Utc>,
}

impl PredictionRecord {
    pub fn new(owner: Option<String>, request: PredictionRequest, result: PredictionResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            request,
            result,
            created_at: Utc::now(),
        }
    }
}

/// Repository for persisting and retrieving past predictions
#[async_trait]
pub trait PredictionHistoryRepository: Send + Sync {
    /// Save a prediction
    async fn save(&self, record: &PredictionRecord) -> Result<()>;

    /// Find the most recent predictions, newest first
    async fn find_recent(&self, limit: usize) -> Result<Vec<PredictionRecord>>;

    /// Find the most recent predictions of one user, newest first
    async fn find_by_owner(&self, owner: &str, limit: usize) -> Result<Vec<PredictionRecord>>;

    /// Count total number of predictions
    async fn count(&self) -> Result<usize>;
}
