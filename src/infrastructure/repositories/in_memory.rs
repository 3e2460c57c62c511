//! In-Memory Repository Implementation
//!
//! Thread-safe, in-memory implementation of `PredictionHistoryRepository`.
//! Data is lost on restart; the storage layer provides a durable one.
//! Unbounded by default; [`InMemoryPredictionRepository::with_max_records`]
//! keeps only the newest records.

use crate::domain::repositories::{PredictionHistoryRepository, PredictionRecord};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct InMemoryPredictionRepository {
    records: Arc<RwLock<Vec<PredictionRecord>>>,
    max_records: Option<usize>,
}

impl InMemoryPredictionRepository {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            max_records: None,
        }
    }

    /// Drop the oldest records once more than `max_records` are stored.
    pub fn with_max_records(max_records: usize) -> Self {
        Self {
            max_records: Some(max_records),
            ..Self::new()
        }
    }
}

impl Default for InMemoryPredictionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PredictionHistoryRepository for InMemoryPredictionRepository {
    async fn save(&self, record: &PredictionRecord) -> Result<()> {
        let mut records = self.records.write().await;
        records.push(record.clone());
        if let Some(max) = self.max_records
            && records.len() > max
        {
            let excess = records.len() - max;
            records.drain(..excess);
        }
        Ok(())
    }

    async fn find_recent(&self, limit: usize) -> Result<Vec<PredictionRecord>> {
        let records = self.records.read().await;
        Ok(records.iter().rev().take(limit).cloned().collect())
    }

    async fn find_by_owner(&self, owner: &str, limit: usize) -> Result<Vec<PredictionRecord>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .rev()
            .filter(|r| r.owner.as_deref() == Some(owner))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.records.read().await.len())
    }
}
