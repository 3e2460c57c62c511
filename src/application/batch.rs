//! Batch scoring of CSV rows.
//!
//! Rows use the request body's column names
//! (`age,sex,height,weight,children,smoker,region,model`). Rows are scored in
//! parallel against the shared registry; each row gets its own outcome and a
//! bad row never aborts the batch.

use crate::application::prediction_service::PredictionService;
use crate::domain::errors::PredictionError;
use crate::domain::insurance::{PredictionInput, PredictionResult};
use rayon::prelude::*;
use serde::Serialize;
use std::io::Read;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum BatchRowError {
    #[error("Malformed row: {0}")]
    Malformed(String),

    #[error(transparent)]
    Prediction(#[from] PredictionError),
}

/// Outcome of one CSV row. `row` is 1-based and excludes the header.
#[derive(Debug)]
pub struct BatchRow {
    pub row: usize,
    pub outcome: Result<PredictionResult, BatchRowError>,
}

/// Serializable view of a [`BatchRow`], one JSON line per row.
#[derive(Debug, Serialize)]
pub struct BatchLine<'a> {
    pub row: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<&'a PredictionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchRow {
    pub fn line(&self) -> BatchLine<'_> {
        match &self.outcome {
            Ok(result) => BatchLine {
                row: self.row,
                result: Some(result),
                error: None,
            },
            Err(e) => BatchLine {
                row: self.row,
                result: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Parse CSV rows, keeping per-row parse failures.
pub fn read_inputs<R: Read>(reader: R) -> Vec<Result<PredictionInput, BatchRowError>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    rdr.deserialize::<PredictionInput>()
        .map(|r| r.map_err(|e| BatchRowError::Malformed(e.to_string())))
        .collect()
}

/// Score all rows in parallel, preserving input order.
pub fn score_batch(
    service: &PredictionService,
    inputs: Vec<Result<PredictionInput, BatchRowError>>,
) -> Vec<BatchRow> {
    let rows: Vec<BatchRow> = inputs
        .into_par_iter()
        .enumerate()
        .map(|(i, input)| BatchRow {
            row: i + 1,
            outcome: input.and_then(|input| service.predict_charges(&input).map_err(BatchRowError::from)),
        })
        .collect();

    let ok = rows.iter().filter(|r| r.outcome.is_ok()).count();
    info!("Scored batch: {} rows, {} predicted, {} failed", rows.len(), ok, rows.len() - ok);
    rows
}
