//! Configuration module.
//!
//! Loaded from environment variables (a `.env` file is read by the binary
//! before this runs).

mod model_config;

pub use model_config::ModelPaths;

use anyhow::{Context, Result};
use std::env;

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub model_paths: ModelPaths,
    pub prediction_history_enabled: bool,
    pub history_limit: usize,
    pub history_max_records: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let prediction_history_enabled = env::var("PREDICTION_HISTORY_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .parse::<bool>()
            .context("Failed to parse PREDICTION_HISTORY_ENABLED")?;

        let history_limit = env::var("HISTORY_LIMIT")
            .unwrap_or_else(|_| "50".to_string())
            .parse::<usize>()
            .context("Failed to parse HISTORY_LIMIT")?;

        let history_max_records = env::var("HISTORY_MAX_RECORDS")
            .unwrap_or_else(|_| "10000".to_string())
            .parse::<usize>()
            .context("Failed to parse HISTORY_MAX_RECORDS")?;

        Ok(Self {
            model_paths: ModelPaths::from_env(),
            prediction_history_enabled,
            history_limit,
            history_max_records,
        })
    }
}
