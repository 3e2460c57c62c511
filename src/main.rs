//! Insurance charge predictor CLI
//!
//! Loads both models at startup and refuses to run if either artifact is
//! missing or unreadable.
//!
//! # Usage
//! ```sh
//! insurance-charges predict --age 30 --sex 0 --height 1.75 --weight 70 \
//!     --children 1 --smoker 0 --region 2 --model decision_tree
//! insurance-charges batch --input rows.csv --metrics
//! ```
//!
//! # Environment Variables
//! - `MODEL_DIR` - Directory holding `random_forest_model.json` and `decision_tree_model.json` (default: model)
//! - `RANDOM_FOREST_MODEL_PATH` / `DECISION_TREE_MODEL_PATH` - Per-model overrides
//! - `PREDICTION_HISTORY_ENABLED` - Keep an in-process history of predictions (default: true)
//! - `HISTORY_LIMIT` - Records shown by `predict --show-history` (default: 50)
//! - `HISTORY_MAX_RECORDS` - Records kept before the oldest are dropped (default: 10000)
//! - `RUST_LOG` - Log filter (default: info)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use insurance_charges::application::PredictionService;
use insurance_charges::application::batch::{read_inputs, score_batch};
use insurance_charges::application::ml::ModelRegistry;
use insurance_charges::config::Config;
use insurance_charges::domain::insurance::PredictionInput;
use insurance_charges::infrastructure::InMemoryPredictionRepository;
use insurance_charges::infrastructure::observability::Metrics;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Predict charges for a single person
    Predict {
        /// Age in years (18-64)
        #[arg(long)]
        age: i64,
        /// 0 = male, 1 = female
        #[arg(long)]
        sex: i64,
        /// Height in meters (1.0-2.5)
        #[arg(long)]
        height: f64,
        /// Weight in kilograms (30-150)
        #[arg(long)]
        weight: f64,
        /// Number of children (0-5)
        #[arg(long)]
        children: i64,
        /// 0 = no, 1 = yes
        #[arg(long)]
        smoker: i64,
        /// 0 southwest, 1 southeast, 2 northwest, 3 northeast
        #[arg(long)]
        region: i64,
        /// random_forest or decision_tree
        #[arg(long)]
        model: String,
        /// Owner recorded with the prediction in history
        #[arg(long)]
        owner: Option<String>,
        /// Print recent history records after the prediction
        #[arg(long)]
        show_history: bool,
    },
    /// Score every row of a CSV file, one JSON line per row
    Batch {
        /// CSV with columns age,sex,height,weight,children,smoker,region,model
        #[arg(long)]
        input: PathBuf,
        /// Print Prometheus metrics after the rows
        #[arg(long)]
        metrics: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays machine readable
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(stderr_layer)
        .init();

    let args = Args::parse();

    let config = Config::from_env()?;
    info!("Configuration loaded: models={:?}", config.model_paths);

    let registry = match ModelRegistry::load(&config.model_paths) {
        Ok(registry) => Arc::new(registry),
        Err(e) => {
            error!("Cannot start without all models: {}", e);
            return Err(e.into());
        }
    };
    info!("Models ready: {:?}", registry.model_ids());

    let mut service = PredictionService::new(registry, Metrics::new()?).with_history_limit(config.history_limit);
    if config.prediction_history_enabled {
        service = service.with_history(Arc::new(InMemoryPredictionRepository::with_max_records(
            config.history_max_records,
        )));
    }

    match args.command {
        Command::Predict {
            age,
            sex,
            height,
            weight,
            children,
            smoker,
            region,
            model,
            owner,
            show_history,
        } => {
            let input = PredictionInput {
                age,
                sex,
                height,
                weight,
                children,
                smoker,
                region,
                model,
            };
            let result = service.predict_and_record(&input, owner.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            if show_history {
                for record in service.history(owner.as_deref(), None).await? {
                    println!("{}", serde_json::to_string(&record)?);
                }
            }
        }
        Command::Batch { input, metrics } => {
            let file = File::open(&input).with_context(|| format!("Failed to open {:?}", input))?;
            let rows = score_batch(&service, read_inputs(BufReader::new(file)));
            for row in &rows {
                println!("{}", serde_json::to_string(&row.line())?);
            }
            if metrics {
                print!("{}", service.metrics().render());
            }
        }
    }

    Ok(())
}
