//! Offline training CLI.
//!
//! Fits a new model artifact from a labeled dataset and prints the train
//! report as JSON. Accepts either a JSON file with `{properties, prices}`
//! or a CSV file with one column per feature plus a `price` column.
//!
//! # Usage
//! ```sh
//! cargo run --bin train -- --input data/sales.csv --model models/model.json
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Deserialize;
use tracing::Level;
use tracing_subscriber::prelude::*;

use propval::application::service::ValuationService;
use propval::config::Config;
use propval::domain::property::PropertyFeatures;
use propval::domain::types::{TrainResponse, TrainingDataset};
use propval::infrastructure::cache;
use propval::infrastructure::model_store::FsModelStore;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the dataset (.json with {properties, prices}, or .csv)
    #[arg(long)]
    input: PathBuf,

    /// Path to the output model artifact (overrides MODEL_PATH)
    #[arg(long)]
    model: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct CsvRecord {
    bedrooms: Option<i64>,
    bathrooms: Option<i64>,
    parking_spaces: Option<i64>,
    land_size_m2: Option<f64>,
    building_size_m2: Option<f64>,
    lat: Option<f64>,
    lng: Option<f64>,
    convenience_score: Option<f64>,
    price: f64,
}

impl From<CsvRecord> for PropertyFeatures {
    fn from(record: CsvRecord) -> Self {
        PropertyFeatures {
            bedrooms: record.bedrooms,
            bathrooms: record.bathrooms,
            parking_spaces: record.parking_spaces,
            land_size_m2: record.land_size_m2,
            building_size_m2: record.building_size_m2,
            lat: record.lat,
            lng: record.lng,
            convenience_score: record.convenience_score,
        }
    }
}

fn load_dataset(path: &Path) -> Result<TrainingDataset> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_lowercase();

    match extension.as_str() {
        "json" => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open dataset {:?}", path))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("Failed to parse dataset {:?}", path))
        }
        "csv" => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open dataset {:?}", path))?;
            let mut reader = csv::Reader::from_reader(BufReader::new(file));
            let mut dataset = TrainingDataset::default();
            for result in reader.deserialize() {
                let record: CsvRecord =
                    result.with_context(|| format!("Malformed row in {:?}", path))?;
                dataset.prices.push(record.price);
                dataset.properties.push(record.into());
            }
            Ok(dataset)
        }
        other => bail!("Unsupported dataset format '{}': use .json or .csv", other),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;
    let model_path = args.model.unwrap_or(config.model_path);

    let dataset = load_dataset(&args.input)?;

    let service = ValuationService::new(
        cache::from_url(&config.cache_url),
        Arc::new(FsModelStore::new(model_path)),
        config.cache_op_timeout,
    );

    let outcome = service.train(dataset).await;
    let response: TrainResponse = outcome.into();
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
