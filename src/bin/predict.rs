//! Prediction CLI.
//!
//! Builds a property description from flags (unset flags take their
//! documented defaults), runs the valuation service against the
//! configured artifact, and prints the prediction as JSON.
//!
//! # Usage
//! ```sh
//! cargo run --bin predict -- --bedrooms 3 --bathrooms 2 --building-size-m2 180
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::prelude::*;

use propval::application::service::ValuationService;
use propval::config::Config;
use propval::domain::property::PropertyFeatures;
use propval::domain::types::PredictRequest;
use propval::infrastructure::cache;
use propval::infrastructure::model_store::FsModelStore;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long)]
    bedrooms: Option<i64>,

    #[arg(long)]
    bathrooms: Option<i64>,

    #[arg(long)]
    parking_spaces: Option<i64>,

    #[arg(long)]
    land_size_m2: Option<f64>,

    #[arg(long)]
    building_size_m2: Option<f64>,

    #[arg(long)]
    lat: Option<f64>,

    #[arg(long)]
    lng: Option<f64>,

    #[arg(long)]
    convenience_score: Option<f64>,

    /// Path to the model artifact (overrides MODEL_PATH)
    #[arg(long)]
    model: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::WARN.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;
    let model_path = args.model.unwrap_or_else(|| config.model_path.clone());

    let request = PredictRequest {
        property: PropertyFeatures {
            bedrooms: args.bedrooms,
            bathrooms: args.bathrooms,
            parking_spaces: args.parking_spaces,
            land_size_m2: args.land_size_m2,
            building_size_m2: args.building_size_m2,
            lat: args.lat,
            lng: args.lng,
            convenience_score: args.convenience_score,
        },
    };

    let service = ValuationService::new(
        cache::from_url(&config.cache_url),
        Arc::new(FsModelStore::new(model_path)),
        config.cache_op_timeout,
    );

    let result = service.predict(&request).await;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
