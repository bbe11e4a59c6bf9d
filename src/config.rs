//! Configuration module for propval.
//!
//! Structured configuration loading from environment variables. Binaries
//! call `dotenvy::dotenv().ok()` before `Config::from_env()`.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_MODEL_PATH: &str = "models/model.json";
const DEFAULT_CACHE_URL: &str = "memory://local";
const DEFAULT_CACHE_OP_TIMEOUT_MS: u64 = 250;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Location of the persisted model artifact (`MODEL_PATH`).
    pub model_path: PathBuf,
    /// Cache backend connection URL (`CACHE_URL`).
    pub cache_url: String,
    /// Upper bound on any single cache operation (`CACHE_OP_TIMEOUT_MS`).
    pub cache_op_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let model_path = env::var("MODEL_PATH").unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string());
        let cache_url = env::var("CACHE_URL").unwrap_or_else(|_| DEFAULT_CACHE_URL.to_string());

        let cache_op_timeout_ms = match env::var("CACHE_OP_TIMEOUT_MS") {
            Ok(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("Invalid CACHE_OP_TIMEOUT_MS: {}", raw))?,
            Err(_) => DEFAULT_CACHE_OP_TIMEOUT_MS,
        };

        Ok(Self {
            model_path: PathBuf::from(model_path),
            cache_url,
            cache_op_timeout: Duration::from_millis(cache_op_timeout_ms),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            cache_url: DEFAULT_CACHE_URL.to_string(),
            cache_op_timeout: Duration::from_millis(DEFAULT_CACHE_OP_TIMEOUT_MS),
        }
    }
}
