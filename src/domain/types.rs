use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::property::PropertyFeatures;

/// Version tag stamped on every artifact and prediction.
pub const MODEL_VERSION: &str = "v1";

/// Fixed lifetime of a cached prediction, in seconds.
pub const CACHE_TTL_SECS: u64 = 3600;

/// Confidence reported when the trained model produced the price.
pub const MODEL_CONFIDENCE: f64 = 0.75;

/// Confidence reported when the fallback heuristic produced the price.
pub const FALLBACK_CONFIDENCE: f64 = 0.30;

/// A computed price estimate. Confidence is 0.75 for model-backed
/// predictions and 0.30 for the fallback heuristic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionResult {
    pub price: f64,
    pub confidence: f64,
    pub model_version: String,
    pub predicted_at: DateTime<Utc>,
}

/// Predict request body: a property description. Defaults apply per field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictRequest {
    pub property: PropertyFeatures,
}

/// Parallel lists of property descriptions and observed sale prices.
/// Validated by the trainer: both lists non-empty and of equal length.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingDataset {
    pub properties: Vec<PropertyFeatures>,
    pub prices: Vec<f64>,
}

impl TrainingDataset {
    /// True when either parallel list is empty; such datasets are
    /// rejected before any fitting.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() || self.prices.is_empty()
    }
}

/// Summary of a successful training run. The reported R² is computed on
/// the training set itself: it is a fit-quality signal, not a
/// generalization estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainReport {
    pub model_path: String,
    pub samples: usize,
    pub r_squared: f64,
    pub timestamp: DateTime<Utc>,
}

/// Outcome of a train request. Rejections carry a human-readable reason
/// for datasets that fail validation; failures carry the description of
/// an unexpected internal error. Neither surfaces as a protocol-level
/// fault.
#[derive(Debug, Clone)]
pub enum TrainOutcome {
    Trained(TrainReport),
    Rejected { reason: String },
    Failed { error: String },
}

impl TrainOutcome {
    pub fn is_trained(&self) -> bool {
        matches!(self, TrainOutcome::Trained(_))
    }
}

/// Wire shape of a train outcome, matching the upstream contract:
/// `{trained, model_path?, samples?, r_squared?, timestamp?, message?/error?}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainResponse {
    pub trained: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub samples: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r_squared: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<TrainOutcome> for TrainResponse {
    fn from(outcome: TrainOutcome) -> Self {
        match outcome {
            TrainOutcome::Trained(report) => TrainResponse {
                trained: true,
                model_path: Some(report.model_path),
                samples: Some(report.samples),
                r_squared: Some(report.r_squared),
                timestamp: Some(report.timestamp),
                message: None,
                error: None,
            },
            TrainOutcome::Rejected { reason } => TrainResponse {
                trained: false,
                model_path: None,
                samples: None,
                r_squared: None,
                timestamp: None,
                message: Some(reason),
                error: None,
            },
            TrainOutcome::Failed { error } => TrainResponse {
                trained: false,
                model_path: None,
                samples: None,
                r_squared: None,
                timestamp: None,
                message: None,
                error: Some(error),
            },
        }
    }
}

/// Liveness report: process is up, plus whether a trained artifact exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub model_available: bool,
}
