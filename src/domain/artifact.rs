use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::linear_regression::LinearRegression;

use crate::domain::property::FeatureVector;
use crate::domain::scaler::StandardScaler;
use crate::domain::types::MODEL_VERSION;

pub type Regression = LinearRegression<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Epoch used for cache keys before any model has been trained.
pub const COLD_EPOCH: &str = "v1-cold";

/// Fitted regression parameters. Datasets with more samples than
/// features get a full least-squares fit; smaller datasets (where the
/// system is underdetermined and the solver cannot run) get an
/// intercept-only model carrying the mean target, so a single training
/// sample predicts its own price.
#[derive(Debug, Serialize, Deserialize)]
pub enum RegressionModel {
    Full(Regression),
    InterceptOnly { intercept: f64 },
}

impl RegressionModel {
    /// Runs the regression on one already-scaled vector.
    pub fn predict_scaled(&self, scaled: &FeatureVector) -> Result<f64> {
        match self {
            RegressionModel::InterceptOnly { intercept } => Ok(*intercept),
            RegressionModel::Full(model) => {
                let matrix = DenseMatrix::from_2d_vec(&vec![scaled.to_vec()])
                    .map_err(|e| anyhow!("Matrix creation failed: {}", e))?;
                let predictions = model
                    .predict(&matrix)
                    .map_err(|e| anyhow!("Inference failed: {}", e))?;
                predictions
                    .first()
                    .copied()
                    .ok_or_else(|| anyhow!("Regression returned no prediction"))
            }
        }
    }
}

/// The persisted bundle of trained regression parameters and the scaler
/// they were fitted with. Always loaded and saved as one unit: a model
/// without its scaler would silently predict garbage.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub version: String,
    pub trained_at: DateTime<Utc>,
    pub samples: usize,
    pub scaler: Option<StandardScaler>,
    pub model: RegressionModel,
}

impl ModelArtifact {
    pub fn new(
        model: RegressionModel,
        scaler: Option<StandardScaler>,
        samples: usize,
        trained_at: DateTime<Utc>,
    ) -> Self {
        Self {
            version: MODEL_VERSION.to_string(),
            trained_at,
            samples,
            scaler,
            model,
        }
    }

    /// Identifier embedded in cache keys. Retraining produces a new
    /// trained-at stamp, so every retrain strands the previous epoch's
    /// cache entries without having to enumerate them.
    pub fn epoch(&self) -> String {
        format!("{}-{}", self.version, self.trained_at.timestamp())
    }

    /// Runs the regression on a single vector, scaling first when a
    /// scaler was fitted. Callers treat any error as a signal to fall
    /// back to the heuristic.
    pub fn infer(&self, vector: &FeatureVector) -> Result<f64> {
        let scaled = match &self.scaler {
            Some(scaler) => scaler.transform(vector),
            None => *vector,
        };
        self.model.predict_scaled(&scaled)
    }
}
