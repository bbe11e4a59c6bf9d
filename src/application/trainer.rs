use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use chrono::Utc;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::linear_regression::{LinearRegression, LinearRegressionParameters};
use tracing::info;

use crate::domain::artifact::{ModelArtifact, RegressionModel};
use crate::domain::errors::TrainingError;
use crate::domain::property::{extract, FeatureVector, FEATURE_COUNT};
use crate::domain::scaler::StandardScaler;
use crate::domain::types::TrainingDataset;

/// Rejection reasons, kept verbatim from the upstream contract.
pub const REASON_NO_DATA: &str = "No data provided";
pub const REASON_LENGTH_MISMATCH: &str = "Mismatch: properties and prices length differ";

/// Result of a successful fit, before persistence.
#[derive(Debug)]
pub struct FittedModel {
    pub artifact: ModelArtifact,
    pub r_squared: f64,
}

/// Fits a standardized linear regression on a labeled dataset.
#[derive(Debug, Default, Clone, Copy)]
pub struct Trainer;

impl Trainer {
    pub fn new() -> Self {
        Self
    }

    /// Validates and fits. Validation order matters: emptiness first,
    /// then length mismatch. CPU-bound; callers run it off the serving
    /// path. Solver panics are contained and reported as fit errors,
    /// never propagated.
    pub fn fit(&self, dataset: &TrainingDataset) -> Result<FittedModel, TrainingError> {
        if dataset.is_empty() {
            return Err(TrainingError::InvalidDataset {
                reason: REASON_NO_DATA.to_string(),
            });
        }
        if dataset.properties.len() != dataset.prices.len() {
            return Err(TrainingError::InvalidDataset {
                reason: REASON_LENGTH_MISMATCH.to_string(),
            });
        }

        match catch_unwind(AssertUnwindSafe(|| self.fit_validated(dataset))) {
            Ok(result) => result,
            Err(panic) => Err(TrainingError::Fit {
                reason: format!("Solver panicked: {}", panic_reason(panic)),
            }),
        }
    }

    fn fit_validated(&self, dataset: &TrainingDataset) -> Result<FittedModel, TrainingError> {
        let rows: Vec<FeatureVector> = dataset.properties.iter().map(extract).collect();
        let scaler = StandardScaler::fit(&rows);
        let scaled = scaler.transform_matrix(&rows);
        let y = dataset.prices.clone();

        // The least-squares solver needs strictly more samples than
        // features (the design gains an intercept column); below that the
        // system is underdetermined. Small datasets get an intercept-only
        // model: every prediction is the mean target, and a single sample
        // predicts its own price.
        let model = if rows.len() <= FEATURE_COUNT {
            info!(
                "Dataset of {} samples is below the {}-feature design, fitting intercept-only model",
                rows.len(),
                FEATURE_COUNT
            );
            let intercept = y.iter().sum::<f64>() / y.len() as f64;
            RegressionModel::InterceptOnly { intercept }
        } else {
            let matrix_rows: Vec<Vec<f64>> = scaled.iter().map(|row| row.to_vec()).collect();
            let x = DenseMatrix::from_2d_vec(&matrix_rows).map_err(|e| TrainingError::Fit {
                reason: format!("Matrix creation failed: {}", e),
            })?;
            info!("Fitting linear regression on {} samples", y.len());
            let fitted = LinearRegression::fit(&x, &y, LinearRegressionParameters::default())
                .map_err(|e| TrainingError::Fit {
                    reason: format!("Regression fit failed: {}", e),
                })?;
            RegressionModel::Full(fitted)
        };

        let mut predictions = Vec::with_capacity(scaled.len());
        for row in &scaled {
            let prediction = model
                .predict_scaled(row)
                .map_err(|e| TrainingError::Fit {
                    reason: format!("Post-fit prediction failed: {}", e),
                })?;
            predictions.push(prediction);
        }
        // Training-set R²: a fit-quality signal only, not a held-out metric.
        let r_squared = r_squared(&predictions, &y);

        let artifact = ModelArtifact::new(model, Some(scaler), y.len(), Utc::now());
        Ok(FittedModel {
            artifact,
            r_squared,
        })
    }
}

fn panic_reason(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Coefficient of determination. Zero-variance targets (including
/// single-sample fits) report 0.0 rather than dividing by zero.
fn r_squared(predictions: &[f64], targets: &[f64]) -> f64 {
    let n = targets.len() as f64;
    let mean = targets.iter().sum::<f64>() / n;
    let ss_res: f64 = predictions
        .iter()
        .zip(targets.iter())
        .map(|(p, t)| (t - p).powi(2))
        .sum();
    let ss_tot: f64 = targets.iter().map(|t| (t - mean).powi(2)).sum();
    if ss_tot > 0.0 {
        1.0 - ss_res / ss_tot
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::property::PropertyFeatures;

    fn property(bedrooms: i64, building: f64) -> PropertyFeatures {
        PropertyFeatures {
            bedrooms: Some(bedrooms),
            building_size_m2: Some(building),
            ..Default::default()
        }
    }

    /// Strictly more samples than features, so the full solver runs.
    fn linear_dataset(samples: i64) -> TrainingDataset {
        let properties = (0..samples)
            .map(|i| property(2 + i, 90.0 + 60.0 * i as f64))
            .collect();
        let prices = (0..samples)
            .map(|i| 400_000.0 + 200_000.0 * i as f64)
            .collect();
        TrainingDataset { properties, prices }
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let err = Trainer::new().fit(&TrainingDataset::default()).unwrap_err();
        assert_eq!(err.to_string(), REASON_NO_DATA);
    }

    #[test]
    fn test_empty_prices_rejected() {
        let dataset = TrainingDataset {
            properties: vec![property(3, 150.0)],
            prices: vec![],
        };
        let err = Trainer::new().fit(&dataset).unwrap_err();
        assert_eq!(err.to_string(), REASON_NO_DATA);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let dataset = TrainingDataset {
            properties: vec![property(2, 90.0), property(3, 150.0), property(4, 210.0)],
            prices: vec![450_000.0, 650_000.0],
        };
        let err = Trainer::new().fit(&dataset).unwrap_err();
        assert_eq!(err.to_string(), REASON_LENGTH_MISMATCH);
    }

    #[test]
    fn test_fit_linear_data_has_high_r_squared() {
        let fitted = Trainer::new().fit(&linear_dataset(12)).unwrap();
        assert!(fitted.r_squared > 0.99, "r²={}", fitted.r_squared);
        assert_eq!(fitted.artifact.samples, 12);
        assert!(fitted.artifact.scaler.is_some());
        assert!(matches!(fitted.artifact.model, RegressionModel::Full(_)));
    }

    #[test]
    fn test_small_dataset_fits_intercept_only() {
        // Fewer samples than features: underdetermined for the solver.
        let fitted = Trainer::new().fit(&linear_dataset(4)).unwrap();
        assert!(matches!(
            fitted.artifact.model,
            RegressionModel::InterceptOnly { .. }
        ));
        // Predictions are the mean target, for any input.
        let mean = (400_000.0 + 600_000.0 + 800_000.0 + 1_000_000.0) / 4.0;
        let anywhere = crate::domain::property::extract(&property(7, 500.0));
        let price = fitted.artifact.infer(&anywhere).unwrap();
        assert!((price - mean).abs() < 1e-6);
        // Constant predictions explain none of the target variance.
        assert_eq!(fitted.r_squared, 0.0);
    }

    #[test]
    fn test_single_sample_degenerate_fit() {
        let dataset = TrainingDataset {
            properties: vec![property(3, 150.0)],
            prices: vec![750_000.0],
        };
        let fitted = Trainer::new().fit(&dataset).unwrap();
        // Zero target variance: R² is defined as 0.0 rather than NaN.
        assert_eq!(fitted.r_squared, 0.0);
        assert_eq!(fitted.artifact.samples, 1);
        // The single sample predicts its own price.
        let vector = crate::domain::property::extract(&property(3, 150.0));
        let price = fitted.artifact.infer(&vector).unwrap();
        assert!((price - 750_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_boundary_dataset_stays_on_intercept_path() {
        // Exactly as many samples as features is still underdetermined
        // once the intercept column joins the design.
        let fitted = Trainer::new().fit(&linear_dataset(FEATURE_COUNT as i64)).unwrap();
        assert!(matches!(
            fitted.artifact.model,
            RegressionModel::InterceptOnly { .. }
        ));
    }

    #[test]
    fn test_r_squared_perfect_fit() {
        let targets = [1.0, 2.0, 3.0];
        assert_eq!(r_squared(&targets, &targets), 1.0);
    }
}
