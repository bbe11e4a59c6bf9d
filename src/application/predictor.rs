use std::panic::{catch_unwind, AssertUnwindSafe};

use chrono::Utc;
use tracing::warn;

use crate::domain::artifact::ModelArtifact;
use crate::domain::property::{FeatureVector, FEATURE_COUNT};
use crate::domain::types::{PredictionResult, FALLBACK_CONFIDENCE, MODEL_CONFIDENCE, MODEL_VERSION};

/// Produces a price estimate from a feature vector. Uses the trained
/// artifact when one is supplied; otherwise, or on any inference failure,
/// degrades to the deterministic heuristic. Never returns an error, and
/// contains solver panics so nothing propagates to the caller.
#[derive(Debug, Default)]
pub struct Predictor;

impl Predictor {
    pub fn new() -> Self {
        Self
    }

    pub fn predict(
        &self,
        vector: &FeatureVector,
        artifact: Option<&ModelArtifact>,
    ) -> PredictionResult {
        let (price, confidence) = match artifact {
            Some(artifact) => {
                match catch_unwind(AssertUnwindSafe(|| artifact.infer(vector))) {
                    Ok(Ok(price)) => (price, MODEL_CONFIDENCE),
                    Ok(Err(e)) => {
                        warn!("Model inference failed: {}. Using fallback heuristic.", e);
                        (fallback_price(vector), FALLBACK_CONFIDENCE)
                    }
                    Err(_) => {
                        warn!("Model inference panicked. Using fallback heuristic.");
                        (fallback_price(vector), FALLBACK_CONFIDENCE)
                    }
                }
            }
            None => (fallback_price(vector), FALLBACK_CONFIDENCE),
        };

        PredictionResult {
            price,
            confidence,
            model_version: MODEL_VERSION.to_string(),
            predicted_at: Utc::now(),
        }
    }
}

/// Deterministic estimate used when no model is available: the mean of
/// the feature vector times 1000. Depends on nothing external, so this
/// path always succeeds.
fn fallback_price(vector: &FeatureVector) -> f64 {
    vector.iter().sum::<f64>() / FEATURE_COUNT as f64 * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::trainer::Trainer;
    use crate::domain::artifact::RegressionModel;
    use crate::domain::property::{extract, PropertyFeatures};
    use crate::domain::types::TrainingDataset;

    fn property(bedrooms: i64, building: f64) -> PropertyFeatures {
        PropertyFeatures {
            bedrooms: Some(bedrooms),
            building_size_m2: Some(building),
            ..Default::default()
        }
    }

    #[test]
    fn test_fallback_without_artifact() {
        let vector = extract(&PropertyFeatures::default());
        let result = Predictor::new().predict(&vector, None);

        let expected = vector.iter().sum::<f64>() / 8.0 * 1000.0;
        assert_eq!(result.price, expected);
        assert_eq!(result.confidence, FALLBACK_CONFIDENCE);
        assert_eq!(result.model_version, MODEL_VERSION);
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let vector = extract(&PropertyFeatures {
            bedrooms: Some(3),
            ..Default::default()
        });
        let predictor = Predictor::new();
        let first = predictor.predict(&vector, None);
        let second = predictor.predict(&vector, None);
        assert_eq!(first.price, second.price);
    }

    #[test]
    fn test_model_prediction_has_model_confidence() {
        // Twelve collinear samples: enough for the full solver.
        let properties: Vec<PropertyFeatures> = (0..12)
            .map(|i| property(2 + i, 90.0 + 60.0 * i as f64))
            .collect();
        let prices: Vec<f64> = (0..12).map(|i| 400_000.0 + 200_000.0 * i as f64).collect();
        let dataset = TrainingDataset {
            properties: properties.clone(),
            prices: prices.clone(),
        };
        let fitted = Trainer::new().fit(&dataset).unwrap();
        assert!(matches!(fitted.artifact.model, RegressionModel::Full(_)));

        let vector = extract(&properties[5]);
        let result = Predictor::new().predict(&vector, Some(&fitted.artifact));
        assert_eq!(result.confidence, MODEL_CONFIDENCE);
        // Linear fit through collinear points recovers the target.
        assert!((result.price - prices[5]).abs() < 1.0);
    }

    #[test]
    fn test_intercept_only_artifact_predicts_mean() {
        let dataset = TrainingDataset {
            properties: vec![property(2, 100.0), property(4, 200.0)],
            prices: vec![500_000.0, 900_000.0],
        };
        let fitted = Trainer::new().fit(&dataset).unwrap();

        let vector = extract(&PropertyFeatures::default());
        let result = Predictor::new().predict(&vector, Some(&fitted.artifact));
        assert_eq!(result.confidence, MODEL_CONFIDENCE);
        assert!((result.price - 700_000.0).abs() < 1e-6);
    }
}
