use serde::{Deserialize, Serialize};

use crate::domain::property::{FeatureVector, FEATURE_COUNT};

/// Per-column standardization fitted on a training matrix. Persisted inside
/// the model artifact so inference always scales with the exact parameters
/// the regression was trained against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StandardScaler {
    mean: Vec<f64>,
    std: Vec<f64>,
}

impl StandardScaler {
    /// Fits column means and standard deviations on the feature matrix.
    /// Zero-variance columns (including single-sample fits) get a divisor
    /// of 1.0 so transforms stay finite.
    pub fn fit(rows: &[FeatureVector]) -> Self {
        let n = rows.len().max(1) as f64;
        let mut mean = vec![0.0; FEATURE_COUNT];
        let mut std = vec![0.0; FEATURE_COUNT];

        for row in rows {
            for (col, value) in row.iter().enumerate() {
                mean[col] += value;
            }
        }
        for m in mean.iter_mut() {
            *m /= n;
        }

        for row in rows {
            for (col, value) in row.iter().enumerate() {
                std[col] += (value - mean[col]).powi(2);
            }
        }
        for s in std.iter_mut() {
            *s = (*s / n).sqrt();
            if *s == 0.0 {
                *s = 1.0;
            }
        }

        Self { mean, std }
    }

    pub fn transform(&self, vector: &FeatureVector) -> FeatureVector {
        let mut scaled = [0.0; FEATURE_COUNT];
        for (col, value) in vector.iter().enumerate() {
            scaled[col] = (value - self.mean[col]) / self.std[col];
        }
        scaled
    }

    pub fn transform_matrix(&self, rows: &[FeatureVector]) -> Vec<FeatureVector> {
        rows.iter().map(|row| self.transform(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_transform_standardizes() {
        let rows = vec![
            [1.0, 10.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [3.0, 30.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        ];
        let scaler = StandardScaler::fit(&rows);
        let scaled = scaler.transform_matrix(&rows);

        // Column 0: mean 2, std 1 -> values -1 and +1
        assert!((scaled[0][0] + 1.0).abs() < 1e-12);
        assert!((scaled[1][0] - 1.0).abs() < 1e-12);
        // Column 1: mean 20, std 10 -> values -1 and +1
        assert!((scaled[0][1] + 1.0).abs() < 1e-12);
        assert!((scaled[1][1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_variance_column_stays_finite() {
        let rows = vec![
            [5.0, 2.0, 1.0, 500.0, 120.0, -33.8688, 151.2093, 50.0],
            [5.0, 4.0, 1.0, 500.0, 120.0, -33.8688, 151.2093, 50.0],
        ];
        let scaler = StandardScaler::fit(&rows);
        let scaled = scaler.transform(&rows[0]);
        assert!(scaled.iter().all(|v| v.is_finite()));
        // Constant column scales to exactly zero
        assert_eq!(scaled[0], 0.0);
    }

    #[test]
    fn test_single_sample_fit() {
        let rows = vec![[3.0, 2.0, 1.0, 500.0, 120.0, -33.8688, 151.2093, 50.0]];
        let scaler = StandardScaler::fit(&rows);
        let scaled = scaler.transform(&rows[0]);
        // Every column is zero-variance: the sample maps to the origin.
        assert!(scaled.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_serde_roundtrip() {
        let rows = vec![
            [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
            [2.0, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0, 16.0],
        ];
        let scaler = StandardScaler::fit(&rows);
        let json = serde_json::to_string(&scaler).unwrap();
        let restored: StandardScaler = serde_json::from_str(&json).unwrap();
        assert_eq!(scaler, restored);
    }
}
