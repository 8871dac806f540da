//! Per-feature standardization (zero mean, unit variance).
//!
//! The scaler is fitted on the training partition only and then applied
//! unchanged to evaluation and forecast-time feature vectors, so no
//! statistics leak from the future into training.

use crate::error::{ForecastError, Result};

/// Per-column standardization parameters fitted from training data.
#[derive(Debug, Clone)]
pub struct FeatureScaler {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl FeatureScaler {
    /// Fit a scaler from a matrix of row vectors.
    ///
    /// Columns with near-zero variance get a scale of 1.0 so constant
    /// features pass through centered instead of dividing by zero.
    pub fn fit(rows: &[Vec<f64>]) -> Result<Self> {
        if rows.is_empty() {
            return Err(ForecastError::EmptyData);
        }
        let dims = rows[0].len();
        for row in rows {
            if row.len() != dims {
                return Err(ForecastError::DimensionMismatch {
                    expected: dims,
                    got: row.len(),
                });
            }
        }

        let n = rows.len() as f64;
        let mut means = vec![0.0; dims];
        for row in rows {
            for (m, &x) in means.iter_mut().zip(row.iter()) {
                *m += x;
            }
        }
        for m in &mut means {
            *m /= n;
        }

        let mut scales = vec![0.0; dims];
        if rows.len() > 1 {
            for row in rows {
                for (s, (&x, &m)) in scales.iter_mut().zip(row.iter().zip(means.iter())) {
                    *s += (x - m).powi(2);
                }
            }
            for s in &mut scales {
                *s = (*s / (n - 1.0)).sqrt();
            }
        }
        for s in &mut scales {
            if *s < 1e-10 {
                *s = 1.0;
            }
        }

        Ok(Self { means, scales })
    }

    /// Standardize a single feature vector with the fitted parameters.
    pub fn transform(&self, row: &[f64]) -> Result<Vec<f64>> {
        if row.len() != self.means.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: self.means.len(),
                got: row.len(),
            });
        }
        Ok(row
            .iter()
            .zip(self.means.iter().zip(self.scales.iter()))
            .map(|(&x, (&m, &s))| (x - m) / s)
            .collect())
    }

    /// Standardize a matrix of row vectors.
    pub fn transform_matrix(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        rows.iter().map(|row| self.transform(row)).collect()
    }

    /// Number of features the scaler was fitted on.
    pub fn dims(&self) -> usize {
        self.means.len()
    }
}
