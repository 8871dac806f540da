//! Gradient-boosted regression trees.
//!
//! Stagewise least-squares boosting: each tree is fitted to the residuals of
//! the ensemble so far and added with a shrinkage factor.

use crate::error::{ForecastError, Result};
use crate::models::tree::{RegressionTree, TreeParams};
use crate::models::Regressor;

/// Gradient boosting regressor with squared-error loss.
#[derive(Debug, Clone)]
pub struct GradientBoostingRegressor {
    n_estimators: usize,
    learning_rate: f64,
    max_depth: usize,
    baseline: f64,
    trees: Vec<RegressionTree>,
    n_features: usize,
}

impl GradientBoostingRegressor {
    pub fn new(n_estimators: usize, learning_rate: f64, max_depth: usize) -> Self {
        Self {
            n_estimators,
            learning_rate,
            max_depth,
            baseline: 0.0,
            trees: Vec::new(),
            n_features: 0,
        }
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl Default for GradientBoostingRegressor {
    fn default() -> Self {
        Self::new(100, 0.1, 5)
    }
}

impl Regressor for GradientBoostingRegressor {
    fn fit(&mut self, features: &[Vec<f64>], targets: &[f64]) -> Result<()> {
        if features.is_empty() || targets.is_empty() {
            return Err(ForecastError::EmptyData);
        }
        if features.len() != targets.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: features.len(),
                got: targets.len(),
            });
        }
        if self.learning_rate <= 0.0 {
            return Err(ForecastError::InvalidParameter(
                "learning rate must be positive".to_string(),
            ));
        }

        let n = targets.len();
        self.n_features = features[0].len();
        self.baseline = targets.iter().sum::<f64>() / n as f64;
        self.trees = Vec::with_capacity(self.n_estimators);

        let params = TreeParams {
            max_depth: self.max_depth,
            min_samples_split: 2,
        };
        let indices: Vec<usize> = (0..n).collect();
        let mut residuals: Vec<f64> = targets.iter().map(|&y| y - self.baseline).collect();

        for _ in 0..self.n_estimators {
            let tree = RegressionTree::fit(features, &residuals, &indices, &params);
            for (r, row) in residuals.iter_mut().zip(features.iter()) {
                *r -= self.learning_rate * tree.predict(row);
            }
            self.trees.push(tree);
        }

        Ok(())
    }

    fn predict(&self, features: &[f64]) -> Result<f64> {
        if self.trees.is_empty() {
            return Err(ForecastError::FitRequired);
        }
        if features.len() != self.n_features {
            return Err(ForecastError::DimensionMismatch {
                expected: self.n_features,
                got: features.len(),
            });
        }
        let boost: f64 = self.trees.iter().map(|t| t.predict(features)).sum();
        Ok(self.baseline + self.learning_rate * boost)
    }

    fn feature_importances(&self) -> Result<Vec<f64>> {
        if self.trees.is_empty() {
            return Err(ForecastError::FitRequired);
        }
        let mut totals = vec![0.0; self.n_features];
        for tree in &self.trees {
            for (t, &imp) in totals.iter_mut().zip(tree.importances().iter()) {
                *t += imp;
            }
        }
        Ok(normalize_importances(totals))
    }

    fn name(&self) -> &'static str {
        "GradientBoosting"
    }

    fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }
}

/// Scale importances to sum to 1. A degenerate fit (no splits anywhere)
/// reports uniform importance rather than an all-zero vector.
pub(crate) fn normalize_importances(mut importances: Vec<f64>) -> Vec<f64> {
    let total: f64 = importances.iter().sum();
    if total > 0.0 {
        for imp in &mut importances {
            *imp /= total;
        }
    } else if !importances.is_empty() {
        let uniform = 1.0 / importances.len() as f64;
        importances.fill(uniform);
    }
    importances
}
