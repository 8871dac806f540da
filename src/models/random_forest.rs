//! Random-forest regression trees.
//!
//! Each tree is fitted on a bootstrap resample of the training rows; the
//! forest prediction is the mean over trees. Seeded for reproducible runs.

use crate::error::{ForecastError, Result};
use crate::models::gradient_boosting::normalize_importances;
use crate::models::tree::{RegressionTree, TreeParams};
use crate::models::Regressor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random forest regressor with bootstrap aggregation.
#[derive(Debug, Clone)]
pub struct RandomForestRegressor {
    n_estimators: usize,
    max_depth: usize,
    seed: u64,
    trees: Vec<RegressionTree>,
    n_features: usize,
}

impl RandomForestRegressor {
    pub fn new(n_estimators: usize, max_depth: usize, seed: u64) -> Self {
        Self {
            n_estimators,
            max_depth,
            seed,
            trees: Vec::new(),
            n_features: 0,
        }
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl Default for RandomForestRegressor {
    fn default() -> Self {
        Self::new(100, 10, 42)
    }
}

impl Regressor for RandomForestRegressor {
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

        let n = targets.len();
        self.n_features = features[0].len();
        self.trees = Vec::with_capacity(self.n_estimators);

        let params = TreeParams {
            max_depth: self.max_depth,
            min_samples_split: 2,
        };

        for i in 0..self.n_estimators {
            // Per-tree seed so trees differ but the forest reproduces.
            let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(i as u64));
            let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            self.trees
                .push(RegressionTree::fit(features, targets, &sample, &params));
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
        let sum: f64 = self.trees.iter().map(|t| t.predict(features)).sum();
        Ok(sum / self.trees.len() as f64)
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
        "RandomForest"
    }

    fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }
}
