//! Regressor trait defining the common interface for demand models.

use crate::error::Result;
use crate::models::{GradientBoostingRegressor, RandomForestRegressor};

/// Common interface for regression models trainable on real-valued feature
/// vectors with real-valued targets.
///
/// Object-safe; the trainer works with `Box<dyn Regressor>`.
pub trait Regressor {
    /// Fit the model on a feature matrix (row vectors) and targets.
    fn fit(&mut self, features: &[Vec<f64>], targets: &[f64]) -> Result<()>;

    /// Score a single feature vector.
    fn predict(&self, features: &[f64]) -> Result<f64>;

    /// Relative per-feature importances: non-negative, sum to 1.
    fn feature_importances(&self) -> Result<Vec<f64>>;

    /// Model name for reporting.
    fn name(&self) -> &'static str;

    /// Check if the model has been fitted.
    fn is_fitted(&self) -> bool;
}

/// Type alias for boxed regressor trait objects.
pub type BoxedRegressor = Box<dyn Regressor + Send>;

/// Which ensemble algorithm the trainer should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// Gradient-boosted trees: 100 estimators, learning rate 0.1, depth 5.
    #[default]
    GradientBoosting,
    /// Random forest: 100 estimators, depth 10, bootstrap sampling.
    RandomForest,
}

impl Algorithm {
    /// Instantiate an unfitted regressor with the default hyperparameters
    /// for this algorithm.
    pub fn build(&self, seed: u64) -> BoxedRegressor {
        match self {
            Algorithm::GradientBoosting => {
                Box::new(GradientBoostingRegressor::new(100, 0.1, 5))
            }
            Algorithm::RandomForest => Box::new(RandomForestRegressor::new(100, 10, seed)),
        }
    }
}
