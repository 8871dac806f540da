//! Model training: chronological split, feature scaling, fitting,
//! and held-out evaluation.
//!
//! The split is strictly chronological (no shuffling): the first 80% of rows
//! by date train the model, the last 20% evaluate it. Scaler statistics come
//! from the training partition only, so nothing from the future leaks into
//! either training or evaluation.

use crate::error::{ForecastError, Result};
use crate::features::{FeatureRow, FEATURE_NAMES};
use crate::models::{Algorithm, BoxedRegressor};
use crate::transform::FeatureScaler;
use crate::utils::{calculate_metrics, AccuracyMetrics};
use std::collections::BTreeMap;

/// Minimum number of usable training rows.
pub const MIN_TRAINING_ROWS: usize = 100;

/// Fraction of rows used for training in the chronological split.
const TRAIN_FRACTION: f64 = 0.8;

/// Training configuration.
#[derive(Debug, Clone, Copy)]
pub struct ModelConfig {
    /// Which ensemble algorithm to fit.
    pub algorithm: Algorithm,
    /// Seed for algorithms that resample.
    pub seed: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::new(Algorithm::default())
    }
}

impl ModelConfig {
    pub fn new(algorithm: Algorithm) -> Self {
        Self { algorithm, seed: 42 }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// A fitted demand model: regressor, its scaler, evaluation metrics, and
/// per-feature importance weights. Owned per store; never shared.
pub struct TrainedModel {
    regressor: BoxedRegressor,
    scaler: FeatureScaler,
    metrics: AccuracyMetrics,
    importance: BTreeMap<String, f64>,
}

impl TrainedModel {
    /// Scale a raw feature vector with the fitted scaler and score it.
    pub fn predict(&self, features: &[f64]) -> Result<f64> {
        let scaled = self.scaler.transform(features)?;
        self.regressor.predict(&scaled)
    }

    pub fn metrics(&self) -> AccuracyMetrics {
        self.metrics
    }

    /// Feature name to relative importance; non-negative, sums to 1.
    pub fn importance(&self) -> &BTreeMap<String, f64> {
        &self.importance
    }

    pub fn algorithm_name(&self) -> &'static str {
        self.regressor.name()
    }
}

impl std::fmt::Debug for TrainedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrainedModel")
            .field("algorithm", &self.regressor.name())
            .field("metrics", &self.metrics)
            .finish()
    }
}

/// Train a demand model on engineered feature rows.
///
/// Rows with any undefined feature or target are dropped first; fewer than
/// [`MIN_TRAINING_ROWS`] usable rows is an `InsufficientData` error.
pub fn train_model(rows: &[FeatureRow], config: &ModelConfig) -> Result<TrainedModel> {
    let usable: Vec<&FeatureRow> = rows.iter().filter(|r| r.is_complete()).collect();
    if usable.len() < MIN_TRAINING_ROWS {
        return Err(ForecastError::InsufficientData {
            needed: MIN_TRAINING_ROWS,
            got: usable.len(),
        });
    }

    let features: Vec<Vec<f64>> = usable.iter().map(|r| r.vector()).collect();
    let targets: Vec<f64> = usable.iter().map(|r| r.quantity).collect();

    let train_size = (usable.len() as f64 * TRAIN_FRACTION) as usize;
    let (x_train, x_test) = features.split_at(train_size);
    let (y_train, y_test) = targets.split_at(train_size);

    let scaler = FeatureScaler::fit(x_train)?;
    let x_train_scaled = scaler.transform_matrix(x_train)?;
    let x_test_scaled = scaler.transform_matrix(x_test)?;

    let mut regressor = config.algorithm.build(config.seed);
    regressor.fit(&x_train_scaled, y_train)?;

    let predicted: Vec<f64> = x_test_scaled
        .iter()
        .map(|row| regressor.predict(row))
        .collect::<Result<_>>()?;
    let metrics = calculate_metrics(y_test, &predicted)?;

    let importance = FEATURE_NAMES
        .iter()
        .map(|name| name.to_string())
        .zip(regressor.feature_importances()?)
        .collect();

    Ok(TrainedModel {
        regressor,
        scaler,
        metrics,
        importance,
    })
}
