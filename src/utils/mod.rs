//! Shared numeric utilities: scalar statistics and accuracy metrics.

pub mod metrics;
pub mod stats;

pub use metrics::{calculate_metrics, AccuracyMetrics};
pub use stats::{mean, quantile_normal, std_dev, variance};
