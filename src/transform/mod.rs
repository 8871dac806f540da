//! Data transforms: rolling window statistics and feature scaling.

pub mod scale;
pub mod window;

pub use scale::FeatureScaler;
pub use window::{rolling_mean, rolling_std};
