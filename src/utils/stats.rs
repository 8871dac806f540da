//! Statistical utility functions.

use statrs::distribution::{ContinuousCDF, Normal};

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Calculate the variance of a slice (sample variance with n-1 denominator).
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    sum_sq / (values.len() - 1) as f64
}

/// Calculate the standard deviation of a slice.
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Quantile function of the standard normal distribution.
///
/// Used to derive the service-level z-value, e.g. `quantile_normal(0.95)`
/// is approximately 1.645 for a 95% one-sided service level.
///
/// # Example
/// ```
/// use demand_forecast::utils::quantile_normal;
///
/// let z = quantile_normal(0.95);
/// assert!((z - 1.645).abs() < 0.001);
/// ```
pub fn quantile_normal(p: f64) -> f64 {
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }
    // Standard normal always constructs successfully.
    let normal = Normal::new(0.0, 1.0).unwrap();
    normal.inverse_cdf(p)
}
