//! Trailing rolling window statistics.
//!
//! Windows are trailing and inclusive of the current observation. Positions
//! where the window has not yet filled are NaN; callers decide how to resolve
//! them (fill, skip).

/// Compute the trailing rolling mean over `window` observations.
pub fn rolling_mean(series: &[f64], window: usize) -> Vec<f64> {
    if series.is_empty() || window == 0 {
        return vec![f64::NAN; series.len()];
    }

    let n = series.len();
    let mut result = vec![f64::NAN; n];
    for i in 0..n {
        if i + 1 < window {
            continue;
        }
        let segment = &series[i + 1 - window..=i];
        result[i] = segment.iter().sum::<f64>() / window as f64;
    }
    result
}

/// Compute the trailing rolling sample standard deviation over `window`
/// observations (n-1 denominator).
pub fn rolling_std(series: &[f64], window: usize) -> Vec<f64> {
    if series.is_empty() || window < 2 {
        return vec![f64::NAN; series.len()];
    }

    let n = series.len();
    let mut result = vec![f64::NAN; n];
    for i in 0..n {
        if i + 1 < window {
            continue;
        }
        let segment = &series[i + 1 - window..=i];
        let mean = segment.iter().sum::<f64>() / window as f64;
        let var =
            segment.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (window - 1) as f64;
        result[i] = var.sqrt();
    }
    result
}
