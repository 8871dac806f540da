//! Statistical anomaly detection on the raw daily series.
//!
//! A day is anomalous when its quantity deviates from the trailing 30-day
//! rolling mean by more than `threshold` standard deviations. Days inside
//! the warm-up region, and days whose rolling standard deviation is zero or
//! undefined, produce no verdict at all; they are excluded rather than
//! scored as infinitely deviant.

use crate::core::DailySeries;
use chrono::NaiveDate;

/// Rolling window length for the anomaly baseline.
const BASELINE_WINDOW: usize = 30;

/// Default deviation threshold in standard deviations.
pub const DEFAULT_THRESHOLD: f64 = 2.5;

/// Z-score above which an anomaly is high severity.
const HIGH_SEVERITY_Z: f64 = 3.0;

/// How far an anomalous day deviates from its baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnomalySeverity {
    Medium,
    High,
}

/// A flagged sales day.
#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyRecord {
    pub date: NaiveDate,
    pub observed: f64,
    pub expected: f64,
    pub deviation: f64,
    pub z_score: f64,
    pub severity: AnomalySeverity,
}

/// Flag days deviating more than `threshold` standard deviations from their
/// trailing 30-day baseline.
pub fn detect_anomalies(series: &DailySeries, threshold: f64) -> Vec<AnomalyRecord> {
    let quantities = series.quantities();
    let dates = series.dates();
    let n = quantities.len();

    let mut anomalies = Vec::new();
    // The first BASELINE_WINDOW observations have no verdict.
    for i in BASELINE_WINDOW..n {
        let window = &quantities[i + 1 - BASELINE_WINDOW..=i];
        let mean = window.iter().sum::<f64>() / BASELINE_WINDOW as f64;
        let var = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>()
            / (BASELINE_WINDOW - 1) as f64;
        let std = var.sqrt();

        if !std.is_finite() || std < 1e-10 {
            continue;
        }

        let z_score = (quantities[i] - mean).abs() / std;
        if z_score > threshold {
            anomalies.push(AnomalyRecord {
                date: dates[i],
                observed: quantities[i],
                expected: mean,
                deviation: quantities[i] - mean,
                z_score,
                severity: if z_score > HIGH_SEVERITY_Z {
                    AnomalySeverity::High
                } else {
                    AnomalySeverity::Medium
                },
            });
        }
    }

    anomalies
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn make_series(values: &[f64]) -> DailySeries {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let dates: Vec<NaiveDate> = (0..values.len())
            .map(|i| base + Duration::days(i as i64))
            .collect();
        DailySeries::from_parts(dates, values.to_vec()).unwrap()
    }

    /// Flat series with mild noise so the rolling std is non-zero.
    fn noisy_flat(n: usize, base: f64) -> Vec<f64> {
        (0..n)
            .map(|i| base + ((i * 7 + 3) % 5) as f64 - 2.0)
            .collect()
    }

    #[test]
    fn spike_in_flat_series_is_high_severity() {
        let mut values = vec![50.0; 60];
        values[45] = 10_000.0;
        let series = make_series(&values);

        let anomalies = detect_anomalies(&series, DEFAULT_THRESHOLD);

        assert_eq!(anomalies.len(), 1);
        let anomaly = &anomalies[0];
        assert_eq!(anomaly.date, series.dates()[45]);
        assert_eq!(anomaly.severity, AnomalySeverity::High);
        assert!(anomaly.z_score > 3.0);
        assert!(anomaly.deviation > 0.0);
    }

    #[test]
    fn first_thirty_observations_are_never_flagged() {
        let mut values = noisy_flat(60, 50.0);
        values[10] = 10_000.0; // extreme, but inside the warm-up region
        let series = make_series(&values);

        let anomalies = detect_anomalies(&series, DEFAULT_THRESHOLD);
        let cutoff = series.dates()[BASELINE_WINDOW];
        assert!(anomalies.iter().all(|a| a.date >= cutoff));
        assert!(!anomalies.iter().any(|a| a.date == series.dates()[10]));
    }

    #[test]
    fn zero_variance_days_are_excluded_not_flagged() {
        // Perfectly constant series: rolling std is 0 everywhere, so even
        // though every z-score would be division by zero, nothing is flagged.
        let series = make_series(&vec![100.0; 90]);
        assert!(detect_anomalies(&series, DEFAULT_THRESHOLD).is_empty());
    }

    #[test]
    fn normal_variation_is_not_flagged() {
        let series = make_series(&noisy_flat(120, 200.0));
        assert!(detect_anomalies(&series, DEFAULT_THRESHOLD).is_empty());
    }

    #[test]
    fn threshold_controls_sensitivity() {
        let mut values = noisy_flat(80, 50.0);
        values[50] = 62.0; // moderate bump
        let series = make_series(&values);

        let strict = detect_anomalies(&series, 10.0);
        let loose = detect_anomalies(&series, 2.0);
        assert!(strict.len() <= loose.len());
    }

    #[test]
    fn short_series_produces_no_verdicts() {
        let series = make_series(&noisy_flat(25, 10.0));
        assert!(detect_anomalies(&series, DEFAULT_THRESHOLD).is_empty());
    }
}
