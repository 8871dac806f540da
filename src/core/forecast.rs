//! Forecast output structure.

use chrono::NaiveDate;

/// Relative width of the confidence band around a point prediction.
const INTERVAL_WIDTH: f64 = 0.2;

/// A single forecasted day.
///
/// The predicted quantity is clamped to be non-negative, with a symmetric
/// +/-20% band around it.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted: f64,
    pub lower: f64,
    pub upper: f64,
}

impl ForecastPoint {
    /// Build a point from a raw model score, clamping negatives to zero.
    pub fn new(date: NaiveDate, raw_prediction: f64) -> Self {
        let predicted = raw_prediction.max(0.0);
        Self {
            date,
            predicted,
            lower: predicted * (1.0 - INTERVAL_WIDTH),
            upper: predicted * (1.0 + INTERVAL_WIDTH),
        }
    }
}
