//! Recursive multi-step demand forecasting.
//!
//! Each step derives the next day's feature vector entirely from the rolling
//! window of observed-or-predicted quantities, scores it, and appends the
//! clamped prediction to the window as if it were an observation. Later
//! predictions are therefore built on earlier predictions, so uncertainty
//! compounds with horizon; this is the intended forecast semantics, not an
//! accumulation bug.

use crate::core::{DailySeries, ForecastPoint};
use crate::error::{ForecastError, Result};
use crate::features::calendar_features;
use crate::training::TrainedModel;
use crate::utils::{mean, std_dev};
use chrono::NaiveDate;

/// How many trailing observations seed the recursive window.
const SEED_WINDOW: usize = 30;

/// Produce `days_ahead` consecutive forecast points starting the day after
/// the last observed date.
pub fn forecast_demand(
    model: &TrainedModel,
    series: &DailySeries,
    days_ahead: usize,
) -> Result<Vec<ForecastPoint>> {
    if series.is_empty() {
        return Err(ForecastError::EmptyData);
    }

    let quantities = series.quantities();
    let start = quantities.len().saturating_sub(SEED_WINDOW);
    let mut window: Vec<f64> = quantities[start..].to_vec();

    let mut date = series
        .last_date()
        .ok_or(ForecastError::EmptyData)?;
    let mut points = Vec::with_capacity(days_ahead);

    for _ in 0..days_ahead {
        date = date
            .succ_opt()
            .ok_or_else(|| ForecastError::DateError("forecast date overflow".to_string()))?;

        let vector = next_feature_vector(&window, date);
        let raw = model.predict(&vector)?;
        let point = ForecastPoint::new(date, raw);

        // Feed the prediction back as if observed.
        window.push(point.predicted);
        points.push(point);
    }

    Ok(points)
}

/// Feature vector for the next calendar day, in training feature order.
///
/// Lags with insufficient history fall back to the window mean; rolling
/// statistics use the trailing 7/30 entries of the window.
fn next_feature_vector(window: &[f64], date: NaiveDate) -> Vec<f64> {
    let n = window.len();
    let fallback = mean(window);

    let lag1 = window[n - 1];
    let lag7 = if n >= 7 { window[n - 7] } else { fallback };
    let lag30 = if n >= 30 { window[n - 30] } else { fallback };

    let tail7 = &window[n.saturating_sub(7)..];
    let tail30 = &window[n.saturating_sub(30)..];
    let rolling_mean7 = mean(tail7);
    let rolling_std7 = {
        let s = std_dev(tail7);
        if s.is_finite() {
            s
        } else {
            0.0
        }
    };
    let rolling_mean30 = mean(tail30);

    let (day_of_week, month, quarter, _, _) = calendar_features(date);

    vec![
        lag1,
        lag7,
        lag30,
        rolling_mean7,
        rolling_std7,
        rolling_mean30,
        day_of_week as f64,
        month as f64,
        quarter as f64,
    ]
}
