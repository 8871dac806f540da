//! Time-series feature engineering for the demand model.
//!
//! Each daily observation becomes a [`FeatureRow`] carrying calendar
//! features, lagged quantities, and trailing rolling statistics. Lag and
//! rolling values that are undefined at the start of the series are resolved
//! by back-filling from the nearest later defined value, then forward-filling
//! any remainder, so training input never contains undefined features.

use crate::core::DailySeries;
use crate::error::{ForecastError, Result};
use crate::transform::{rolling_mean, rolling_std};
use chrono::{Datelike, NaiveDate};

/// Names of the model features, in vector order.
pub const FEATURE_NAMES: [&str; 9] = [
    "quantity_lag1",
    "quantity_lag7",
    "quantity_lag30",
    "quantity_rolling_mean_7",
    "quantity_rolling_std_7",
    "quantity_rolling_mean_30",
    "day_of_week",
    "month",
    "quarter",
];

/// Number of model features.
pub const NUM_FEATURES: usize = FEATURE_NAMES.len();

/// One engineered observation: target quantity plus predictors.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub date: NaiveDate,
    /// Target: total quantity sold on this date.
    pub quantity: f64,
    /// Day of week, Monday = 0.
    pub day_of_week: u32,
    pub month: u32,
    pub quarter: u32,
    pub day_of_month: u32,
    pub week_of_year: u32,
    pub lag1: f64,
    pub lag7: f64,
    pub lag30: f64,
    pub rolling_mean7: f64,
    pub rolling_std7: f64,
    pub rolling_mean30: f64,
}

impl FeatureRow {
    /// Feature vector in [`FEATURE_NAMES`] order.
    pub fn vector(&self) -> Vec<f64> {
        vec![
            self.lag1,
            self.lag7,
            self.lag30,
            self.rolling_mean7,
            self.rolling_std7,
            self.rolling_mean30,
            self.day_of_week as f64,
            self.month as f64,
            self.quarter as f64,
        ]
    }

    /// True when target and every feature are finite.
    pub fn is_complete(&self) -> bool {
        self.quantity.is_finite() && self.vector().iter().all(|x| x.is_finite())
    }
}

/// Calendar features derived from a date. Total functions, never undefined.
pub fn calendar_features(date: NaiveDate) -> (u32, u32, u32, u32, u32) {
    let month = date.month();
    let quarter = (month - 1) / 3 + 1;
    (
        date.weekday().num_days_from_monday(),
        month,
        quarter,
        date.day(),
        date.iso_week().week(),
    )
}

/// Build feature rows from a daily series, one row per distinct date.
pub fn build_features(series: &DailySeries) -> Result<Vec<FeatureRow>> {
    if series.is_empty() {
        return Err(ForecastError::EmptyData);
    }

    let quantities = series.quantities();

    let mut lag1 = shift(quantities, 1);
    let mut lag7 = shift(quantities, 7);
    let mut lag30 = shift(quantities, 30);
    let mut rm7 = rolling_mean(quantities, 7);
    let mut rs7 = rolling_std(quantities, 7);
    let mut rm30 = rolling_mean(quantities, 30);

    for column in [
        &mut lag1, &mut lag7, &mut lag30, &mut rm7, &mut rs7, &mut rm30,
    ] {
        fill_undefined(column, quantities);
    }

    let rows = series
        .dates()
        .iter()
        .enumerate()
        .map(|(i, &date)| {
            let (day_of_week, month, quarter, day_of_month, week_of_year) =
                calendar_features(date);
            FeatureRow {
                date,
                quantity: quantities[i],
                day_of_week,
                month,
                quarter,
                day_of_month,
                week_of_year,
                lag1: lag1[i],
                lag7: lag7[i],
                lag30: lag30[i],
                rolling_mean7: rm7[i],
                rolling_std7: rs7[i],
                rolling_mean30: rm30[i],
            }
        })
        .collect();

    Ok(rows)
}

/// Shift a series by `k` positions; the first `k` entries are NaN.
fn shift(series: &[f64], k: usize) -> Vec<f64> {
    let mut result = vec![f64::NAN; series.len()];
    if k < series.len() {
        result[k..].copy_from_slice(&series[..series.len() - k]);
    }
    result
}

/// Resolve undefined entries: back-fill from the nearest later defined value,
/// forward-fill any remainder. A column with no defined value at all falls
/// back to the observed quantity itself, so a single-point series still
/// produces fully defined rows.
fn fill_undefined(column: &mut [f64], fallback: &[f64]) {
    let mut next_defined = f64::NAN;
    for i in (0..column.len()).rev() {
        if column[i].is_finite() {
            next_defined = column[i];
        } else if next_defined.is_finite() {
            column[i] = next_defined;
        }
    }

    let mut prev_defined = f64::NAN;
    for i in 0..column.len() {
        if column[i].is_finite() {
            prev_defined = column[i];
        } else if prev_defined.is_finite() {
            column[i] = prev_defined;
        }
    }

    for (x, &fb) in column.iter_mut().zip(fallback.iter()) {
        if !x.is_finite() {
            *x = fb;
        }
    }
}
