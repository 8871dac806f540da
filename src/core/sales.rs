//! Sales record input and daily aggregated series.

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// A single sales transaction, as supplied by the historical data provider.
///
/// Immutable input; the engine never mutates these.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    pub date: NaiveDate,
    pub quantity: u32,
    pub unit_price: f64,
    pub total_revenue: f64,
    pub category: String,
    pub store_code: String,
}

impl SalesRecord {
    pub fn new(
        date: NaiveDate,
        quantity: u32,
        unit_price: f64,
        category: impl Into<String>,
        store_code: impl Into<String>,
    ) -> Self {
        let total_revenue = quantity as f64 * unit_price;
        Self {
            date,
            quantity,
            unit_price,
            total_revenue,
            category: category.into(),
            store_code: store_code.into(),
        }
    }
}

/// Daily sales series aggregated from transaction records.
///
/// Dates are strictly increasing. Missing days are simply absent, not
/// zero-filled; rolling windows operate over observations, not calendar days.
#[derive(Debug, Clone, Default)]
pub struct DailySeries {
    dates: Vec<NaiveDate>,
    quantities: Vec<f64>,
    revenues: Vec<f64>,
}

impl DailySeries {
    /// Aggregate transaction records into a daily series, summing quantity
    /// and revenue per date.
    pub fn from_records(records: &[SalesRecord]) -> Result<Self> {
        if records.is_empty() {
            return Err(ForecastError::EmptyData);
        }

        let mut by_date: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
        for record in records {
            let entry = by_date.entry(record.date).or_insert((0.0, 0.0));
            entry.0 += record.quantity as f64;
            entry.1 += record.total_revenue;
        }

        let mut dates = Vec::with_capacity(by_date.len());
        let mut quantities = Vec::with_capacity(by_date.len());
        let mut revenues = Vec::with_capacity(by_date.len());
        for (date, (quantity, revenue)) in by_date {
            dates.push(date);
            quantities.push(quantity);
            revenues.push(revenue);
        }

        Ok(Self {
            dates,
            quantities,
            revenues,
        })
    }

    /// Construct directly from parallel date/quantity vectors.
    ///
    /// Dates must be strictly increasing.
    pub fn from_parts(dates: Vec<NaiveDate>, quantities: Vec<f64>) -> Result<Self> {
        if dates.len() != quantities.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: dates.len(),
                got: quantities.len(),
            });
        }
        for i in 1..dates.len() {
            if dates[i] <= dates[i - 1] {
                return Err(ForecastError::DateError(
                    "dates must be strictly increasing".to_string(),
                ));
            }
        }
        let revenues = vec![0.0; quantities.len()];
        Ok(Self {
            dates,
            quantities,
            revenues,
        })
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn quantities(&self) -> &[f64] {
        &self.quantities
    }

    pub fn revenues(&self) -> &[f64] {
        &self.revenues
    }

    /// The most recent date in the series.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }
}
