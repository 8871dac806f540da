//! Core data structures: sales records, daily series, forecast points.

pub mod forecast;
pub mod sales;

pub use forecast::ForecastPoint;
pub use sales::{DailySeries, SalesRecord};
