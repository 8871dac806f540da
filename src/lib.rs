//! # demand-forecast
//!
//! Retail demand forecasting and inventory optimization engine.
//!
//! From historical per-store sales, the crate builds a daily time series
//! with calendar/lag/rolling features, trains an ensemble regression model
//! on a strictly chronological split, produces a recursive multi-day demand
//! forecast, flags abnormal sales days, and derives inventory control
//! parameters (reorder point, safety stock, economic order quantity) with
//! actionable recommendations.
//!
//! The data store boundaries are the [`pipeline::SalesHistoryProvider`] and
//! [`pipeline::ForecastSink`] traits; the numerical core performs no I/O and
//! is deterministic given a seed.

#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod detection;
pub mod error;
pub mod features;
pub mod forecaster;
pub mod inventory;
pub mod models;
pub mod pipeline;
pub mod recommend;
pub mod training;
pub mod transform;
pub mod utils;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::core::{DailySeries, ForecastPoint, SalesRecord};
    pub use crate::detection::{detect_anomalies, AnomalyRecord, AnomalySeverity};
    pub use crate::error::{ForecastError, Result};
    pub use crate::features::{build_features, FeatureRow};
    pub use crate::forecaster::forecast_demand;
    pub use crate::inventory::{optimize_inventory, InventoryConfig, InventoryParameters};
    pub use crate::models::Algorithm;
    pub use crate::pipeline::{
        DemandPipeline, ForecastSink, PipelineConfig, SalesHistoryProvider,
    };
    pub use crate::recommend::{generate_recommendations, Recommendation};
    pub use crate::training::{train_model, ModelConfig, TrainedModel};
    pub use crate::utils::{calculate_metrics, AccuracyMetrics};
}
