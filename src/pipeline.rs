//! Per-store pipeline orchestration.
//!
//! Wires the external collaborators (history provider, forecast sink) to the
//! numerical core: features -> training -> recursive forecast -> anomaly
//! detection -> inventory optimization -> recommendations. Each store is
//! processed independently; a failing store is reported and skipped without
//! aborting the batch. Trained models live in an explicit keyed store owned
//! by the pipeline, never in ambient state.

use crate::core::{DailySeries, ForecastPoint, SalesRecord};
use crate::detection::{detect_anomalies, AnomalyRecord, DEFAULT_THRESHOLD};
use crate::error::{ForecastError, Result};
use crate::features::build_features;
use crate::forecaster::forecast_demand;
use crate::inventory::{optimize_inventory, InventoryConfig, InventoryParameters};
use crate::recommend::{generate_recommendations, Recommendation};
use crate::training::{train_model, ModelConfig, TrainedModel, MIN_TRAINING_ROWS};
use crate::utils::AccuracyMetrics;
use std::collections::HashMap;
use tracing::{info, warn};

/// Supplies historical sales for a store (or globally when `store_code` is
/// `None`) over a trailing window. An empty result is valid and is treated
/// as insufficient data downstream, not as an error.
pub trait SalesHistoryProvider {
    fn fetch(&self, store_code: Option<&str>, window_days: u32) -> Result<Vec<SalesRecord>>;
}

/// Persists forecast points. Implementations must upsert keyed by
/// (store, date): repeated writes for the same date overwrite.
pub trait ForecastSink {
    fn store(&mut self, store_code: &str, points: &[ForecastPoint]) -> Result<()>;
}

/// Configuration surface for a pipeline run.
#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    pub model: ModelConfig,
    pub anomaly_threshold: f64,
    /// Forecast horizon in days.
    pub days_ahead: usize,
    /// Trailing history window requested from the provider.
    pub window_days: u32,
    pub inventory: InventoryConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            anomaly_threshold: DEFAULT_THRESHOLD,
            days_ahead: 30,
            window_days: 365,
            inventory: InventoryConfig::default(),
        }
    }
}

/// Everything produced for one store in one pipeline invocation.
#[derive(Debug)]
pub struct StoreReport {
    pub store_code: String,
    pub metrics: AccuracyMetrics,
    pub forecasts: Vec<ForecastPoint>,
    pub anomalies: Vec<AnomalyRecord>,
    pub inventory: InventoryParameters,
    pub recommendations: Vec<Recommendation>,
}

/// Outcome of a batch run over several stores.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub reports: Vec<StoreReport>,
    pub failures: Vec<(String, ForecastError)>,
}

impl BatchReport {
    /// Unweighted cross-store accuracy aggregate over successful stores.
    pub fn overall_metrics(&self) -> Option<AccuracyMetrics> {
        if self.reports.is_empty() {
            return None;
        }
        let n = self.reports.len() as f64;
        Some(AccuracyMetrics {
            r_squared: self.reports.iter().map(|r| r.metrics.r_squared).sum::<f64>() / n,
            mae: self.reports.iter().map(|r| r.metrics.mae).sum::<f64>() / n,
            rmse: self.reports.iter().map(|r| r.metrics.rmse).sum::<f64>() / n,
        })
    }
}

/// The demand forecasting pipeline for a set of stores.
pub struct DemandPipeline<P, S> {
    provider: P,
    sink: S,
    config: PipelineConfig,
    /// Keyed model store: one trained model and scaler per store.
    models: HashMap<String, TrainedModel>,
}

impl<P: SalesHistoryProvider, S: ForecastSink> DemandPipeline<P, S> {
    pub fn new(provider: P, sink: S, config: PipelineConfig) -> Self {
        Self {
            provider,
            sink,
            config,
            models: HashMap::new(),
        }
    }

    /// Run the full pipeline for one store.
    ///
    /// Either a complete forecast set reaches the sink, or nothing does:
    /// the sink is only written after every computation stage succeeded.
    pub fn run_store(&mut self, store_code: &str) -> Result<StoreReport> {
        let records = self
            .provider
            .fetch(Some(store_code), self.config.window_days)?;
        if records.len() < MIN_TRAINING_ROWS {
            return Err(ForecastError::InsufficientData {
                needed: MIN_TRAINING_ROWS,
                got: records.len(),
            });
        }

        let series = DailySeries::from_records(&records)?;
        let rows = build_features(&series)?;
        let model = train_model(&rows, &self.config.model)?;
        info!(
            store = store_code,
            algorithm = model.algorithm_name(),
            r_squared = model.metrics().r_squared,
            mae = model.metrics().mae,
            rmse = model.metrics().rmse,
            "model trained"
        );

        let forecasts = forecast_demand(&model, &series, self.config.days_ahead)?;
        let anomalies = detect_anomalies(&series, self.config.anomaly_threshold);
        let inventory = optimize_inventory(series.quantities(), &self.config.inventory);
        let recommendations = generate_recommendations(&forecasts, &inventory);

        self.sink.store(store_code, &forecasts)?;
        let metrics = model.metrics();
        self.models.insert(store_code.to_string(), model);
        info!(
            store = store_code,
            forecast_days = forecasts.len(),
            anomalies = anomalies.len(),
            reorder_point = inventory.reorder_point,
            "pipeline run complete"
        );

        Ok(StoreReport {
            store_code: store_code.to_string(),
            metrics,
            forecasts,
            anomalies,
            inventory,
            recommendations,
        })
    }

    /// Run the pipeline for every store, continuing past per-store failures.
    pub fn run_batch(&mut self, store_codes: &[String]) -> BatchReport {
        let mut batch = BatchReport::default();
        for store_code in store_codes {
            match self.run_store(store_code) {
                Ok(report) => batch.reports.push(report),
                Err(err) => {
                    warn!(store = store_code.as_str(), error = %err, "store skipped");
                    batch.failures.push((store_code.clone(), err));
                }
            }
        }
        batch
    }

    /// Re-forecast a store with its already-trained model.
    ///
    /// Fails with `MissingScaler` when no model was trained for the store
    /// in this session.
    pub fn forecast_store(
        &self,
        store_code: &str,
        series: &DailySeries,
        days_ahead: usize,
    ) -> Result<Vec<ForecastPoint>> {
        let model = self
            .models
            .get(store_code)
            .ok_or(ForecastError::MissingScaler)?;
        forecast_demand(model, series, days_ahead)
    }

    /// Access the trained model for a store, if any.
    pub fn model(&self, store_code: &str) -> Option<&TrainedModel> {
        self.models.get(store_code)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    struct FixedProvider {
        records: HashMap<String, Vec<SalesRecord>>,
    }

    impl SalesHistoryProvider for FixedProvider {
        fn fetch(&self, store_code: Option<&str>, _window_days: u32) -> Result<Vec<SalesRecord>> {
            Ok(store_code
                .and_then(|code| self.records.get(code))
                .cloned()
                .unwrap_or_default())
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        writes: Vec<(String, usize)>,
    }

    impl ForecastSink for RecordingSink {
        fn store(&mut self, store_code: &str, points: &[ForecastPoint]) -> Result<()> {
            self.writes.push((store_code.to_string(), points.len()));
            Ok(())
        }
    }

    fn make_records(store: &str, days: usize) -> Vec<SalesRecord> {
        let base = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        (0..days)
            .map(|i| {
                SalesRecord::new(
                    base + Duration::days(i as i64),
                    40 + (i % 7) as u32 * 5,
                    3.0,
                    "grocery",
                    store,
                )
            })
            .collect()
    }

    fn pipeline_with(
        records: HashMap<String, Vec<SalesRecord>>,
    ) -> DemandPipeline<FixedProvider, RecordingSink> {
        DemandPipeline::new(
            FixedProvider { records },
            RecordingSink::default(),
            PipelineConfig::default(),
        )
    }

    #[test]
    fn run_store_produces_full_report_and_writes_sink() {
        let mut records = HashMap::new();
        records.insert("S001".to_string(), make_records("S001", 200));
        let mut pipeline = pipeline_with(records);

        let report = pipeline.run_store("S001").unwrap();

        assert_eq!(report.store_code, "S001");
        assert_eq!(report.forecasts.len(), 30);
        assert!(!report.recommendations.is_empty());
        assert_eq!(pipeline.sink().writes, vec![("S001".to_string(), 30)]);
        assert!(pipeline.model("S001").is_some());
    }

    #[test]
    fn insufficient_history_skips_store_without_sink_write() {
        let mut records = HashMap::new();
        records.insert("S002".to_string(), make_records("S002", 50));
        let mut pipeline = pipeline_with(records);

        let result = pipeline.run_store("S002");
        assert!(matches!(
            result,
            Err(ForecastError::InsufficientData { needed: 100, got: 50 })
        ));
        assert!(pipeline.sink().writes.is_empty());
        assert!(pipeline.model("S002").is_none());
    }

    #[test]
    fn batch_continues_past_failing_stores() {
        let mut records = HashMap::new();
        records.insert("GOOD".to_string(), make_records("GOOD", 180));
        records.insert("THIN".to_string(), make_records("THIN", 10));
        let mut pipeline = pipeline_with(records);

        let batch = pipeline.run_batch(&[
            "THIN".to_string(),
            "GOOD".to_string(),
            "ABSENT".to_string(),
        ]);

        assert_eq!(batch.reports.len(), 1);
        assert_eq!(batch.reports[0].store_code, "GOOD");
        assert_eq!(batch.failures.len(), 2);
        assert!(batch
            .failures
            .iter()
            .all(|(_, e)| matches!(e, ForecastError::InsufficientData { .. })));
    }

    #[test]
    fn overall_metrics_average_across_stores() {
        let mut records = HashMap::new();
        records.insert("A".to_string(), make_records("A", 180));
        records.insert("B".to_string(), make_records("B", 180));
        let mut pipeline = pipeline_with(records);

        let batch = pipeline.run_batch(&["A".to_string(), "B".to_string()]);
        let overall = batch.overall_metrics().unwrap();

        // Identical inputs: the unweighted aggregate equals each store's own.
        assert!((overall.mae - batch.reports[0].metrics.mae).abs() < 1e-9);
        assert!((overall.rmse - batch.reports[0].metrics.rmse).abs() < 1e-9);
    }

    #[test]
    fn forecast_without_trained_model_is_missing_scaler() {
        let pipeline = pipeline_with(HashMap::new());
        let series = DailySeries::from_records(&make_records("X", 40)).unwrap();

        let result = pipeline.forecast_store("X", &series, 7);
        assert!(matches!(result, Err(ForecastError::MissingScaler)));
    }

    #[test]
    fn empty_batch_has_no_overall_metrics() {
        assert!(BatchReport::default().overall_metrics().is_none());
    }
}
