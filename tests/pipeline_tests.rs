//! End-to-end pipeline tests with in-memory provider and sink.

use chrono::{Duration, NaiveDate};
use demand_forecast::prelude::*;
use std::collections::{BTreeMap, HashMap};

/// In-memory history provider backed by a per-store record map.
struct MemoryProvider {
    records: HashMap<String, Vec<SalesRecord>>,
}

impl MemoryProvider {
    fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    fn with_store(mut self, store: &str, records: Vec<SalesRecord>) -> Self {
        self.records.insert(store.to_string(), records);
        self
    }
}

impl SalesHistoryProvider for MemoryProvider {
    fn fetch(&self, store_code: Option<&str>, _window_days: u32) -> Result<Vec<SalesRecord>> {
        Ok(store_code
            .and_then(|code| self.records.get(code))
            .cloned()
            .unwrap_or_default())
    }
}

/// In-memory sink performing an idempotent upsert keyed by (store, date).
#[derive(Default)]
struct MemorySink {
    rows: BTreeMap<(String, NaiveDate), f64>,
}

impl ForecastSink for MemorySink {
    fn store(&mut self, store_code: &str, points: &[ForecastPoint]) -> Result<()> {
        for point in points {
            self.rows
                .insert((store_code.to_string(), point.date), point.predicted);
        }
        Ok(())
    }
}

fn seasonal_records(store: &str, days: usize) -> Vec<SalesRecord> {
    let base = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    (0..days)
        .map(|i| {
            let weekday_lift: u32 = match i % 7 {
                5 | 6 => 30, // weekend
                _ => 0,
            };
            SalesRecord::new(
                base + Duration::days(i as i64),
                60 + weekday_lift + (i % 3) as u32,
                4.5,
                "grocery",
                store,
            )
        })
        .collect()
}

fn default_pipeline(
    provider: MemoryProvider,
) -> DemandPipeline<MemoryProvider, MemorySink> {
    DemandPipeline::new(provider, MemorySink::default(), PipelineConfig::default())
}

#[test]
fn full_run_produces_forecasts_anomalies_inventory_and_recommendations() {
    let provider = MemoryProvider::new().with_store("S001", seasonal_records("S001", 250));
    let mut pipeline = default_pipeline(provider);

    let report = pipeline.run_store("S001").unwrap();

    assert_eq!(report.forecasts.len(), 30);
    let mut expected_date = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap() + Duration::days(249);
    for point in &report.forecasts {
        expected_date = expected_date.succ_opt().unwrap();
        assert_eq!(point.date, expected_date);
        assert!(point.predicted >= 0.0);
    }

    assert!(report.inventory.reorder_point > 0.0);
    assert!(report
        .recommendations
        .iter()
        .any(|r| r.priority == 3));
    // Regular weekly seasonality should not register as anomalous.
    assert!(report.anomalies.is_empty());
}

#[test]
fn sink_receives_one_row_per_forecast_date() {
    let provider = MemoryProvider::new().with_store("S001", seasonal_records("S001", 200));
    let mut pipeline = default_pipeline(provider);

    pipeline.run_store("S001").unwrap();

    let rows = &pipeline.sink().rows;
    assert_eq!(rows.len(), 30);
    assert!(rows.keys().all(|(store, _)| store == "S001"));
}

#[test]
fn repeated_runs_upsert_rather_than_duplicate() {
    let provider = MemoryProvider::new().with_store("S001", seasonal_records("S001", 200));
    let mut pipeline = default_pipeline(provider);

    pipeline.run_store("S001").unwrap();
    let first: Vec<_> = pipeline.sink().rows.keys().cloned().collect();

    pipeline.run_store("S001").unwrap();
    let second: Vec<_> = pipeline.sink().rows.keys().cloned().collect();

    // Same (store, date) keys, same count: overwritten, not duplicated.
    assert_eq!(first, second);
}

#[test]
fn spiked_history_is_reported_as_high_severity_anomaly() {
    let mut records = seasonal_records("S001", 200);
    records[150].quantity = 10_000;
    records[150].total_revenue = 10_000.0 * 4.5;
    let provider = MemoryProvider::new().with_store("S001", records);
    let mut pipeline = default_pipeline(provider);

    let report = pipeline.run_store("S001").unwrap();

    let spike_date = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap() + Duration::days(150);
    let anomaly = report
        .anomalies
        .iter()
        .find(|a| a.date == spike_date)
        .expect("spike should be flagged");
    assert_eq!(anomaly.severity, AnomalySeverity::High);
    assert!(anomaly.observed > anomaly.expected);
}

#[test]
fn thin_store_fails_and_writes_nothing_while_batch_continues() {
    let provider = MemoryProvider::new()
        .with_store("THIN", seasonal_records("THIN", 20))
        .with_store("FULL", seasonal_records("FULL", 220));
    let mut pipeline = default_pipeline(provider);

    let batch = pipeline.run_batch(&["THIN".to_string(), "FULL".to_string()]);

    assert_eq!(batch.reports.len(), 1);
    assert_eq!(batch.reports[0].store_code, "FULL");
    assert_eq!(batch.failures.len(), 1);
    assert!(matches!(
        batch.failures[0].1,
        ForecastError::InsufficientData { .. }
    ));
    // No partial forecasts for the failed store.
    assert!(pipeline
        .sink()
        .rows
        .keys()
        .all(|(store, _)| store == "FULL"));
}

#[test]
fn random_forest_pipeline_runs_end_to_end() {
    let provider = MemoryProvider::new().with_store("S001", seasonal_records("S001", 200));
    let config = PipelineConfig {
        model: ModelConfig::new(Algorithm::RandomForest),
        ..PipelineConfig::default()
    };
    let mut pipeline = DemandPipeline::new(provider, MemorySink::default(), config);

    let report = pipeline.run_store("S001").unwrap();
    assert_eq!(report.forecasts.len(), 30);
    assert_eq!(
        pipeline.model("S001").unwrap().algorithm_name(),
        "RandomForest"
    );
}

#[test]
fn models_are_kept_per_store_and_reusable() {
    let provider = MemoryProvider::new()
        .with_store("A", seasonal_records("A", 200))
        .with_store("B", seasonal_records("B", 200));
    let mut pipeline = default_pipeline(provider);

    pipeline.run_batch(&["A".to_string(), "B".to_string()]);
    assert!(pipeline.model("A").is_some());
    assert!(pipeline.model("B").is_some());

    // Re-forecast store A from its session model without retraining.
    let series = DailySeries::from_records(&seasonal_records("A", 200)).unwrap();
    let points = pipeline.forecast_store("A", &series, 7).unwrap();
    assert_eq!(points.len(), 7);

    // A store with no session model cannot be forecast.
    let result = pipeline.forecast_store("C", &series, 7);
    assert!(matches!(result, Err(ForecastError::MissingScaler)));
}

#[test]
fn overall_metrics_are_an_unweighted_average() {
    let provider = MemoryProvider::new()
        .with_store("A", seasonal_records("A", 200))
        .with_store("B", seasonal_records("B", 260));
    let mut pipeline = default_pipeline(provider);

    let batch = pipeline.run_batch(&["A".to_string(), "B".to_string()]);
    let overall = batch.overall_metrics().unwrap();

    let expected_mae =
        (batch.reports[0].metrics.mae + batch.reports[1].metrics.mae) / 2.0;
    assert!((overall.mae - expected_mae).abs() < 1e-9);
}
