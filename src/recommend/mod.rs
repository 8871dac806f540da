//! Actionable recommendations derived from forecast shape and inventory
//! parameters.
//!
//! Rules are deterministic and evaluated independently; every applicable
//! rule fires, and the informational inventory recommendation always fires.

use crate::core::ForecastPoint;
use crate::inventory::InventoryParameters;
use crate::utils::mean;

/// Multiple of the mean forecast that counts as a demand spike.
const SPIKE_RATIO: f64 = 1.5;

/// Fraction of the mean forecast that counts as a demand trough.
const TROUGH_RATIO: f64 = 0.5;

/// What a recommendation is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationKind {
    HighDemandAlert,
    LowDemandAlert,
    InventoryOptimization,
}

/// How urgent a recommendation is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationSeverity {
    High,
    Medium,
    Info,
}

/// A human-actionable recommendation. Lower priority is more urgent.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub severity: RecommendationSeverity,
    pub message: String,
    pub action: String,
    pub priority: u8,
}

/// Derive recommendations from a forecast and inventory parameters, ordered
/// by ascending priority.
pub fn generate_recommendations(
    forecasts: &[ForecastPoint],
    params: &InventoryParameters,
) -> Vec<Recommendation> {
    let mut recommendations = Vec::with_capacity(3);

    if !forecasts.is_empty() {
        let predicted: Vec<f64> = forecasts.iter().map(|f| f.predicted).collect();
        let avg = mean(&predicted);
        let max = predicted.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = predicted.iter().copied().fold(f64::INFINITY, f64::min);

        if avg > 0.0 && max > avg * SPIKE_RATIO {
            let excess_pct = ((max - avg) / avg * 100.0) as i64;
            recommendations.push(Recommendation {
                kind: RecommendationKind::HighDemandAlert,
                severity: RecommendationSeverity::High,
                message: format!(
                    "High demand period detected. Increase inventory by {excess_pct}%"
                ),
                action: "Increase orders to suppliers".to_string(),
                priority: 1,
            });
        }

        if min < avg * TROUGH_RATIO {
            recommendations.push(Recommendation {
                kind: RecommendationKind::LowDemandAlert,
                severity: RecommendationSeverity::Medium,
                message: "Low demand period detected. Consider promotional activities."
                    .to_string(),
                action: "Plan promotional campaigns".to_string(),
                priority: 2,
            });
        }
    }

    recommendations.push(Recommendation {
        kind: RecommendationKind::InventoryOptimization,
        severity: RecommendationSeverity::Info,
        message: format!(
            "Optimal reorder point: {} units",
            params.reorder_point as i64
        ),
        action: format!(
            "Maintain safety stock of {} units",
            params.safety_stock as i64
        ),
        priority: 3,
    });

    recommendations.sort_by_key(|r| r.priority);
    recommendations
}
