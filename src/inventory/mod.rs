//! Inventory control parameters derived from demand statistics.
//!
//! Implements the classical continuous-review formulas: safety stock from
//! demand variability over the lead time at a target service level, reorder
//! point as lead-time demand plus safety stock, and the economic order
//! quantity minimizing ordering plus holding cost.

use crate::utils::{mean, quantile_normal, std_dev};

/// Configuration for inventory optimization.
#[derive(Debug, Clone, Copy)]
pub struct InventoryConfig {
    /// Replenishment lead time in days.
    pub lead_time_days: u32,
    /// Target probability of not stocking out during lead time.
    pub service_level: f64,
    /// Explicit service-level z-value; when `None` it is derived from
    /// `service_level` via the normal quantile.
    pub service_level_z: Option<f64>,
    /// Cost to hold one unit for one day, as a rate.
    pub holding_cost_rate: f64,
    /// Fixed cost per replenishment order.
    pub ordering_cost: f64,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            lead_time_days: 7,
            service_level: 0.95,
            service_level_z: None,
            holding_cost_rate: 0.1,
            ordering_cost: 100.0,
        }
    }
}

impl InventoryConfig {
    pub fn with_lead_time(mut self, days: u32) -> Self {
        self.lead_time_days = days;
        self
    }

    pub fn with_service_level(mut self, level: f64) -> Self {
        self.service_level = level;
        self.service_level_z = None;
        self
    }

    pub fn with_service_level_z(mut self, z: f64) -> Self {
        self.service_level_z = Some(z);
        self
    }

    pub fn with_costs(mut self, holding_cost_rate: f64, ordering_cost: f64) -> Self {
        self.holding_cost_rate = holding_cost_rate;
        self.ordering_cost = ordering_cost;
        self
    }

    /// The z-value used for safety stock (about 1.645 at the default 95%).
    pub fn z_value(&self) -> f64 {
        self.service_level_z
            .unwrap_or_else(|| quantile_normal(self.service_level))
    }
}

/// Derived inventory control parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InventoryParameters {
    pub daily_demand_mean: f64,
    pub daily_demand_std: f64,
    pub reorder_point: f64,
    pub safety_stock: f64,
    pub economic_order_quantity: f64,
    pub lead_time_days: u32,
    pub service_level: f64,
}

/// Compute inventory parameters from a daily demand series.
///
/// A zero or undefined demand standard deviation yields zero safety stock,
/// never an error.
pub fn optimize_inventory(daily_demand: &[f64], config: &InventoryConfig) -> InventoryParameters {
    let demand_mean = if daily_demand.is_empty() {
        0.0
    } else {
        mean(daily_demand)
    };
    let demand_std = {
        let s = std_dev(daily_demand);
        if s.is_finite() {
            s
        } else {
            0.0
        }
    };

    let lead_time = config.lead_time_days as f64;
    let lead_time_demand = demand_mean * lead_time;
    let lead_time_demand_std = demand_std * lead_time.sqrt();

    let safety_stock = config.z_value() * lead_time_demand_std;
    let reorder_point = lead_time_demand + safety_stock;

    let annual_demand = demand_mean * 365.0;
    let economic_order_quantity = if config.holding_cost_rate > 0.0 {
        (2.0 * annual_demand * config.ordering_cost / (config.holding_cost_rate * 365.0)).sqrt()
    } else {
        0.0
    };

    InventoryParameters {
        daily_demand_mean: demand_mean,
        daily_demand_std: demand_std,
        reorder_point,
        safety_stock,
        economic_order_quantity,
        lead_time_days: config.lead_time_days,
        service_level: config.service_level,
    }
}
