use revenue_engine::thresholds::RECOMMENDATION_LIMIT;
use serde::{Deserialize, Serialize};

use crate::inventory_health::StockSimulation;

/// Shape of the assembled dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Periods forecast per product line.
    pub forecast_horizon: usize,
    /// Trailing months reported as `historical` per product line.
    pub history_window: usize,
    /// Product lines forecast when no product is requested.
    pub product_line_limit: usize,
    pub inventory_health_lines: usize,
    pub cash_flow_months: usize,
    /// Maximum recommendations in the ranked output.
    pub recommendation_limit: usize,
    /// Recommendations under this confidence are dropped before ranking.
    pub min_confidence: f64,
    pub stock_simulation: StockSimulation,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            forecast_horizon: 4,
            history_window: 4,
            product_line_limit: 4,
            inventory_health_lines: 6,
            cash_flow_months: 6,
            recommendation_limit: RECOMMENDATION_LIMIT,
            min_confidence: 0.0,
            stock_simulation: StockSimulation::Deterministic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: DashboardConfig =
            serde_json::from_str(r#"{"recommendation_limit": 3, "min_confidence": 0.8}"#).unwrap();
        assert_eq!(cfg.recommendation_limit, 3);
        assert_eq!(cfg.min_confidence, 0.8);
        assert_eq!(cfg.forecast_horizon, 4);
        assert_eq!(cfg.stock_simulation, StockSimulation::Deterministic);
    }

    #[test]
    fn default_limit_is_nine() {
        assert_eq!(DashboardConfig::default().recommendation_limit, 9);
    }
}
