//! Tunable rule policy.
//!
//! Every confidence level and threshold the rules use lives here so it can
//! be loaded from configuration without touching control flow. Missing
//! fields fall back to the values in [`crate::thresholds`].

use serde::{Deserialize, Serialize};

use crate::thresholds;

/// Confidence attached to each rule's output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidencePolicy {
    pub inventory_growth: f64,
    pub premium_pricing: f64,
    pub market_expansion: f64,
    pub liquidity_risk: f64,
    pub restock: f64,
    pub growth_opportunity: f64,
}

impl Default for ConfidencePolicy {
    fn default() -> Self {
        Self {
            inventory_growth: thresholds::INVENTORY_GROWTH_CONFIDENCE,
            premium_pricing: thresholds::PREMIUM_PRICING_CONFIDENCE,
            market_expansion: thresholds::MARKET_EXPANSION_CONFIDENCE,
            liquidity_risk: thresholds::LIQUIDITY_RISK_CONFIDENCE,
            restock: thresholds::RESTOCK_CONFIDENCE,
            growth_opportunity: thresholds::GROWTH_OPPORTUNITY_CONFIDENCE,
        }
    }
}

/// Trigger thresholds for rules and alerts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleThresholds {
    pub inventory_growth_factor: f64,
    pub premium_order_value: f64,
    pub market_expansion_sales: f64,
    pub trailing_periods: usize,
    pub liquidity_risk_ratio: f64,
    pub liquidity_high_ratio: f64,
    pub liquidity_medium_ratio: f64,
    pub momentum_growth: f64,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            inventory_growth_factor: thresholds::INVENTORY_GROWTH_FACTOR,
            premium_order_value: thresholds::PREMIUM_ORDER_VALUE,
            market_expansion_sales: thresholds::MARKET_EXPANSION_SALES,
            trailing_periods: thresholds::TRAILING_PERIODS,
            liquidity_risk_ratio: thresholds::LIQUIDITY_RISK_RATIO,
            liquidity_high_ratio: thresholds::LIQUIDITY_HIGH_RATIO,
            liquidity_medium_ratio: thresholds::LIQUIDITY_MEDIUM_RATIO,
            momentum_growth: thresholds::MOMENTUM_GROWTH,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulePolicy {
    pub confidence: ConfidencePolicy,
    pub thresholds: RuleThresholds,
}
