//! Tabular inputs and analytic outputs.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::math::ensure_finite;

// ---------------------------------------------------------------------------
// Input tables
// ---------------------------------------------------------------------------

/// One product's sales performance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRow {
    pub product_name: String,
    pub revenue: f64,
    pub growth_rate: f64,
    pub units_sold: i64,
}

impl ProductRow {
    pub fn validate(&self) -> EngineResult<()> {
        ensure_finite(&format!("{}.revenue", self.product_name), self.revenue)?;
        ensure_finite(&format!("{}.growth_rate", self.product_name), self.growth_rate)?;
        Ok(())
    }
}

/// One product's stock position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRow {
    pub product_name: String,
    pub stock: i64,
    pub reorder_threshold: i64,
}

impl InventoryRow {
    pub fn is_below_threshold(&self) -> bool {
        self.stock < self.reorder_threshold
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.stock < 0 {
            return Err(EngineError::invalid(
                format!("{}.stock", self.product_name),
                format!("must be non-negative, got {}", self.stock),
            ));
        }
        if self.reorder_threshold < 0 {
            return Err(EngineError::invalid(
                format!("{}.reorder_threshold", self.product_name),
                format!("must be non-negative, got {}", self.reorder_threshold),
            ));
        }
        Ok(())
    }
}

/// One period of the financials table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRow {
    pub date: NaiveDate,
    pub revenue: f64,
    pub expenses: f64,
    pub net_cash: f64,
}

impl FinancialRow {
    pub fn validate(&self) -> EngineResult<()> {
        ensure_finite(&format!("financials[{}].revenue", self.date), self.revenue)?;
        ensure_finite(&format!("financials[{}].expenses", self.date), self.expenses)?;
        ensure_finite(&format!("financials[{}].net_cash", self.date), self.net_cash)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Recommendations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Inventory,
    Pricing,
    Marketing,
    Risk,
}

impl fmt::Display for RecommendationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecommendationKind::Inventory => write!(f, "inventory"),
            RecommendationKind::Pricing => write!(f, "pricing"),
            RecommendationKind::Marketing => write!(f, "marketing"),
            RecommendationKind::Risk => write!(f, "risk"),
        }
    }
}

/// A suggested action produced by a triggered rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub title: String,
    pub description: String,
    pub confidence: f64,
    pub action: String,
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

/// Severity shown on an alert card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertRisk {
    High,
    Low,
}

/// Liquidity classification of the trailing financial window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiquidityRisk {
    High,
    Medium,
    Low,
}

impl LiquidityRisk {
    /// Alert severity for this level; `Low` raises no alert.
    pub fn alert_risk(self) -> Option<AlertRisk> {
        match self {
            LiquidityRisk::High => Some(AlertRisk::High),
            LiquidityRisk::Medium => Some(AlertRisk::Low),
            LiquidityRisk::Low => None,
        }
    }
}

impl fmt::Display for LiquidityRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiquidityRisk::High => write!(f, "High"),
            LiquidityRisk::Medium => write!(f, "Medium"),
            LiquidityRisk::Low => write!(f, "Low"),
        }
    }
}

/// A risk-annotated notification derived from a threshold breach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "type")]
    pub kind: String,
    pub time: String,
    pub title: String,
    pub description: String,
    pub risk: AlertRisk,
}
