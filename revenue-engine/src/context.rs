//! Read-only inputs the rules evaluate against.
//!
//! Contexts are validated once at construction; rules then run as pure
//! predicates and never fail.

use crate::error::EngineResult;
use crate::math::{ensure_finite, mean};
use crate::records::{FinancialRow, InventoryRow, ProductRow};

/// Aggregates for a single product line.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductLineContext {
    pub product_line: String,
    /// Forecast for the coming periods, next period first.
    pub predictions: Vec<f64>,
    /// Trailing observed values, most recent last.
    pub history: Vec<f64>,
    pub total_sales: f64,
    pub avg_order_value: f64,
}

impl ProductLineContext {
    pub fn new(
        product_line: impl Into<String>,
        predictions: Vec<f64>,
        history: Vec<f64>,
        total_sales: f64,
        avg_order_value: f64,
    ) -> EngineResult<Self> {
        let product_line = product_line.into();
        for (i, &v) in predictions.iter().enumerate() {
            ensure_finite(&format!("{}.predictions[{}]", product_line, i), v)?;
        }
        for (i, &v) in history.iter().enumerate() {
            ensure_finite(&format!("{}.history[{}]", product_line, i), v)?;
        }
        ensure_finite(&format!("{}.total_sales", product_line), total_sales)?;
        ensure_finite(&format!("{}.avg_order_value", product_line), avg_order_value)?;

        Ok(Self {
            product_line,
            predictions,
            history,
            total_sales,
            avg_order_value,
        })
    }

    /// Most recent observation, `0.0` when there is no history.
    pub fn last_observed(&self) -> f64 {
        self.history.last().copied().unwrap_or(0.0)
    }

    /// Next-period forecast, `0.0` when there are no predictions.
    pub fn next_predicted(&self) -> f64 {
        self.predictions.first().copied().unwrap_or(0.0)
    }
}

/// Portfolio-wide tables. Any of them may be empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortfolioContext {
    /// Ordered by date ascending.
    pub financials: Vec<FinancialRow>,
    pub products: Vec<ProductRow>,
    pub inventory: Vec<InventoryRow>,
    /// Label stamped on alerts raised from this context.
    pub as_of: String,
}

impl PortfolioContext {
    pub fn new(
        financials: Vec<FinancialRow>,
        products: Vec<ProductRow>,
        inventory: Vec<InventoryRow>,
        as_of: impl Into<String>,
    ) -> EngineResult<Self> {
        for row in &financials {
            row.validate()?;
        }
        for row in &products {
            row.validate()?;
        }
        for row in &inventory {
            row.validate()?;
        }
        Ok(Self {
            financials,
            products,
            inventory,
            as_of: as_of.into(),
        })
    }

    /// The last `periods` financial rows, or `None` when there are none.
    pub fn trailing_window(&self, periods: usize) -> Option<TrailingWindow> {
        let start = self.financials.len().saturating_sub(periods);
        let window = &self.financials[start..];
        if window.is_empty() {
            return None;
        }
        let revenue: Vec<f64> = window.iter().map(|r| r.revenue).collect();
        let expenses: Vec<f64> = window.iter().map(|r| r.expenses).collect();
        Some(TrailingWindow { revenue, expenses })
    }

    /// Inventory rows whose stock is under their reorder threshold.
    pub fn under_threshold(&self) -> impl Iterator<Item = &InventoryRow> {
        self.inventory.iter().filter(|r| r.is_below_threshold())
    }
}

/// Revenue and expenses over the trailing financial periods, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailingWindow {
    pub revenue: Vec<f64>,
    pub expenses: Vec<f64>,
}

impl TrailingWindow {
    pub fn mean_revenue(&self) -> f64 {
        mean(&self.revenue)
    }

    pub fn mean_expenses(&self) -> f64 {
        mean(&self.expenses)
    }

    pub fn periods(&self) -> usize {
        self.revenue.len()
    }
}
