//! Inventory health per product line.
//!
//! Sales velocity comes from the order lines. Stock comes from the inventory
//! table when it lists the product line; otherwise a placeholder stock level
//! is synthesized and the row is flagged `synthetic` so it is never mistaken
//! for real stock telemetry.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use revenue_engine::math::round_to;
use revenue_engine::InventoryRow;
use serde::{Deserialize, Serialize};

use crate::aggregation::{distinct_product_lines, line_totals, select_product_line};
use crate::sales_loader::SaleRecord;

/// More than this many days of cover is healthy.
const HEALTHY_DAYS: i64 = 15;
/// Days of cover assumed by the deterministic placeholder.
const PLACEHOLDER_COVER_DAYS: f64 = 20.0;
/// Range of seeded placeholder stock levels.
const SEEDED_STOCK_MIN: i64 = 50;
const SEEDED_STOCK_MAX: i64 = 500;

/// How to fill in stock for product lines missing from the inventory table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockSimulation {
    /// `floor(velocity * 20)`: the same input always gives the same stock.
    #[default]
    Deterministic,
    /// Uniform draw in `50..=500` from an RNG seeded with `seed`.
    Seeded { seed: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockStatus {
    Healthy,
    Warning,
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockStatus::Healthy => write!(f, "Healthy"),
            StockStatus::Warning => write!(f, "Warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryHealth {
    pub product: String,
    pub stock_level: i64,
    /// Mean units per order line.
    pub velocity: f64,
    pub days_remaining: i64,
    pub status: StockStatus,
    /// `true` when `stock_level` is a placeholder rather than a table value.
    pub synthetic: bool,
}

/// Whole days of cover: `floor(stock / (velocity + 1))`.
pub fn days_remaining(stock: i64, velocity: f64) -> i64 {
    let days = stock as f64 / (velocity + 1.0);
    if days.is_finite() {
        days.floor() as i64
    } else {
        0
    }
}

pub fn stock_status(days: i64) -> StockStatus {
    if days > HEALTHY_DAYS {
        StockStatus::Healthy
    } else {
        StockStatus::Warning
    }
}

/// Health rows for the first `limit` product lines, in first-seen order.
pub fn inventory_health(
    sales: &[SaleRecord],
    inventory: &[InventoryRow],
    limit: usize,
    simulation: StockSimulation,
) -> Vec<InventoryHealth> {
    let mut rng = match simulation {
        StockSimulation::Seeded { seed } => Some(StdRng::seed_from_u64(seed)),
        StockSimulation::Deterministic => None,
    };

    distinct_product_lines(sales)
        .into_iter()
        .take(limit)
        .map(|line| {
            let records = select_product_line(sales, Some(&line));
            let velocity = line_totals(&records).mean_units;

            let known = inventory.iter().find(|r| r.product_name == line);
            let (stock_level, synthetic) = match (known, rng.as_mut()) {
                (Some(row), _) => (row.stock, false),
                (None, Some(rng)) => (rng.gen_range(SEEDED_STOCK_MIN..=SEEDED_STOCK_MAX), true),
                (None, None) => ((velocity * PLACEHOLDER_COVER_DAYS).floor() as i64, true),
            };

            let days = days_remaining(stock_level, velocity);
            InventoryHealth {
                product: line,
                stock_level,
                velocity: round_to(velocity, 2),
                days_remaining: days,
                status: stock_status(days),
                synthetic,
            }
        })
        .collect()
}

/// Number of rows in `Warning`.
pub fn at_risk_count(rows: &[InventoryHealth]) -> usize {
    rows.iter().filter(|r| r.status == StockStatus::Warning).count()
}
