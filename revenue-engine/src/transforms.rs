//! Pure row transforms behind the "apply campaign" and "optimize inventory"
//! actions.
//!
//! The caller owns storage and applies the returned row under whatever
//! atomicity it chooses; nothing here assumes isolation.

use crate::math::round_to;
use crate::records::{InventoryRow, ProductRow};
use crate::thresholds::{CAMPAIGN_GROWTH_BOOST, RESTOCK_UNITS};

/// Growth rate after a marketing campaign, rounded to 3 decimals.
pub fn apply_campaign_boost(row: &ProductRow) -> ProductRow {
    ProductRow {
        growth_rate: round_to(row.growth_rate + CAMPAIGN_GROWTH_BOOST, 3),
        ..row.clone()
    }
}

/// Stock after a restock order.
pub fn restock(row: &InventoryRow) -> InventoryRow {
    InventoryRow {
        stock: row.stock + RESTOCK_UNITS,
        ..row.clone()
    }
}
