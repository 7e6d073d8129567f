//! Monthly aggregation of order lines.
//!
//! Orders are bucketed into calendar months labelled by their last day.
//! Months between the first and last order with no sales appear as zero
//! rows so the trend fit sees evenly spaced periods.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use revenue_engine::math::{mean, round_to};
use revenue_engine::FinancialRow;
use serde::Serialize;

use crate::sales_loader::SaleRecord;
use crate::util::{month_end, month_label, next_month};

/// Product selector meaning "no filter".
pub const ALL_PRODUCTS: &str = "All Products";

/// Share of revenue booked as expenses in the derived cash-flow view.
pub const EXPENSE_SHARE: f64 = 0.7;
pub const NET_SHARE: f64 = 0.3;

/// Totals for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyTotal {
    pub month_end: NaiveDate,
    pub sales: f64,
}

/// `None` when `product` selects every product line.
pub fn product_filter(product: Option<&str>) -> Option<&str> {
    product
        .map(str::trim)
        .filter(|p| !p.is_empty() && *p != ALL_PRODUCTS)
}

/// Order lines for a product line, or all of them.
pub fn select_product_line<'a>(
    sales: &'a [SaleRecord],
    product: Option<&str>,
) -> Vec<&'a SaleRecord> {
    match product_filter(product) {
        Some(line) => sales.iter().filter(|r| r.product_line == line).collect(),
        None => sales.iter().collect(),
    }
}

/// Distinct product lines in order of first appearance.
pub fn distinct_product_lines(sales: &[SaleRecord]) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for record in sales {
        if !lines.iter().any(|l| *l == record.product_line) {
            lines.push(record.product_line.clone());
        }
    }
    lines
}

/// Per-month totals from the first to the last month present, gaps zero-filled.
pub fn monthly_totals<'a, I>(records: I) -> Vec<MonthlyTotal>
where
    I: IntoIterator<Item = &'a SaleRecord>,
{
    let mut buckets: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for record in records {
        *buckets
            .entry((record.date.year(), record.date.month()))
            .or_insert(0.0) += record.sales;
    }

    let (Some(&first), Some(&last)) = (buckets.keys().next(), buckets.keys().next_back()) else {
        return Vec::new();
    };

    let mut totals = Vec::new();
    let mut cursor = first;
    loop {
        let sales = buckets.get(&cursor).copied().unwrap_or(0.0);
        if let Some(end) = month_end(cursor.0, cursor.1) {
            totals.push(MonthlyTotal {
                month_end: end,
                sales,
            });
        }
        if cursor >= last {
            break;
        }
        cursor = next_month(cursor.0, cursor.1);
    }
    totals
}

/// Monthly sales values, oldest first.
pub fn monthly_sales(totals: &[MonthlyTotal]) -> Vec<f64> {
    totals.iter().map(|t| t.sales).collect()
}

/// The last `window` values, left-padded with zeros to exactly `window`.
pub fn padded_history(values: &[f64], window: usize) -> Vec<f64> {
    let start = values.len().saturating_sub(window);
    let tail = &values[start..];
    let mut history = vec![0.0; window - tail.len()];
    history.extend_from_slice(tail);
    history
}

/// Order-level totals for a set of order lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineTotals {
    pub orders: usize,
    pub total_sales: f64,
    pub avg_order_value: f64,
    pub mean_units: f64,
}

pub fn line_totals(records: &[&SaleRecord]) -> LineTotals {
    let sales: Vec<f64> = records.iter().map(|r| r.sales).collect();
    let units: Vec<f64> = records.iter().map(|r| r.units_sold).collect();
    LineTotals {
        orders: records.len(),
        total_sales: sales.iter().sum(),
        avg_order_value: mean(&sales),
        mean_units: mean(&units),
    }
}

/// One month of the derived cash-flow view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashFlowPeriod {
    pub month: String,
    pub revenue: f64,
    pub expenses: f64,
    pub net: f64,
    #[serde(skip)]
    pub month_end: NaiveDate,
}

impl CashFlowPeriod {
    pub fn to_financial_row(&self) -> FinancialRow {
        FinancialRow {
            date: self.month_end,
            revenue: self.revenue,
            expenses: self.expenses,
            net_cash: self.net,
        }
    }
}

/// Cash flow for the last `months` months of total sales.
pub fn cash_flow(sales: &[SaleRecord], months: usize) -> Vec<CashFlowPeriod> {
    let totals = monthly_totals(sales);
    let start = totals.len().saturating_sub(months);
    totals[start..]
        .iter()
        .map(|t| CashFlowPeriod {
            month: month_label(t.month_end),
            revenue: round_to(t.sales, 2),
            expenses: round_to(t.sales * EXPENSE_SHARE, 2),
            net: round_to(t.sales * NET_SHARE, 2),
            month_end: t.month_end,
        })
        .collect()
}
