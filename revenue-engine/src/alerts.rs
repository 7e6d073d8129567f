//! Alert derivation over the portfolio tables.
//!
//! Alerts reuse the same trailing aggregates as the portfolio rules but are
//! derived independently of them.

use crate::context::{PortfolioContext, TrailingWindow};
use crate::math::guarded_ratio;
use crate::policy::RuleThresholds;
use crate::records::{Alert, AlertRisk, LiquidityRisk};

/// Classify liquidity from mean revenue and mean expenses.
pub fn classify_liquidity(
    mean_revenue: f64,
    mean_expenses: f64,
    thresholds: &RuleThresholds,
) -> LiquidityRisk {
    if mean_expenses > thresholds.liquidity_high_ratio * mean_revenue {
        LiquidityRisk::High
    } else if mean_expenses > thresholds.liquidity_medium_ratio * mean_revenue {
        LiquidityRisk::Medium
    } else {
        LiquidityRisk::Low
    }
}

/// Revenue growth from the first to the last period of the window.
///
/// A zero first period divides by 1 instead.
pub fn trailing_growth(window: &TrailingWindow) -> f64 {
    match (window.revenue.first(), window.revenue.last()) {
        (Some(&first), Some(&last)) => guarded_ratio(last - first, first),
        _ => 0.0,
    }
}

fn liquidity_alert(ctx: &PortfolioContext, thresholds: &RuleThresholds) -> Option<Alert> {
    let window = ctx.trailing_window(thresholds.trailing_periods)?;
    let level = classify_liquidity(window.mean_revenue(), window.mean_expenses(), thresholds);
    let risk = level.alert_risk()?;
    let description = match level {
        LiquidityRisk::High => format!(
            "Expenses (${:.0}) exceed revenue (${:.0}) on average over the last {} periods.",
            window.mean_expenses(),
            window.mean_revenue(),
            window.periods()
        ),
        _ => format!(
            "Expenses are above {:.0}% of revenue over the last {} periods.",
            thresholds.liquidity_medium_ratio * 100.0,
            window.periods()
        ),
    };
    Some(Alert {
        kind: "Cash Flow".into(),
        time: ctx.as_of.clone(),
        title: format!("{} Liquidity Risk", level),
        description,
        risk,
    })
}

fn inventory_alerts(ctx: &PortfolioContext) -> Vec<Alert> {
    ctx.under_threshold()
        .map(|row| Alert {
            kind: "Inventory".into(),
            time: ctx.as_of.clone(),
            title: format!("Low Stock: {}", row.product_name),
            description: format!(
                "{} units on hand against a reorder threshold of {}.",
                row.stock, row.reorder_threshold
            ),
            risk: AlertRisk::High,
        })
        .collect()
}

fn momentum_alert(ctx: &PortfolioContext, thresholds: &RuleThresholds) -> Option<Alert> {
    let window = ctx.trailing_window(thresholds.trailing_periods)?;
    let growth = trailing_growth(&window);
    if growth > thresholds.momentum_growth {
        Some(Alert {
            kind: "Growth".into(),
            time: ctx.as_of.clone(),
            title: "Revenue Momentum".into(),
            description: format!(
                "Revenue grew {:.0}% across the last {} periods.",
                growth * 100.0,
                window.periods()
            ),
            risk: AlertRisk::Low,
        })
    } else {
        None
    }
}

/// All alerts for the portfolio: liquidity, then inventory, then momentum.
pub fn derive_alerts(ctx: &PortfolioContext, thresholds: &RuleThresholds) -> Vec<Alert> {
    let mut alerts = Vec::new();
    alerts.extend(liquidity_alert(ctx, thresholds));
    alerts.extend(inventory_alerts(ctx));
    alerts.extend(momentum_alert(ctx, thresholds));
    log::debug!("derived {} alert(s) as_of={}", alerts.len(), ctx.as_of);
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{FinancialRow, InventoryRow};
    use chrono::NaiveDate;

    fn fin(month: u32, revenue: f64, expenses: f64) -> FinancialRow {
        FinancialRow {
            date: NaiveDate::from_ymd_opt(2024, month, 1).unwrap(),
            revenue,
            expenses,
            net_cash: revenue - expenses,
        }
    }

    fn stock(name: &str, stock: i64, reorder_threshold: i64) -> InventoryRow {
        InventoryRow {
            product_name: name.into(),
            stock,
            reorder_threshold,
        }
    }

    fn ctx(financials: Vec<FinancialRow>, inventory: Vec<InventoryRow>) -> PortfolioContext {
        PortfolioContext::new(financials, vec![], inventory, "Oct 2024").unwrap()
    }

    #[test]
    fn classify_liquidity_levels() {
        let t = RuleThresholds::default();
        assert_eq!(classify_liquidity(100.0, 101.0, &t), LiquidityRisk::High);
        assert_eq!(classify_liquidity(100.0, 85.0, &t), LiquidityRisk::Medium);
        assert_eq!(classify_liquidity(100.0, 80.0, &t), LiquidityRisk::Low);
        assert_eq!(classify_liquidity(100.0, 100.0, &t), LiquidityRisk::Medium);
    }

    #[test]
    fn high_liquidity_risk_raises_high_alert() {
        let alerts = derive_alerts(
            &ctx(vec![fin(1, 100.0, 120.0), fin(2, 100.0, 120.0)], vec![]),
            &RuleThresholds::default(),
        );
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, "Cash Flow");
        assert_eq!(alerts[0].risk, AlertRisk::High);
        assert_eq!(alerts[0].time, "Oct 2024");
    }

    #[test]
    fn medium_liquidity_risk_raises_low_alert() {
        let alerts = derive_alerts(
            &ctx(vec![fin(1, 100.0, 85.0)], vec![]),
            &RuleThresholds::default(),
        );
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].risk, AlertRisk::Low);
        assert_eq!(alerts[0].title, "Medium Liquidity Risk");
    }

    #[test]
    fn low_liquidity_risk_raises_nothing() {
        let alerts = derive_alerts(
            &ctx(vec![fin(1, 100.0, 70.0)], vec![]),
            &RuleThresholds::default(),
        );
        assert!(alerts.is_empty());
    }

    #[test]
    fn inventory_alert_per_under_threshold_row() {
        let inventory = vec![
            stock("A", 3, 10),
            stock("B", 30, 10),
            stock("C", 9, 10),
        ];
        let alerts = derive_alerts(&ctx(vec![], inventory), &RuleThresholds::default());
        assert_eq!(alerts.len(), 2);
        assert!(alerts.iter().all(|a| a.risk == AlertRisk::High && a.kind == "Inventory"));
    }

    #[test]
    fn momentum_alert_above_ten_percent() {
        let alerts = derive_alerts(
            &ctx(
                vec![
                    fin(1, 50.0, 0.0),
                    fin(2, 100.0, 10.0),
                    fin(3, 105.0, 10.0),
                    fin(4, 115.0, 10.0),
                ],
                vec![],
            ),
            &RuleThresholds::default(),
        );
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, "Growth");
        assert_eq!(alerts[0].risk, AlertRisk::Low);
    }

    #[test]
    fn momentum_alert_quiet_at_ten_percent() {
        let alerts = derive_alerts(
            &ctx(vec![fin(1, 100.0, 10.0), fin(2, 105.0, 10.0), fin(3, 110.0, 10.0)], vec![]),
            &RuleThresholds::default(),
        );
        assert!(alerts.is_empty());
    }

    #[test]
    fn trailing_growth_guards_zero_first_period() {
        let window = TrailingWindow {
            revenue: vec![0.0, 5.0, 2.0],
            expenses: vec![0.0, 0.0, 0.0],
        };
        assert_eq!(trailing_growth(&window), 2.0);
    }

    #[test]
    fn empty_portfolio_has_no_alerts() {
        assert!(derive_alerts(&PortfolioContext::default(), &RuleThresholds::default()).is_empty());
    }
}
