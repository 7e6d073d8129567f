//! Rule-based recommendation engine.
//!
//! Rules are independent predicate/effect pairs over a read-only context.
//! Every applicable rule fires in the same pass; none short-circuits
//! another. Each rule contributes at most one recommendation, except
//! restock which emits one per under-threshold product.
//!
//! Ranking and truncation are not done here. The assembler merges the
//! output of all product lines and ranks it once.

use crate::context::{PortfolioContext, ProductLineContext};
use crate::policy::RulePolicy;
use crate::records::{Recommendation, RecommendationKind};

/// Rules evaluated once per product line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductLineRule {
    InventoryGrowth,
    PremiumPricing,
    MarketExpansion,
}

impl ProductLineRule {
    pub const ALL: [ProductLineRule; 3] = [
        ProductLineRule::InventoryGrowth,
        ProductLineRule::PremiumPricing,
        ProductLineRule::MarketExpansion,
    ];

    pub fn evaluate(
        self,
        ctx: &ProductLineContext,
        policy: &RulePolicy,
    ) -> Option<Recommendation> {
        let line = &ctx.product_line;
        match self {
            // --- Inventory Growth ---
            // Forecast jumps more than 10% over the last observed period.
            ProductLineRule::InventoryGrowth => {
                let last = ctx.last_observed();
                let next = ctx.next_predicted();
                if last > 0.0 && next > last * policy.thresholds.inventory_growth_factor {
                    let growth_pct = ((next / last - 1.0) * 100.0).round() as i64;
                    Some(Recommendation {
                        kind: RecommendationKind::Inventory,
                        title: format!("Increase {} Stock", line),
                        description: format!(
                            "Projected sales growth of {}%. Current momentum suggests restocking within 2 weeks.",
                            growth_pct
                        ),
                        confidence: policy.confidence.inventory_growth,
                        action: "Review Inventory".into(),
                    })
                } else {
                    None
                }
            }

            // --- Premium Pricing ---
            ProductLineRule::PremiumPricing => {
                if ctx.avg_order_value > policy.thresholds.premium_order_value {
                    Some(Recommendation {
                        kind: RecommendationKind::Pricing,
                        title: format!("Premium {} Strategy", line),
                        description: format!(
                            "High-value transactions detected (${} avg). Consider bundling or premium tier pricing.",
                            ctx.avg_order_value as i64
                        ),
                        confidence: policy.confidence.premium_pricing,
                        action: "Adjust Pricing".into(),
                    })
                } else {
                    None
                }
            }

            // --- Market Expansion ---
            ProductLineRule::MarketExpansion => {
                if ctx.total_sales > policy.thresholds.market_expansion_sales {
                    Some(Recommendation {
                        kind: RecommendationKind::Marketing,
                        title: format!("Expand {} Market", line),
                        description:
                            "Strong sales performance. Allocate 15% more budget to digital campaigns."
                                .into(),
                        confidence: policy.confidence.market_expansion,
                        action: "Launch Campaign".into(),
                    })
                } else {
                    None
                }
            }
        }
    }
}

/// Rules evaluated once over the portfolio tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortfolioRule {
    LiquidityRisk,
    Restock,
    GrowthOpportunity,
}

impl PortfolioRule {
    pub const ALL: [PortfolioRule; 3] = [
        PortfolioRule::LiquidityRisk,
        PortfolioRule::Restock,
        PortfolioRule::GrowthOpportunity,
    ];

    pub fn evaluate(self, ctx: &PortfolioContext, policy: &RulePolicy) -> Vec<Recommendation> {
        match self {
            // --- Liquidity Risk ---
            // Expenses eating more than 90% of revenue over the trailing window.
            PortfolioRule::LiquidityRisk => {
                let Some(window) = ctx.trailing_window(policy.thresholds.trailing_periods) else {
                    return Vec::new();
                };
                let revenue = window.mean_revenue();
                let expenses = window.mean_expenses();
                if expenses > policy.thresholds.liquidity_risk_ratio * revenue {
                    let ratio_pct = if revenue != 0.0 {
                        (expenses / revenue * 100.0).round() as i64
                    } else {
                        100
                    };
                    vec![Recommendation {
                        kind: RecommendationKind::Risk,
                        title: "Tighten Operating Expenses".into(),
                        description: format!(
                            "Expenses averaged {}% of revenue over the last {} periods. Defer discretionary spend to protect cash reserves.",
                            ratio_pct,
                            window.periods()
                        ),
                        confidence: policy.confidence.liquidity_risk,
                        action: "Review Cash Flow".into(),
                    }]
                } else {
                    Vec::new()
                }
            }

            // --- Restock ---
            // One per product under its reorder threshold, uncapped.
            PortfolioRule::Restock => ctx
                .under_threshold()
                .map(|row| Recommendation {
                    kind: RecommendationKind::Inventory,
                    title: format!("Restock {}", row.product_name),
                    description: format!(
                        "Stock at {} units, below the reorder threshold of {}. Place a replenishment order.",
                        row.stock, row.reorder_threshold
                    ),
                    confidence: policy.confidence.restock,
                    action: "Optimize Inventory".into(),
                })
                .collect(),

            // --- Growth Opportunity ---
            // Fastest-growing product; first occurrence wins ties.
            PortfolioRule::GrowthOpportunity => {
                let Some(first) = ctx.products.first() else {
                    return Vec::new();
                };
                let best = ctx.products.iter().skip(1).fold(first, |best, row| {
                    if row.growth_rate > best.growth_rate {
                        row
                    } else {
                        best
                    }
                });
                vec![Recommendation {
                    kind: RecommendationKind::Marketing,
                    title: format!("Scale {} Campaign", best.product_name),
                    description: format!(
                        "{} leads the portfolio at {:.1}% growth. A targeted campaign can compound the momentum.",
                        best.product_name,
                        best.growth_rate * 100.0
                    ),
                    confidence: policy.confidence.growth_opportunity,
                    action: "Apply Campaign".into(),
                }]
            }
        }
    }
}

/// Evaluates the ordered rule set.
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    policy: RulePolicy,
    line_rules: Vec<ProductLineRule>,
    portfolio_rules: Vec<PortfolioRule>,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new(RulePolicy::default())
    }
}

impl RecommendationEngine {
    /// Engine with every rule enabled in its canonical order.
    pub fn new(policy: RulePolicy) -> Self {
        Self {
            policy,
            line_rules: ProductLineRule::ALL.to_vec(),
            portfolio_rules: PortfolioRule::ALL.to_vec(),
        }
    }

    /// Engine restricted to the given rules, evaluated in the given order.
    pub fn with_rules(
        policy: RulePolicy,
        line_rules: Vec<ProductLineRule>,
        portfolio_rules: Vec<PortfolioRule>,
    ) -> Self {
        Self {
            policy,
            line_rules,
            portfolio_rules,
        }
    }

    pub fn policy(&self) -> &RulePolicy {
        &self.policy
    }

    /// Recommendations for one product line, in rule order.
    pub fn recommend_for_line(&self, ctx: &ProductLineContext) -> Vec<Recommendation> {
        let recommendations: Vec<Recommendation> = self
            .line_rules
            .iter()
            .filter_map(|rule| rule.evaluate(ctx, &self.policy))
            .collect();
        log::debug!(
            "product_line={} fired {} rule(s)",
            ctx.product_line,
            recommendations.len()
        );
        recommendations
    }

    /// Recommendations over the portfolio tables, in rule order.
    pub fn recommend_for_portfolio(&self, ctx: &PortfolioContext) -> Vec<Recommendation> {
        let recommendations: Vec<Recommendation> = self
            .portfolio_rules
            .iter()
            .flat_map(|rule| rule.evaluate(ctx, &self.policy))
            .collect();
        log::debug!("portfolio fired {} recommendation(s)", recommendations.len());
        recommendations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{FinancialRow, InventoryRow, ProductRow};
    use chrono::NaiveDate;

    fn line(predictions: Vec<f64>, history: Vec<f64>, total: f64, aov: f64) -> ProductLineContext {
        ProductLineContext::new("Classic Cars", predictions, history, total, aov).unwrap()
    }

    fn product(name: &str, growth: f64) -> ProductRow {
        ProductRow {
            product_name: name.into(),
            revenue: 10_000.0,
            growth_rate: growth,
            units_sold: 100,
        }
    }

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

    #[test]
    fn inventory_growth_fires_above_ten_percent() {
        let policy = RulePolicy::default();
        let ctx = line(vec![125.0], vec![90.0, 100.0], 0.0, 0.0);
        let rec = ProductLineRule::InventoryGrowth.evaluate(&ctx, &policy).unwrap();
        assert_eq!(rec.kind, RecommendationKind::Inventory);
        assert_eq!(rec.confidence, 0.89);
        assert_eq!(rec.title, "Increase Classic Cars Stock");
        assert!(rec.description.contains("25%"), "{}", rec.description);
    }

    #[test]
    fn inventory_growth_boundary_is_strict() {
        let policy = RulePolicy::default();
        let last = 100.0;
        let ctx = line(vec![last * 1.1], vec![last], 0.0, 0.0);
        assert!(ProductLineRule::InventoryGrowth.evaluate(&ctx, &policy).is_none());
    }

    #[test]
    fn inventory_growth_needs_positive_history() {
        let policy = RulePolicy::default();
        let ctx = line(vec![50.0], vec![0.0], 0.0, 0.0);
        assert!(ProductLineRule::InventoryGrowth.evaluate(&ctx, &policy).is_none());
        let ctx = line(vec![50.0], vec![], 0.0, 0.0);
        assert!(ProductLineRule::InventoryGrowth.evaluate(&ctx, &policy).is_none());
    }

    #[test]
    fn growth_percentage_is_rounded() {
        let policy = RulePolicy::default();
        // 1.156 -> 15.6% -> 16
        let ctx = line(vec![115.6], vec![100.0], 0.0, 0.0);
        let rec = ProductLineRule::InventoryGrowth.evaluate(&ctx, &policy).unwrap();
        assert!(rec.description.contains("16%"), "{}", rec.description);
    }

    #[test]
    fn premium_pricing_above_three_thousand() {
        let policy = RulePolicy::default();
        let rec = ProductLineRule::PremiumPricing
            .evaluate(&line(vec![], vec![], 0.0, 3500.75), &policy)
            .unwrap();
        assert_eq!(rec.kind, RecommendationKind::Pricing);
        assert_eq!(rec.confidence, 0.85);
        assert!(rec.description.contains("$3500 avg"));
        assert!(ProductLineRule::PremiumPricing
            .evaluate(&line(vec![], vec![], 0.0, 3000.0), &policy)
            .is_none());
    }

    #[test]
    fn market_expansion_above_fifty_thousand() {
        let policy = RulePolicy::default();
        let rec = ProductLineRule::MarketExpansion
            .evaluate(&line(vec![], vec![], 50_001.0, 0.0), &policy)
            .unwrap();
        assert_eq!(rec.kind, RecommendationKind::Marketing);
        assert_eq!(rec.confidence, 0.78);
        assert!(ProductLineRule::MarketExpansion
            .evaluate(&line(vec![], vec![], 50_000.0, 0.0), &policy)
            .is_none());
    }

    #[test]
    fn all_line_rules_fire_together_in_order() {
        let engine = RecommendationEngine::default();
        let ctx = line(vec![200.0], vec![100.0], 80_000.0, 4_000.0);
        let kinds: Vec<_> = engine.recommend_for_line(&ctx).iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RecommendationKind::Inventory,
                RecommendationKind::Pricing,
                RecommendationKind::Marketing
            ]
        );
    }

    #[test]
    fn liquidity_risk_uses_trailing_three_periods() {
        let policy = RulePolicy::default();
        // first period is outside the window and would otherwise dilute the ratio
        let ctx = PortfolioContext::new(
            vec![
                fin(1, 100_000.0, 10_000.0),
                fin(2, 10_000.0, 9_500.0),
                fin(3, 10_000.0, 9_500.0),
                fin(4, 10_000.0, 9_500.0),
            ],
            vec![],
            vec![],
            "now",
        )
        .unwrap();
        let recs = PortfolioRule::LiquidityRisk.evaluate(&ctx, &policy);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].kind, RecommendationKind::Risk);
        assert_eq!(recs[0].confidence, 0.92);
        assert!(recs[0].description.contains("95%"));
    }

    #[test]
    fn liquidity_risk_quiet_when_healthy_or_empty() {
        let policy = RulePolicy::default();
        let healthy =
            PortfolioContext::new(vec![fin(1, 10_000.0, 7_000.0)], vec![], vec![], "now").unwrap();
        assert!(PortfolioRule::LiquidityRisk.evaluate(&healthy, &policy).is_empty());
        assert!(PortfolioRule::LiquidityRisk
            .evaluate(&PortfolioContext::default(), &policy)
            .is_empty());
    }

    #[test]
    fn liquidity_risk_boundary_is_strict() {
        let policy = RulePolicy::default();
        // expenses at exactly 90% of revenue
        let ctx =
            PortfolioContext::new(vec![fin(1, 10_000.0, 9_000.0)], vec![], vec![], "now").unwrap();
        assert!(PortfolioRule::LiquidityRisk.evaluate(&ctx, &policy).is_empty());

        let ctx =
            PortfolioContext::new(vec![fin(1, 10_000.0, 9_001.0)], vec![], vec![], "now").unwrap();
        assert_eq!(PortfolioRule::LiquidityRisk.evaluate(&ctx, &policy).len(), 1);
    }

    #[test]
    fn restock_emits_one_per_under_threshold_row() {
        let policy = RulePolicy::default();
        let inventory = vec![
            stock("A", 5, 10),
            stock("B", 10, 10),
            stock("C", 0, 1),
        ];
        let ctx = PortfolioContext::new(vec![], vec![], inventory, "now").unwrap();
        let recs = PortfolioRule::Restock.evaluate(&ctx, &policy);
        let titles: Vec<_> = recs.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Restock A", "Restock C"]);
        assert!(recs.iter().all(|r| r.confidence == 0.95));
    }

    #[test]
    fn growth_opportunity_picks_first_maximum() {
        let policy = RulePolicy::default();
        let ctx = PortfolioContext::new(
            vec![],
            vec![product("A", 0.10), product("B", 0.25), product("C", 0.25)],
            vec![],
            "now",
        )
        .unwrap();
        let recs = PortfolioRule::GrowthOpportunity.evaluate(&ctx, &policy);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].title, "Scale B Campaign");
        assert_eq!(recs[0].kind, RecommendationKind::Marketing);
        assert_eq!(recs[0].confidence, 0.88);
    }

    #[test]
    fn growth_opportunity_skipped_for_empty_products() {
        let policy = RulePolicy::default();
        let recs = PortfolioRule::GrowthOpportunity.evaluate(&PortfolioContext::default(), &policy);
        assert!(recs.is_empty());
    }

    #[test]
    fn custom_policy_changes_confidence() {
        let mut policy = RulePolicy::default();
        policy.confidence.premium_pricing = 0.5;
        let engine = RecommendationEngine::new(policy);
        let recs = engine.recommend_for_line(&line(vec![], vec![], 0.0, 5_000.0));
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].confidence, 0.5);
    }

    #[test]
    fn with_rules_limits_evaluation() {
        let engine = RecommendationEngine::with_rules(
            RulePolicy::default(),
            vec![ProductLineRule::MarketExpansion],
            vec![],
        );
        let recs = engine.recommend_for_line(&line(vec![500.0], vec![1.0], 90_000.0, 9_000.0));
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].kind, RecommendationKind::Marketing);
        assert!(engine.recommend_for_portfolio(&PortfolioContext::default()).is_empty());
    }
}
