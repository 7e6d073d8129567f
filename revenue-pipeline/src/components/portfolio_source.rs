use async_trait::async_trait;
use std::sync::Arc;

use revenue_engine::{PortfolioContext, Recommendation, RecommendationEngine};

use crate::source::Source;
use crate::types::DashboardQuery;

/// Runs the portfolio rules (liquidity, restock, growth) once per request.
pub struct PortfolioSource {
    engine: Arc<RecommendationEngine>,
    portfolio: Arc<PortfolioContext>,
}

impl PortfolioSource {
    pub fn new(engine: Arc<RecommendationEngine>, portfolio: Arc<PortfolioContext>) -> Self {
        Self { engine, portfolio }
    }
}

#[async_trait]
impl Source<DashboardQuery, Recommendation> for PortfolioSource {
    fn enable(&self, _query: &DashboardQuery) -> bool {
        let p = &self.portfolio;
        !(p.financials.is_empty() && p.products.is_empty() && p.inventory.is_empty())
    }

    async fn get_candidates(&self, _query: &DashboardQuery) -> Result<Vec<Recommendation>, String> {
        Ok(self.engine.recommend_for_portfolio(&self.portfolio))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use revenue_engine::{InventoryRow, ProductRow, RecommendationKind};

    #[tokio::test]
    async fn portfolio_rules_become_candidates() {
        let portfolio = PortfolioContext::new(
            vec![],
            vec![ProductRow {
                product_name: "Trains".into(),
                revenue: 5_000.0,
                growth_rate: 0.4,
                units_sold: 30,
            }],
            vec![InventoryRow {
                product_name: "Trains".into(),
                stock: 2,
                reorder_threshold: 5,
            }],
            "Jan 2005",
        )
        .unwrap();
        let source = PortfolioSource::new(
            Arc::new(RecommendationEngine::default()),
            Arc::new(portfolio),
        );
        let query = DashboardQuery::new("pf-1", None);
        assert!(source.enable(&query));

        let kinds: Vec<RecommendationKind> = source
            .get_candidates(&query)
            .await
            .unwrap()
            .iter()
            .map(|r| r.kind)
            .collect();
        assert_eq!(kinds, vec![RecommendationKind::Inventory, RecommendationKind::Marketing]);
    }

    #[test]
    fn disabled_for_empty_portfolio() {
        let source = PortfolioSource::new(
            Arc::new(RecommendationEngine::default()),
            Arc::new(PortfolioContext::default()),
        );
        assert!(!source.enable(&DashboardQuery::new("pf-2", None)));
    }
}
