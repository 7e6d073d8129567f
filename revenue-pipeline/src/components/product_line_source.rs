use async_trait::async_trait;
use std::sync::Arc;

use revenue_engine::{Recommendation, RecommendationEngine};

use crate::source::Source;
use crate::types::DashboardQuery;

/// Runs the per-product-line rules over every hydrated line report.
pub struct ProductLineSource {
    engine: Arc<RecommendationEngine>,
}

impl ProductLineSource {
    pub fn new(engine: Arc<RecommendationEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Source<DashboardQuery, Recommendation> for ProductLineSource {
    fn enable(&self, query: &DashboardQuery) -> bool {
        !query.line_reports.is_empty()
    }

    async fn get_candidates(&self, query: &DashboardQuery) -> Result<Vec<Recommendation>, String> {
        let mut candidates = Vec::new();
        for report in &query.line_reports {
            match report.context() {
                Ok(ctx) => candidates.extend(self.engine.recommend_for_line(&ctx)),
                Err(err) => log::warn!(
                    "request_id={} skipping product line {}: {}",
                    query.request_id,
                    report.product,
                    err
                ),
            }
        }
        Ok(candidates)
    }
}
