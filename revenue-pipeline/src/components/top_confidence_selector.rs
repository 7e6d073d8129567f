use revenue_engine::thresholds::RECOMMENDATION_LIMIT;
use revenue_engine::Recommendation;

use crate::selector::Selector;
use crate::types::DashboardQuery;

/// Keeps the `k` most confident recommendations. Ties keep rule order.
pub struct TopConfidenceSelector {
    pub k: usize,
}

impl Default for TopConfidenceSelector {
    fn default() -> Self {
        Self {
            k: RECOMMENDATION_LIMIT,
        }
    }
}

impl Selector<DashboardQuery, Recommendation> for TopConfidenceSelector {
    fn score(&self, candidate: &Recommendation) -> f64 {
        candidate.confidence
    }

    fn limit(&self) -> Option<usize> {
        Some(self.k)
    }
}
