use revenue_engine::Recommendation;

use crate::filter::Filter;
use crate::types::DashboardQuery;

/// Drops recommendations under a minimum confidence before ranking.
///
/// The default floor of `0.0` keeps everything, and the filter then
/// disables itself.
pub struct ConfidenceFloorFilter {
    pub min_confidence: f64,
}

impl ConfidenceFloorFilter {
    pub fn new(min_confidence: f64) -> Self {
        Self { min_confidence }
    }
}

impl Default for ConfidenceFloorFilter {
    fn default() -> Self {
        Self {
            min_confidence: 0.0,
        }
    }
}

impl Filter<DashboardQuery, Recommendation> for ConfidenceFloorFilter {
    fn enable(&self, _query: &DashboardQuery) -> bool {
        self.min_confidence > 0.0
    }

    fn keep(&self, _query: &DashboardQuery, candidate: &Recommendation) -> bool {
        candidate.confidence >= self.min_confidence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use revenue_engine::RecommendationKind;

    fn rec(confidence: f64) -> Recommendation {
        Recommendation {
            kind: RecommendationKind::Marketing,
            title: format!("c{}", confidence),
            description: String::new(),
            confidence,
            action: String::new(),
        }
    }

    #[test]
    fn floor_is_inclusive() {
        let filter = ConfidenceFloorFilter::new(0.85);
        let query = DashboardQuery::new("f-1", None);
        let result = filter.filter(&query, vec![rec(0.78), rec(0.85), rec(0.95)]);
        let kept: Vec<f64> = result.kept.iter().map(|r| r.confidence).collect();
        assert_eq!(kept, vec![0.85, 0.95]);
        assert_eq!(result.removed.len(), 1);
    }

    #[test]
    fn default_floor_is_disabled() {
        assert!(!ConfidenceFloorFilter::default().enable(&DashboardQuery::default()));
    }
}
