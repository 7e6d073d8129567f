use async_trait::async_trait;
use std::sync::Arc;

use revenue_engine::{PortfolioContext, Recommendation, RecommendationEngine};

use crate::candidate_pipeline::CandidatePipeline;
use crate::components::confidence_floor_filter::ConfidenceFloorFilter;
use crate::components::dashboard_log_side_effect::DashboardLogSideEffect;
use crate::components::forecast_query_hydrator::ForecastQueryHydrator;
use crate::components::portfolio_source::PortfolioSource;
use crate::components::product_line_source::ProductLineSource;
use crate::components::product_scope_query_hydrator::ProductScopeQueryHydrator;
use crate::components::top_confidence_selector::TopConfidenceSelector;
use crate::config::DashboardConfig;
use crate::filter::Filter;
use crate::query_hydrator::QueryHydrator;
use crate::sales_loader::SaleRecord;
use crate::selector::Selector;
use crate::side_effect::SideEffect;
use crate::source::Source;
use crate::types::DashboardQuery;

/// The dashboard recommendation pipeline.
///
/// Pipeline flow:
/// 1. ProductScopeQueryHydrator picks the product lines in scope
/// 2. ForecastQueryHydrator forecasts each of them from monthly sales
/// 3. ProductLineSource runs the per-line rules on each forecast
/// 4. PortfolioSource runs the liquidity, restock and growth rules
/// 5. ConfidenceFloorFilter drops low-confidence recommendations
/// 6. TopConfidenceSelector ranks by confidence and keeps the top N
/// 7. DashboardLogSideEffect logs what was delivered
pub struct DashboardPipeline {
    query_hydrators: Vec<Box<dyn QueryHydrator<DashboardQuery>>>,
    sources: Vec<Box<dyn Source<DashboardQuery, Recommendation>>>,
    filters: Vec<Box<dyn Filter<DashboardQuery, Recommendation>>>,
    selector: TopConfidenceSelector,
    side_effects: Vec<Box<dyn SideEffect<DashboardQuery, Recommendation>>>,
}

impl DashboardPipeline {
    pub fn new(
        sales: Arc<Vec<SaleRecord>>,
        portfolio: Arc<PortfolioContext>,
        engine: Arc<RecommendationEngine>,
        config: &DashboardConfig,
    ) -> Self {
        let query_hydrators: Vec<Box<dyn QueryHydrator<DashboardQuery>>> = vec![
            Box::new(ProductScopeQueryHydrator::new(
                Arc::clone(&sales),
                config.product_line_limit,
            )),
            Box::new(ForecastQueryHydrator::new(
                sales,
                config.forecast_horizon,
                config.history_window,
            )),
        ];

        let sources: Vec<Box<dyn Source<DashboardQuery, Recommendation>>> = vec![
            Box::new(ProductLineSource::new(Arc::clone(&engine))),
            Box::new(PortfolioSource::new(engine, portfolio)),
        ];

        let filters: Vec<Box<dyn Filter<DashboardQuery, Recommendation>>> =
            vec![Box::new(ConfidenceFloorFilter::new(config.min_confidence))];

        let side_effects: Vec<Box<dyn SideEffect<DashboardQuery, Recommendation>>> =
            vec![Box::new(DashboardLogSideEffect)];

        Self {
            query_hydrators,
            sources,
            filters,
            selector: TopConfidenceSelector {
                k: config.recommendation_limit,
            },
            side_effects,
        }
    }
}

#[async_trait]
impl CandidatePipeline<DashboardQuery, Recommendation> for DashboardPipeline {
    fn query_hydrators(&self) -> &[Box<dyn QueryHydrator<DashboardQuery>>] {
        &self.query_hydrators
    }

    fn sources(&self) -> &[Box<dyn Source<DashboardQuery, Recommendation>>] {
        &self.sources
    }

    fn filters(&self) -> &[Box<dyn Filter<DashboardQuery, Recommendation>>] {
        &self.filters
    }

    fn selector(&self) -> &dyn Selector<DashboardQuery, Recommendation> {
        &self.selector
    }

    fn side_effects(&self) -> &[Box<dyn SideEffect<DashboardQuery, Recommendation>>] {
        &self.side_effects
    }
}
