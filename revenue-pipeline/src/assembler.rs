//! Dashboard assembly.
//!
//! The assembler owns the loaded tables, runs the recommendation pipeline
//! for a request and stitches its output together with alerts, inventory
//! health, cash flow and summary stats.

use std::sync::Arc;

use revenue_engine::{
    derive_alerts, Alert, EngineResult, FinancialRow, InventoryRow, PortfolioContext, ProductRow,
    Recommendation, RecommendationEngine, RulePolicy,
};
use serde::Serialize;

use crate::aggregation::{cash_flow, distinct_product_lines, CashFlowPeriod};
use crate::candidate_pipeline::CandidatePipeline;
use crate::config::DashboardConfig;
use crate::inventory_health::{at_risk_count, inventory_health, InventoryHealth};
use crate::pipelines::dashboard::DashboardPipeline;
use crate::sales_loader::SaleRecord;
use crate::types::{DashboardQuery, ProductLineReport};
use crate::util::month_label;

/// Label stamped on alerts when there is no financial period to date them by.
pub const UNDATED_LABEL: &str = "Current";

/// Loaded tables. Without a financials table, the cash-flow view derived
/// from sales stands in for it.
#[derive(Debug, Clone, Default)]
pub struct DashboardInputs {
    pub sales: Vec<SaleRecord>,
    pub products: Vec<ProductRow>,
    pub inventory: Vec<InventoryRow>,
    pub financials: Option<Vec<FinancialRow>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    /// Distinct product lines in the sales data.
    pub total_products: usize,
    /// Recommendations that passed filtering, before truncation.
    pub alerts_count: usize,
    /// Inventory health rows in `Warning`.
    pub inventory_risk: usize,
    pub active_alerts: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub recommendations: Vec<Recommendation>,
    pub alerts: Vec<Alert>,
    pub revenue_forecast: Vec<ProductLineReport>,
    pub inventory_health: Vec<InventoryHealth>,
    pub cash_flow: Vec<CashFlowPeriod>,
    pub stats: DashboardStats,
}

pub struct DashboardAssembler {
    sales: Arc<Vec<SaleRecord>>,
    portfolio: Arc<PortfolioContext>,
    engine: Arc<RecommendationEngine>,
    cash_flow: Vec<CashFlowPeriod>,
    config: DashboardConfig,
    pipeline: DashboardPipeline,
}

impl DashboardAssembler {
    /// Validates the tables once; every later request reuses them.
    pub fn new(
        inputs: DashboardInputs,
        policy: RulePolicy,
        config: DashboardConfig,
    ) -> EngineResult<Self> {
        let sales = Arc::new(inputs.sales);
        let cash_flow = cash_flow(&sales, config.cash_flow_months);

        let financials = match inputs.financials {
            Some(rows) => rows,
            None => {
                log::info!("no financials table; deriving periods from monthly sales");
                cash_flow.iter().map(CashFlowPeriod::to_financial_row).collect()
            }
        };
        let as_of = financials
            .last()
            .map(|r| month_label(r.date))
            .unwrap_or_else(|| UNDATED_LABEL.to_string());

        let portfolio = Arc::new(PortfolioContext::new(
            financials,
            inputs.products,
            inputs.inventory,
            as_of,
        )?);
        let engine = Arc::new(RecommendationEngine::new(policy));
        let pipeline = DashboardPipeline::new(
            Arc::clone(&sales),
            Arc::clone(&portfolio),
            Arc::clone(&engine),
            &config,
        );

        Ok(Self {
            sales,
            portfolio,
            engine,
            cash_flow,
            config,
            pipeline,
        })
    }

    pub fn product_lines(&self) -> Vec<String> {
        distinct_product_lines(&self.sales)
    }

    /// Build the dashboard for one request.
    ///
    /// `product` narrows forecasting and per-line rules to one product line;
    /// alerts, inventory health and cash flow always cover the portfolio.
    pub async fn assemble(&self, request_id: &str, product: Option<String>) -> Dashboard {
        let result = self
            .pipeline
            .execute(DashboardQuery::new(request_id, product))
            .await;

        let alerts = derive_alerts(&self.portfolio, &self.engine.policy().thresholds);
        let health = inventory_health(
            &self.sales,
            &self.portfolio.inventory,
            self.config.inventory_health_lines,
            self.config.stock_simulation,
        );

        let stats = DashboardStats {
            total_products: self.product_lines().len(),
            alerts_count: result.kept_count(),
            inventory_risk: at_risk_count(&health),
            active_alerts: alerts.len(),
        };

        log::debug!(
            "request_id={} assembled {} forecast block(s), {} alert(s)",
            request_id,
            result.query.line_reports.len(),
            alerts.len()
        );

        Dashboard {
            revenue_forecast: result.query.line_reports.clone(),
            recommendations: result.selected_candidates,
            alerts,
            inventory_health: health,
            cash_flow: self.cash_flow.clone(),
            stats,
        }
    }
}
