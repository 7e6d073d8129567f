//! Revenue Engine: analytics core.
//!
//! Pure, stateless computations over small business tables:
//!
//! - [`trend`]: linear trend forecasting plus velocity/confidence metrics
//! - [`rules`]: ordered recommendation rules per product line and portfolio
//! - [`alerts`]: risk-annotated alerts from the same aggregates
//! - [`transforms`]: old-row to new-row effects of campaign and restock actions
//!
//! Nothing here performs I/O or keeps state between calls, so every entry
//! point is safe to call concurrently.

pub mod alerts;
pub mod context;
pub mod error;
pub mod math;
pub mod policy;
pub mod records;
pub mod rules;
pub mod series;
pub mod thresholds;
pub mod transforms;
pub mod trend;

pub use alerts::{classify_liquidity, derive_alerts};
pub use context::{PortfolioContext, ProductLineContext, TrailingWindow};
pub use error::{EngineError, EngineResult};
pub use policy::{ConfidencePolicy, RulePolicy, RuleThresholds};
pub use records::{
    Alert, AlertRisk, FinancialRow, InventoryRow, LiquidityRisk, ProductRow, Recommendation,
    RecommendationKind,
};
pub use rules::{PortfolioRule, ProductLineRule, RecommendationEngine};
pub use series::TimeSeries;
pub use transforms::{apply_campaign_boost, restock};
pub use trend::{analyze, forecast, metrics, ForecastResult, TrendFit, TrendMetrics};
