//! Centralized rule thresholds and confidence levels.
//!
//! These are the defaults behind [`crate::policy::RulePolicy`]. Changing a
//! value here changes both the recommendation rules and the alert
//! derivation that share it.

/// Next-period forecast must exceed the last observation by this factor.
pub const INVENTORY_GROWTH_FACTOR: f64 = 1.1;

/// Average order value above which premium pricing is suggested.
pub const PREMIUM_ORDER_VALUE: f64 = 3000.0;

/// Total product-line sales above which market expansion is suggested.
pub const MARKET_EXPANSION_SALES: f64 = 50_000.0;

/// Number of trailing financial periods the portfolio rules look at.
pub const TRAILING_PERIODS: usize = 3;

/// Expense-to-revenue ratio above which the liquidity risk rule fires.
pub const LIQUIDITY_RISK_RATIO: f64 = 0.9;

/// Expense-to-revenue ratio above which liquidity is classified High.
pub const LIQUIDITY_HIGH_RATIO: f64 = 1.0;

/// Expense-to-revenue ratio above which liquidity is classified Medium.
pub const LIQUIDITY_MEDIUM_RATIO: f64 = 0.8;

/// Trailing revenue growth above which the momentum alert fires.
pub const MOMENTUM_GROWTH: f64 = 0.10;

/// Growth-rate increment applied by a marketing campaign.
pub const CAMPAIGN_GROWTH_BOOST: f64 = 0.05;

/// Units added to stock by a restock order.
pub const RESTOCK_UNITS: i64 = 25;

/// Maximum recommendations surfaced after ranking.
pub const RECOMMENDATION_LIMIT: usize = 9;

pub const INVENTORY_GROWTH_CONFIDENCE: f64 = 0.89;
pub const PREMIUM_PRICING_CONFIDENCE: f64 = 0.85;
pub const MARKET_EXPANSION_CONFIDENCE: f64 = 0.78;
pub const LIQUIDITY_RISK_CONFIDENCE: f64 = 0.92;
pub const RESTOCK_CONFIDENCE: f64 = 0.95;
pub const GROWTH_OPPORTUNITY_CONFIDENCE: f64 = 0.88;
