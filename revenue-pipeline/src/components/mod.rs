pub mod confidence_floor_filter;
pub mod dashboard_log_side_effect;
pub mod forecast_query_hydrator;
pub mod portfolio_source;
pub mod product_line_source;
pub mod product_scope_query_hydrator;
pub mod top_confidence_selector;
