//! Revenue Pipeline: from CSV exports to an assembled dashboard.
//!
//! Loaders turn sales, product, inventory and financial CSVs into typed rows.
//! The dashboard pipeline is a staged candidate pipeline whose candidates
//! are recommendations: query hydrators scope and forecast product lines,
//! sources run the rule engine, filters and a selector rank the output,
//! and side effects observe the result. [`assembler::DashboardAssembler`]
//! wraps a pipeline run with alerts, inventory health and cash flow.

pub mod aggregation;
pub mod assembler;
pub mod candidate_pipeline;
pub mod components;
pub mod config;
pub mod error;
pub mod filter;
pub mod inventory_health;
pub mod persistence;
pub mod pipelines;
pub mod query_hydrator;
pub mod sales_loader;
pub mod selector;
pub mod side_effect;
pub mod source;
pub mod table_loader;
pub mod types;
pub mod util;

pub use assembler::{Dashboard, DashboardAssembler, DashboardInputs, DashboardStats};
pub use config::DashboardConfig;
pub use error::{LoadError, LoadResult};
pub use sales_loader::SaleRecord;
