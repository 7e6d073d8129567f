use async_trait::async_trait;
use std::sync::Arc;

use crate::aggregation::{distinct_product_lines, product_filter};
use crate::query_hydrator::QueryHydrator;
use crate::sales_loader::SaleRecord;
use crate::types::DashboardQuery;

/// Decides which product lines get forecast.
///
/// An explicit product is used as-is, even when it has no sales (it then
/// produces no report). Otherwise the first `limit` product lines by first
/// order date are taken.
pub struct ProductScopeQueryHydrator {
    sales: Arc<Vec<SaleRecord>>,
    pub limit: usize,
}

impl ProductScopeQueryHydrator {
    pub fn new(sales: Arc<Vec<SaleRecord>>, limit: usize) -> Self {
        Self { sales, limit }
    }
}

#[async_trait]
impl QueryHydrator<DashboardQuery> for ProductScopeQueryHydrator {
    async fn hydrate(&self, query: &mut DashboardQuery) -> Result<(), String> {
        let lines = match product_filter(query.product.as_deref()) {
            Some(product) => vec![product.to_string()],
            None => distinct_product_lines(&self.sales)
                .into_iter()
                .take(self.limit)
                .collect(),
        };
        query.product_lines = lines;
        Ok(())
    }
}
