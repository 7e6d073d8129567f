use async_trait::async_trait;
use rayon::prelude::*;
use std::sync::Arc;

use revenue_engine::{analyze, TimeSeries};

use crate::aggregation::{
    line_totals, monthly_sales, monthly_totals, padded_history, select_product_line,
};
use crate::query_hydrator::QueryHydrator;
use crate::sales_loader::SaleRecord;
use crate::types::{DashboardQuery, ProductLineReport};

/// Forecasts every in-scope product line from its monthly sales.
///
/// Product lines are independent, so they are computed on the rayon pool.
/// Lines without any order are skipped.
pub struct ForecastQueryHydrator {
    sales: Arc<Vec<SaleRecord>>,
    pub horizon: usize,
    pub history_window: usize,
}

impl ForecastQueryHydrator {
    pub fn new(sales: Arc<Vec<SaleRecord>>, horizon: usize, history_window: usize) -> Self {
        Self {
            sales,
            horizon,
            history_window,
        }
    }

    fn report_for(&self, product_line: &str) -> Result<Option<ProductLineReport>, String> {
        let records = select_product_line(&self.sales, Some(product_line));
        if records.is_empty() {
            return Ok(None);
        }

        let monthly = monthly_sales(&monthly_totals(records.iter().copied()));
        let series = TimeSeries::new(monthly).map_err(|e| format!("{}: {}", product_line, e))?;
        let forecast = analyze(&series, self.horizon);
        let totals = line_totals(&records);

        Ok(Some(ProductLineReport {
            product: product_line.to_string(),
            forecast,
            historical: padded_history(series.values(), self.history_window),
            total_sales: totals.total_sales,
            avg_order_value: totals.avg_order_value,
        }))
    }
}

#[async_trait]
impl QueryHydrator<DashboardQuery> for ForecastQueryHydrator {
    fn enable(&self, query: &DashboardQuery) -> bool {
        !query.product_lines.is_empty()
    }

    async fn hydrate(&self, query: &mut DashboardQuery) -> Result<(), String> {
        let reports: Vec<Option<ProductLineReport>> = query
            .product_lines
            .par_iter()
            .map(|line| self.report_for(line))
            .collect::<Result<_, String>>()?;
        query.line_reports = reports.into_iter().flatten().collect();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sale(month: u32, line: &str, sales: f64) -> SaleRecord {
        SaleRecord {
            date: NaiveDate::from_ymd_opt(2004, month, 10).unwrap(),
            units_sold: 10.0,
            price: sales / 10.0,
            sales,
            product_line: line.into(),
            status: "Shipped".into(),
            year: Some(2004),
            month: Some(month),
        }
    }

    fn query(lines: &[&str]) -> DashboardQuery {
        DashboardQuery {
            product_lines: lines.iter().map(|l| l.to_string()).collect(),
            ..DashboardQuery::new("fc-1", None)
        }
    }

    #[tokio::test]
    async fn linear_monthly_sales_forecast() {
        let sales = Arc::new(vec![
            sale(1, "Ships", 1000.0),
            sale(2, "Ships", 2000.0),
            sale(3, "Ships", 3000.0),
            sale(4, "Ships", 4000.0),
        ]);
        let hydrator = ForecastQueryHydrator::new(sales, 2, 4);
        let mut q = query(&["Ships"]);
        hydrator.hydrate(&mut q).await.unwrap();

        assert_eq!(q.line_reports.len(), 1);
        let report = &q.line_reports[0];
        assert_eq!(report.forecast.predictions, vec![5000.0, 6000.0]);
        assert_eq!(report.forecast.confidence, 1.0);
        assert_eq!(report.historical, vec![1000.0, 2000.0, 3000.0, 4000.0]);
        assert!((report.total_sales - 10_000.0).abs() < 0.01);
        assert!((report.avg_order_value - 2_500.0).abs() < 0.01);
    }

    #[tokio::test]
    async fn gap_months_count_as_zero_and_history_is_padded() {
        let sales = Arc::new(vec![sale(1, "Planes", 300.0), sale(3, "Planes", 300.0)]);
        let hydrator = ForecastQueryHydrator::new(sales, 4, 4);
        let mut q = query(&["Planes"]);
        hydrator.hydrate(&mut q).await.unwrap();
        assert_eq!(q.line_reports[0].historical, vec![0.0, 300.0, 0.0, 300.0]);
        assert_eq!(q.line_reports[0].forecast.predictions.len(), 4);
    }

    #[tokio::test]
    async fn lines_without_orders_are_skipped_in_order() {
        let sales = Arc::new(vec![sale(1, "Ships", 10.0), sale(1, "Trains", 20.0)]);
        let hydrator = ForecastQueryHydrator::new(sales, 4, 4);
        let mut q = query(&["Trains", "Vintage Cars", "Ships"]);
        hydrator.hydrate(&mut q).await.unwrap();
        let products: Vec<&str> = q.line_reports.iter().map(|r| r.product.as_str()).collect();
        assert_eq!(products, vec!["Trains", "Ships"]);
        // single month: flat forecast
        assert_eq!(q.line_reports[0].forecast.predictions, vec![20.0; 4]);
    }
}
