use revenue_engine::{EngineResult, ForecastResult, ProductLineContext};
use serde::Serialize;

use crate::candidate_pipeline::HasRequestId;

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// One dashboard request.
#[derive(Clone, Debug, Default)]
pub struct DashboardQuery {
    pub request_id: String,
    /// Requested product line; `None` or `"All Products"` means no filter.
    pub product: Option<String>,

    // Populated by query hydrators
    /// Product lines in scope for forecasting.
    pub product_lines: Vec<String>,
    /// Forecast and aggregates per in-scope product line.
    pub line_reports: Vec<ProductLineReport>,
}

impl DashboardQuery {
    pub fn new(request_id: impl Into<String>, product: Option<String>) -> Self {
        Self {
            request_id: request_id.into(),
            product,
            ..Self::default()
        }
    }
}

impl HasRequestId for DashboardQuery {
    fn request_id(&self) -> &str {
        &self.request_id
    }
}

// ---------------------------------------------------------------------------
// Per product line
// ---------------------------------------------------------------------------

/// Forecast block for one product line.
///
/// Serializes as `{ product, predictions, velocity, confidence, historical }`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProductLineReport {
    pub product: String,
    #[serde(flatten)]
    pub forecast: ForecastResult,
    /// Trailing monthly sales, left-padded with zeros.
    pub historical: Vec<f64>,
    #[serde(skip)]
    pub total_sales: f64,
    #[serde(skip)]
    pub avg_order_value: f64,
}

impl ProductLineReport {
    /// Rule context for this product line.
    pub fn context(&self) -> EngineResult<ProductLineContext> {
        ProductLineContext::new(
            self.product.clone(),
            self.forecast.predictions.clone(),
            self.historical.clone(),
            self.total_sales,
            self.avg_order_value,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_serializes_flat() {
        let report = ProductLineReport {
            product: "Ships".into(),
            forecast: ForecastResult {
                predictions: vec![5.0, 6.0],
                velocity: 0.4,
                confidence: 1.0,
            },
            historical: vec![0.0, 4.0],
            total_sales: 10.0,
            avg_order_value: 2.5,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["product"], "Ships");
        assert_eq!(json["predictions"][1], 6.0);
        assert_eq!(json["velocity"], 0.4);
        assert_eq!(json["historical"][1], 4.0);
        assert!(json.get("total_sales").is_none());
        assert!(json.get("forecast").is_none());
    }
}
