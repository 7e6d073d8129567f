use async_trait::async_trait;
use std::collections::BTreeMap;

use revenue_engine::Recommendation;

use crate::side_effect::{SideEffect, SideEffectInput};
use crate::types::DashboardQuery;

/// Records the delivered recommendation set in the log.
pub struct DashboardLogSideEffect;

#[async_trait]
impl SideEffect<DashboardQuery, Recommendation> for DashboardLogSideEffect {
    async fn run(
        &self,
        input: &SideEffectInput<DashboardQuery, Recommendation>,
    ) -> Result<(), String> {
        let mut by_kind: BTreeMap<String, usize> = BTreeMap::new();
        for rec in &input.selected_candidates {
            *by_kind.entry(rec.kind.to_string()).or_insert(0) += 1;
        }
        log::info!(
            "request_id={} delivered {} of {} recommendation(s) across {} product line(s) {:?}",
            input.query.request_id,
            input.selected_candidates.len(),
            input.retrieved_count,
            input.query.line_reports.len(),
            by_kind
        );
        Ok(())
    }
}
