//! Staged candidate pipeline.
//!
//! A run goes: hydrate query -> fetch from sources -> filter -> select ->
//! side effects. Stage failures are logged with the request id and the
//! stage is skipped; a run always produces a result.

use async_trait::async_trait;
use std::sync::Arc;

use crate::filter::Filter;
use crate::query_hydrator::QueryHydrator;
use crate::selector::Selector;
use crate::side_effect::{SideEffect, SideEffectInput};
use crate::source::Source;

/// Queries carry a request id that every log line is tagged with.
pub trait HasRequestId {
    fn request_id(&self) -> &str;
}

/// Everything a run produced, for callers that report on the stages.
#[derive(Debug, Clone)]
pub struct PipelineResult<Q, C> {
    pub query: Arc<Q>,
    /// Output of all sources, in source order.
    pub retrieved_candidates: Vec<C>,
    /// Candidates removed by filters.
    pub filtered_candidates: Vec<C>,
    /// Ranked and truncated output.
    pub selected_candidates: Vec<C>,
}

impl<Q, C> PipelineResult<Q, C> {
    /// Candidates that survived filtering, before truncation.
    pub fn kept_count(&self) -> usize {
        self.retrieved_candidates
            .len()
            .saturating_sub(self.filtered_candidates.len())
    }
}

#[async_trait]
pub trait CandidatePipeline<Q, C>: Send + Sync
where
    Q: HasRequestId + Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    fn query_hydrators(&self) -> &[Box<dyn QueryHydrator<Q>>];
    fn sources(&self) -> &[Box<dyn Source<Q, C>>];
    fn filters(&self) -> &[Box<dyn Filter<Q, C>>];
    fn selector(&self) -> &dyn Selector<Q, C>;
    fn side_effects(&self) -> &[Box<dyn SideEffect<Q, C>>];

    async fn execute(&self, query: Q) -> PipelineResult<Q, C> {
        let query = self.hydrate_query(query).await;
        let retrieved = self.fetch_candidates(&query).await;
        let (kept, removed) = self.run_filters(&query, retrieved.clone());
        let selected = self.selector().select(&query, kept);

        log::info!(
            "request_id={} retrieved={} removed={} selected={}",
            query.request_id(),
            retrieved.len(),
            removed.len(),
            selected.len()
        );

        let query = Arc::new(query);
        let input = SideEffectInput {
            query: Arc::clone(&query),
            selected_candidates: selected.clone(),
            retrieved_count: retrieved.len(),
        };
        self.run_side_effects(&input).await;

        PipelineResult {
            query,
            retrieved_candidates: retrieved,
            filtered_candidates: removed,
            selected_candidates: selected,
        }
    }

    async fn hydrate_query(&self, mut query: Q) -> Q {
        for hydrator in self.query_hydrators() {
            if !hydrator.enable(&query) {
                continue;
            }
            if let Err(err) = hydrator.hydrate(&mut query).await {
                log::warn!(
                    "request_id={} query hydrator {} failed: {}",
                    query.request_id(),
                    hydrator.name(),
                    err
                );
            }
        }
        query
    }

    async fn fetch_candidates(&self, query: &Q) -> Vec<C> {
        let mut candidates = Vec::new();
        for source in self.sources().iter().filter(|s| s.enable(query)) {
            match source.get_candidates(query).await {
                Ok(found) => {
                    log::debug!(
                        "request_id={} source {} produced {} candidate(s)",
                        query.request_id(),
                        source.name(),
                        found.len()
                    );
                    candidates.extend(found);
                }
                Err(err) => log::warn!(
                    "request_id={} source {} failed: {}",
                    query.request_id(),
                    source.name(),
                    err
                ),
            }
        }
        candidates
    }

    fn run_filters(&self, query: &Q, candidates: Vec<C>) -> (Vec<C>, Vec<C>) {
        let mut kept = candidates;
        let mut removed = Vec::new();
        for filter in self.filters().iter().filter(|f| f.enable(query)) {
            let result = filter.filter(query, kept);
            if !result.removed.is_empty() {
                log::debug!(
                    "request_id={} filter {} removed {} candidate(s)",
                    query.request_id(),
                    filter.name(),
                    result.removed.len()
                );
            }
            kept = result.kept;
            removed.extend(result.removed);
        }
        (kept, removed)
    }

    async fn run_side_effects(&self, input: &SideEffectInput<Q, C>) {
        for effect in self.side_effects() {
            if !effect.enable(&input.query) {
                continue;
            }
            if let Err(err) = effect.run(input).await {
                log::warn!(
                    "request_id={} side effect {} failed: {}",
                    input.query.request_id(),
                    effect.name(),
                    err
                );
            }
        }
    }
}
