use async_trait::async_trait;
use std::sync::Arc;

use crate::util;

/// What a side effect sees once selection is done.
#[derive(Clone)]
pub struct SideEffectInput<Q, C> {
    pub query: Arc<Q>,
    pub selected_candidates: Vec<C>,
    /// Candidates produced by all sources before filtering.
    pub retrieved_count: usize,
}

/// Runs after selection. A side effect cannot change the result, and its
/// failure is logged without failing the run.
#[async_trait]
pub trait SideEffect<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    async fn run(&self, input: &SideEffectInput<Q, C>) -> Result<(), String>;

    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
