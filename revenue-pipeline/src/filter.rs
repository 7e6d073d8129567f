use crate::util;

/// Candidates split by a filter. Relative order is preserved on both sides.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterResult<C> {
    pub kept: Vec<C>,
    pub removed: Vec<C>,
}

/// A per-candidate predicate. Filters run one after another, each seeing
/// only what the previous one kept.
pub trait Filter<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    fn keep(&self, query: &Q, candidate: &C) -> bool;

    fn filter(&self, query: &Q, candidates: Vec<C>) -> FilterResult<C> {
        let (kept, removed) = candidates
            .into_iter()
            .partition(|c| self.keep(query, c));
        FilterResult { kept, removed }
    }

    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
