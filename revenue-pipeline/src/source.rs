use async_trait::async_trait;

use crate::util;

/// Produces candidates from the hydrated query. Every enabled source runs
/// and their outputs are concatenated in source order.
#[async_trait]
pub trait Source<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    /// Sources with nothing to contribute for `query` opt out here.
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    async fn get_candidates(&self, query: &Q) -> Result<Vec<C>, String>;

    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
