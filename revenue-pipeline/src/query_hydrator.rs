use async_trait::async_trait;

use crate::util;

/// Query hydrators run in declaration order before any source, each filling
/// in the query fields it owns. Later hydrators may read what earlier ones
/// wrote.
#[async_trait]
pub trait QueryHydrator<Q>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
{
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Write this hydrator's fields into `query`.
    ///
    /// Implementations compute first and assign last, so an `Err` leaves
    /// the query exactly as it was passed in.
    async fn hydrate(&self, query: &mut Q) -> Result<(), String>;

    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
