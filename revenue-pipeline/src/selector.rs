use std::cmp::Ordering;

use crate::util;

/// Ranks the surviving candidates and keeps the best of them.
pub trait Selector<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    /// Ranking key, higher first.
    fn score(&self, candidate: &C) -> f64;

    /// Maximum number of candidates returned; `None` keeps all.
    fn limit(&self) -> Option<usize> {
        None
    }

    /// Stable descending sort on `score`, then truncation to `limit`.
    ///
    /// Equal scores keep their incoming order. NaN scores rank last.
    fn select(&self, _query: &Q, candidates: Vec<C>) -> Vec<C> {
        let mut ranked = candidates;
        ranked.sort_by(|a, b| rank_desc(self.score(a), self.score(b)));
        if let Some(limit) = self.limit() {
            ranked.truncate(limit);
        }
        ranked
    }

    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}

/// Descending order with NaN after every number.
pub fn rank_desc(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_desc_orders_nan_last() {
        let mut values = vec![0.5, f64::NAN, 0.9, 0.1];
        values.sort_by(|a, b| rank_desc(*a, *b));
        assert_eq!(&values[..3], &[0.9, 0.5, 0.1]);
        assert!(values[3].is_nan());
    }
}
