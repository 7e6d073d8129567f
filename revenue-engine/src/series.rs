//! Validated numeric time series.

use serde::Serialize;

use crate::error::EngineResult;
use crate::math;

/// An ordered sequence of per-period observations.
///
/// Position in the sequence is the time index. The caller supplies one
/// already-aggregated value per period; the series never reorders or fills
/// gaps. Construction rejects non-finite values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TimeSeries {
    values: Vec<f64>,
}

impl TimeSeries {
    pub fn new(values: Vec<f64>) -> EngineResult<Self> {
        for (i, &v) in values.iter().enumerate() {
            math::ensure_finite(&format!("series[{}]", i), v)?;
        }
        Ok(Self { values })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Most recent observation.
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }

    pub fn mean(&self) -> f64 {
        math::mean(&self.values)
    }

    /// The trailing `n` observations (all of them if shorter).
    pub fn tail(&self, n: usize) -> &[f64] {
        let start = self.values.len().saturating_sub(n);
        &self.values[start..]
    }
}

impl TryFrom<Vec<f64>> for TimeSeries {
    type Error = crate::error::EngineError;

    fn try_from(values: Vec<f64>) -> EngineResult<Self> {
        Self::new(values)
    }
}
