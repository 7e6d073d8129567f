//! Shared numeric helpers.

use crate::error::{EngineError, EngineResult};

/// Round to `decimals` places, halves away from zero (`f64::round`).
///
/// A result of `-0.0` is normalized to `0.0` so serialized output never
/// shows a signed zero.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Arithmetic mean, `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Reject NaN and infinities.
pub fn ensure_finite(field: &str, value: f64) -> EngineResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EngineError::invalid(
            field,
            format!("value must be finite, got {}", value),
        ))
    }
}

/// `numerator / denominator`, substituting `1.0` for a zero denominator.
pub fn guarded_ratio(numerator: f64, denominator: f64) -> f64 {
    let denominator = if denominator == 0.0 { 1.0 } else { denominator };
    numerator / denominator
}
