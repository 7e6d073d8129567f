//! Linear trend forecasting and trend metrics.
//!
//! Both the forecaster and the metrics calculator fit the same ordinary
//! least squares line `y = slope * i + intercept` over the points `(i, y_i)`,
//! `i = 0..n-1`. The fit is closed-form and needs at least two points;
//! shorter series take the documented degenerate branches instead of
//! failing.
//!
//! Rounding is half away from zero (`f64::round`): predictions to 2
//! decimals, velocity to 4, confidence to 2.

use serde::Serialize;

use crate::math::{guarded_ratio, round_to};
use crate::series::TimeSeries;

/// Total sum of squares at or below this is treated as zero variance.
const ZERO_VARIANCE: f64 = 1e-10;

/// Closed-form OLS fit of a series against its integer index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendFit {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination, unclamped and unrounded.
    pub r_squared: f64,
    pub mean: f64,
    pub n_observations: usize,
}

impl TrendFit {
    /// Fit the series. Returns `None` for fewer than two points.
    pub fn fit(values: &[f64]) -> Option<TrendFit> {
        if values.len() < 2 {
            return None;
        }

        let n = values.len() as f64;
        let mean_t = (n - 1.0) / 2.0;
        let mean_y = values.iter().sum::<f64>() / n;

        let mut s_ty = 0.0;
        let mut s_tt = 0.0;
        for (i, &y) in values.iter().enumerate() {
            let dt = i as f64 - mean_t;
            s_ty += dt * (y - mean_y);
            s_tt += dt * dt;
        }

        // s_tt > 0 whenever n >= 2
        let slope = s_ty / s_tt;
        let intercept = mean_y - slope * mean_t;

        let ss_tot: f64 = values.iter().map(|&y| (y - mean_y).powi(2)).sum();
        let ss_res: f64 = values
            .iter()
            .enumerate()
            .map(|(i, &y)| (y - (intercept + slope * i as f64)).powi(2))
            .sum();

        let r_squared = if ss_tot > ZERO_VARIANCE {
            1.0 - ss_res / ss_tot
        } else {
            1.0
        };

        Some(TrendFit {
            slope,
            intercept,
            r_squared,
            mean: mean_y,
            n_observations: values.len(),
        })
    }

    /// Value of the fitted line at time index `t`.
    pub fn value_at(&self, t: f64) -> f64 {
        self.intercept + self.slope * t
    }

    /// Extrapolate `horizon` steps past the last observation.
    pub fn extrapolate(&self, horizon: usize) -> Vec<f64> {
        (0..horizon)
            .map(|step| self.value_at((self.n_observations + step) as f64))
            .collect()
    }

    /// Slope normalized by the series mean; a zero mean divides by 1.
    pub fn velocity(&self) -> f64 {
        guarded_ratio(self.slope, self.mean)
    }

    /// R² bounded to `[0, 1]`.
    pub fn confidence(&self) -> f64 {
        self.r_squared.clamp(0.0, 1.0)
    }
}

/// Velocity and fit quality of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendMetrics {
    pub velocity: f64,
    pub confidence: f64,
}

impl TrendMetrics {
    /// Metrics for a series too short to fit: no trend, perfectly explained.
    pub const FLAT: TrendMetrics = TrendMetrics {
        velocity: 0.0,
        confidence: 1.0,
    };
}

/// Forecast plus trend metrics for one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    pub predictions: Vec<f64>,
    pub velocity: f64,
    pub confidence: f64,
}

fn finalize_prediction(value: f64) -> f64 {
    round_to(value.max(0.0), 2)
}

fn forecast_from(fit: Option<&TrendFit>, series: &TimeSeries, horizon: usize) -> Vec<f64> {
    match fit {
        Some(fit) => fit
            .extrapolate(horizon)
            .into_iter()
            .map(finalize_prediction)
            .collect(),
        None => {
            let last = series.last().unwrap_or(0.0);
            vec![finalize_prediction(last); horizon]
        }
    }
}

fn metrics_from(fit: Option<&TrendFit>) -> TrendMetrics {
    match fit {
        Some(fit) => TrendMetrics {
            velocity: round_to(fit.velocity(), 4),
            confidence: round_to(fit.confidence(), 2),
        },
        None => TrendMetrics::FLAT,
    }
}

/// Extrapolate the series' linear trend `horizon` periods forward.
///
/// Always returns exactly `horizon` non-negative values. A series with fewer
/// than two points repeats its last value (`0.0` when empty).
pub fn forecast(series: &TimeSeries, horizon: usize) -> Vec<f64> {
    let fit = TrendFit::fit(series.values());
    forecast_from(fit.as_ref(), series, horizon)
}

/// Velocity and confidence of the series' linear trend.
pub fn metrics(series: &TimeSeries) -> TrendMetrics {
    let fit = TrendFit::fit(series.values());
    metrics_from(fit.as_ref())
}

/// Forecast and metrics from a single shared fit.
pub fn analyze(series: &TimeSeries, horizon: usize) -> ForecastResult {
    let fit = TrendFit::fit(series.values());
    let predictions = forecast_from(fit.as_ref(), series, horizon);
    let TrendMetrics {
        velocity,
        confidence,
    } = metrics_from(fit.as_ref());

    log::debug!(
        "trend n={} horizon={} velocity={} confidence={}",
        series.len(),
        horizon,
        velocity,
        confidence
    );

    ForecastResult {
        predictions,
        velocity,
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64]) -> TimeSeries {
        TimeSeries::new(values.to_vec()).unwrap()
    }

    #[test]
    fn fit_recovers_exact_line() {
        let data: Vec<f64> = (0..10).map(|i| 10.0 + 2.0 * i as f64).collect();
        let fit = TrendFit::fit(&data).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-10);
        assert!((fit.intercept - 10.0).abs() < 1e-10);
        assert!((fit.r_squared - 1.0).abs() < 1e-10);
    }

    #[test]
    fn fit_needs_two_points() {
        assert!(TrendFit::fit(&[]).is_none());
        assert!(TrendFit::fit(&[3.0]).is_none());
        assert!(TrendFit::fit(&[3.0, 4.0]).is_some());
    }

    #[test]
    fn forecast_perfect_slope() {
        let s = series(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(forecast(&s, 2), vec![5.0, 6.0]);
    }

    #[test]
    fn forecast_single_point_repeats_it() {
        assert_eq!(forecast(&series(&[5.0]), 3), vec![5.0, 5.0, 5.0]);
    }

    #[test]
    fn forecast_empty_series_is_zero() {
        assert_eq!(forecast(&series(&[]), 2), vec![0.0, 0.0]);
    }

    #[test]
    fn forecast_zero_horizon_is_empty() {
        assert!(forecast(&series(&[1.0, 2.0, 3.0]), 0).is_empty());
        assert!(forecast(&series(&[]), 0).is_empty());
    }

    #[test]
    fn forecast_floors_negative_trend_at_zero() {
        let s = series(&[30.0, 20.0, 10.0]);
        // line: 30 - 10i -> 0, -10, -20
        assert_eq!(forecast(&s, 3), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn forecast_rounds_to_two_decimals() {
        let s = series(&[1.0, 1.333, 1.667]);
        for p in forecast(&s, 3) {
            assert_eq!(p, round_to(p, 2));
        }
    }

    #[test]
    fn metrics_perfect_slope() {
        let m = metrics(&series(&[1.0, 2.0, 3.0, 4.0]));
        assert_eq!(m.confidence, 1.0);
        assert_eq!(m.velocity, round_to(1.0 / 2.5, 4));
    }

    #[test]
    fn metrics_constant_series() {
        let m = metrics(&series(&[4.0, 4.0, 4.0]));
        assert_eq!(m, TrendMetrics { velocity: 0.0, confidence: 1.0 });
    }

    #[test]
    fn metrics_short_series_is_flat() {
        assert_eq!(metrics(&series(&[7.0])), TrendMetrics::FLAT);
        assert_eq!(metrics(&series(&[])), TrendMetrics::FLAT);
    }

    #[test]
    fn metrics_zero_mean_divides_by_one() {
        // slope 2, mean 0
        let m = metrics(&series(&[-3.0, -1.0, 1.0, 3.0]));
        assert_eq!(m.velocity, 2.0);
        assert_eq!(m.confidence, 1.0);
    }

    #[test]
    fn metrics_noisy_series_confidence_in_bounds() {
        let m = metrics(&series(&[10.0, 2.0, 9.0, 1.0, 8.0]));
        assert!(m.confidence >= 0.0 && m.confidence <= 1.0);
        assert!(m.confidence < 0.5);
    }

    #[test]
    fn analyze_matches_separate_calls() {
        let s = series(&[120.0, 135.5, 128.0, 160.25, 171.0]);
        let r = analyze(&s, 4);
        assert_eq!(r.predictions, forecast(&s, 4));
        let m = metrics(&s);
        assert_eq!(r.velocity, m.velocity);
        assert_eq!(r.confidence, m.confidence);
    }
}
