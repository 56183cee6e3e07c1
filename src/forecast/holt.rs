// src/forecast/holt.rs
use std::num::NonZeroUsize;

use once_cell::sync::Lazy;
use statrs::distribution::{ContinuousCDF, Normal};

use crate::forecast::{ForecastError, ForecastModel};
use crate::types::{Forecast, ForecastPoint, PriceSeries};

/// Fewest observations a fit can work from: one to seed the level, one more
/// for the initial trend.
pub const MIN_POINTS: usize = 2;

static STD_NORMAL: Lazy<Normal> = Lazy::new(|| Normal::new(0.0, 1.0).unwrap());

/// Additive Holt-Winters smoother. Falls back to plain Holt (level + trend)
/// when the series is shorter than two full seasons, so sparse histories
/// still produce a usable projection instead of an error.
///
/// Smoothing weights are fractions in `(0, 1)`; larger values track the most
/// recent observations more aggressively.
#[derive(Debug, Clone, Copy)]
pub struct HoltWinters {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    /// Central mass covered by the uncertainty band, e.g. `0.95`.
    pub confidence: f64,
}

impl Default for HoltWinters {
    fn default() -> Self {
        Self { alpha: 0.5, beta: 0.3, gamma: 0.2, confidence: 0.95 }
    }
}

impl HoltWinters {
    pub fn new(confidence: f64) -> Self {
        Self { confidence, ..Self::default() }
    }

    fn fit_trend(&self, y: &[f64]) -> Fit {
        let mut level = y[0];
        let mut trend = y[1] - y[0];
        let mut fitted = Vec::with_capacity(y.len());
        // No prior state exists for the first observation.
        fitted.push(y[0]);
        for &obs in &y[1..] {
            let ahead = level + trend;
            fitted.push(ahead);
            let prev = level;
            level = self.alpha * obs + (1.0 - self.alpha) * ahead;
            trend = self.beta * (level - prev) + (1.0 - self.beta) * trend;
        }
        Fit { fitted, level, trend, seasonal: Vec::new() }
    }

    fn fit_seasonal(&self, y: &[f64], m: usize) -> Fit {
        let first = y[..m].iter().sum::<f64>() / m as f64;
        let second = y[m..2 * m].iter().sum::<f64>() / m as f64;
        let mut level = first;
        let mut trend = (second - first) / m as f64;
        let mut seasonal: Vec<f64> = y[..m].iter().map(|v| v - first).collect();
        let mut fitted = Vec::with_capacity(y.len());
        for (t, &obs) in y.iter().enumerate() {
            let idx = t % m;
            fitted.push(level + trend + seasonal[idx]);
            let prev = level;
            level = self.alpha * (obs - seasonal[idx]) + (1.0 - self.alpha) * (level + trend);
            trend = self.beta * (level - prev) + (1.0 - self.beta) * trend;
            seasonal[idx] = self.gamma * (obs - level) + (1.0 - self.gamma) * seasonal[idx];
        }
        Fit { fitted, level, trend, seasonal }
    }
}

impl ForecastModel for HoltWinters {
    fn forecast(
        &self,
        series: &PriceSeries,
        horizon: NonZeroUsize,
    ) -> Result<Forecast, ForecastError> {
        let observed = series.points();
        let n = observed.len();
        if n < MIN_POINTS {
            return Err(ForecastError::InsufficientData { got: n, need: MIN_POINTS });
        }
        for p in observed {
            if !(p.close.is_finite() && p.close > 0.0) {
                return Err(ForecastError::NonPositivePrice { ts_ms: p.ts_ms, close: p.close });
            }
        }

        let y: Vec<f64> = observed.iter().map(|p| p.close).collect();
        let m = series.interval().season_len();
        let fit = if n >= 2 * m { self.fit_seasonal(&y, m) } else { self.fit_trend(&y) };
        let sigma = rmse(&y, &fit.fitted);
        let z = STD_NORMAL.inverse_cdf(0.5 + self.confidence.clamp(0.0, 0.999_999) / 2.0);

        let mut points = Vec::with_capacity(n + horizon.get());
        let half = z * sigma;
        for (obs, est) in observed.iter().zip(&fit.fitted) {
            points.push(ForecastPoint {
                ts_ms: obs.ts_ms,
                estimate: *est,
                lower: est - half,
                upper: est + half,
            });
        }
        let mut ts_ms = observed[n - 1].ts_ms;
        for h in 1..=horizon.get() {
            ts_ms = series.interval().advance(ts_ms);
            let estimate = fit.project(n, h);
            let half = z * sigma * (h as f64).sqrt();
            points.push(ForecastPoint {
                ts_ms,
                estimate,
                lower: estimate - half,
                upper: estimate + half,
            });
        }

        Ok(Forecast {
            symbol: series.symbol().to_owned(),
            interval: series.interval(),
            history_len: n,
            points,
        })
    }
}

struct Fit {
    fitted: Vec<f64>,
    level: f64,
    trend: f64,
    /// Empty when the trend-only fit applied.
    seasonal: Vec<f64>,
}

impl Fit {
    fn project(&self, n: usize, h: usize) -> f64 {
        let mut v = self.level + h as f64 * self.trend;
        if !self.seasonal.is_empty() {
            v += self.seasonal[(n + h - 1) % self.seasonal.len()];
        }
        v
    }
}

fn rmse(y: &[f64], fitted: &[f64]) -> f64 {
    let sq: f64 = y.iter().zip(fitted).map(|(a, b)| (a - b) * (a - b)).sum();
    (sq / y.len() as f64).sqrt()
}
