// src/forecast/mod.rs
use std::num::NonZeroUsize;

use crate::types::{Forecast, PriceSeries};

pub mod holt;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    #[error("insufficient data: {got} points, need at least {need}")]
    InsufficientData { got: usize, need: usize },
    #[error("non-positive close {close} at timestamp {ts_ms}")]
    NonPositivePrice { ts_ms: i64, close: f64 },
}

/// Trend+seasonality forecaster seam. Any model emitting ordered,
/// cadence-contiguous points with a band that never narrows as the horizon
/// grows satisfies the contract; nothing downstream depends on the fitting
/// method itself.
pub trait ForecastModel: Send + Sync {
    fn forecast(
        &self,
        series: &PriceSeries,
        horizon: NonZeroUsize,
    ) -> Result<Forecast, ForecastError>;
}
