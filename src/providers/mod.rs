// src/providers/mod.rs
use async_trait::async_trait;

use crate::types::{Interval, Period, PriceSeries};

#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("no observations returned for {symbol}")]
    NoData { symbol: String },
    #[error("malformed payload for {symbol}: {reason}")]
    Malformed { symbol: String, reason: String },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Return the close history for the symbol over the period, sampled at
    /// the interval. An empty market answer is [`SourceError::NoData`], never
    /// an empty series.
    async fn history(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
    ) -> Result<PriceSeries, SourceError>;
}

pub mod replay;
pub mod synthetic;
