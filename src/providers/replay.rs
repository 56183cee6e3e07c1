// src/providers/replay.rs
use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;

use crate::providers::{MarketDataSource, SourceError};
use crate::types::{Interval, Period, PricePoint, PriceSeries};

/// On-disk close history, one file per symbol.
#[derive(Debug, Clone, Deserialize)]
pub struct Snapshot {
    pub symbol: String,
    pub interval: Interval,
    pub points: Vec<PricePoint>,
}

/// Serves recorded snapshots instead of hitting a live feed. Useful for
/// replaying an incident or pinning integration runs to a known tape.
#[derive(Default)]
pub struct ReplaySource {
    snapshots: HashMap<String, Snapshot>,
}

impl ReplaySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, snapshot: Snapshot) {
        self.snapshots.insert(snapshot.symbol.clone(), snapshot);
    }

    pub fn load(&mut self, path: &Path) -> anyhow::Result<()> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read snapshot {}", path.display()))?;
        let snapshot: Snapshot = serde_json::from_str(&raw)
            .with_context(|| format!("parse snapshot {}", path.display()))?;
        self.insert(snapshot);
        Ok(())
    }

    /// Load every `*.json` file in the directory as one snapshot each.
    pub fn load_dir(dir: &Path) -> anyhow::Result<Self> {
        let mut source = Self::new();
        for entry in std::fs::read_dir(dir).with_context(|| format!("open {}", dir.display()))? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                source.load(&path)?;
            }
        }
        Ok(source)
    }
}

#[async_trait]
impl MarketDataSource for ReplaySource {
    async fn history(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
    ) -> Result<PriceSeries, SourceError> {
        let snapshot = self
            .snapshots
            .get(symbol)
            .ok_or_else(|| SourceError::NoData { symbol: symbol.to_owned() })?;
        if snapshot.interval != interval {
            return Err(SourceError::Malformed {
                symbol: symbol.to_owned(),
                reason: format!(
                    "snapshot recorded at {}, requested {interval}",
                    snapshot.interval
                ),
            });
        }
        if snapshot.points.is_empty() {
            return Err(SourceError::NoData { symbol: symbol.to_owned() });
        }
        // Most recent window of the tape, sized like a live fetch.
        let n = period.observations(interval).min(snapshot.points.len());
        let window = snapshot.points[snapshot.points.len() - n..].to_vec();
        PriceSeries::new(symbol, interval, window)
            .map_err(|e| SourceError::Malformed { symbol: symbol.to_owned(), reason: e.to_string() })
    }
}
