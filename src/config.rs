// src/config.rs
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::catalog::{FreightCatalog, DEFAULT_BASE_RATE, DEFAULT_CURRENCY};
use crate::types::{Interval, Period, Route};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdvisorConfig {
    #[serde(default = "d_instruments")]      pub instruments: Vec<String>,
    #[serde(default = "d_period")]           pub period: Period,
    #[serde(default = "d_interval")]         pub interval: Interval,
    #[serde(default = "d_horizon")]          pub horizon: NonZeroUsize,
    #[serde(default = "d_confidence")]       pub confidence: f64,
    #[serde(default = "d_adjustment")]       pub adjustment_factor: f64,
    #[serde(default = "d_jitter")]           pub jitter_pct: f64,
    #[serde(default = "d_poll_ms")]          pub poll_ms: u64,
    #[serde(default = "d_routes")]           pub routes: Vec<String>,
    #[serde(default)]                        pub freight: FreightSection,
}

/// `[freight]` table: base-rate overrides, unknown-route default, currency.
#[derive(Debug, Clone, Deserialize)]
pub struct FreightSection {
    #[serde(default = "d_default_rate")]     pub default_rate: f64,
    #[serde(default = "d_currency")]         pub currency: String,
    #[serde(default)]                        pub rates: HashMap<String, f64>,
}

const DEFAULT_HORIZON: NonZeroUsize = match NonZeroUsize::new(5) {
    Some(h) => h,
    None => unreachable!(),
};

fn d_instruments() -> Vec<String> { vec!["CL=F".to_owned()] }
fn d_period() -> Period { Period::OneMonth }
fn d_interval() -> Interval { Interval::Daily }
fn d_horizon() -> NonZeroUsize { DEFAULT_HORIZON }
fn d_confidence() -> f64 { 0.95 }
fn d_adjustment() -> f64 { 1.0 }
fn d_jitter() -> f64 { 0.10 }
fn d_poll_ms() -> u64 { 30_000 }
fn d_routes() -> Vec<String> {
    FreightCatalog::default_routes().into_iter().map(|r| r.0).collect()
}
fn d_default_rate() -> f64 { DEFAULT_BASE_RATE }
fn d_currency() -> String { DEFAULT_CURRENCY.to_owned() }

#[inline]
pub fn ms(d: u64) -> Duration {
    Duration::from_millis(d)
}

impl AdvisorConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.instruments.is_empty() {
            return Err(ConfigError::Invalid("instruments must not be empty"));
        }
        if self.routes.is_empty() {
            return Err(ConfigError::Invalid("routes must not be empty"));
        }
        if !(self.adjustment_factor.is_finite() && self.adjustment_factor > 0.0) {
            return Err(ConfigError::Invalid("adjustment_factor must be positive"));
        }
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(ConfigError::Invalid("confidence must be inside (0, 1)"));
        }
        if !(self.jitter_pct.is_finite() && (0.0..=1.0).contains(&self.jitter_pct)) {
            return Err(ConfigError::Invalid("jitter_pct must be within [0, 1]"));
        }
        if !(self.freight.default_rate.is_finite() && self.freight.default_rate > 0.0) {
            return Err(ConfigError::Invalid("freight.default_rate must be positive"));
        }
        Ok(())
    }

    pub fn catalog(&self) -> FreightCatalog {
        FreightCatalog::new(
            self.freight.rates.clone(),
            self.freight.default_rate,
            self.freight.currency.clone(),
        )
    }

    pub fn route_list(&self) -> Vec<Route> {
        self.routes.iter().map(|r| Route::new(r.clone())).collect()
    }
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            instruments: d_instruments(),
            period: d_period(),
            interval: d_interval(),
            horizon: d_horizon(),
            confidence: d_confidence(),
            adjustment_factor: d_adjustment(),
            jitter_pct: d_jitter(),
            poll_ms: d_poll_ms(),
            routes: d_routes(),
            freight: FreightSection::default(),
        }
    }
}

impl Default for FreightSection {
    fn default() -> Self {
        Self {
            default_rate: d_default_rate(),
            currency: d_currency(),
            rates: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg = AdvisorConfig::parse("").expect("must parse");
        assert_eq!(cfg.instruments, vec!["CL=F"]);
        assert_eq!(cfg.period, Period::OneMonth);
        assert_eq!(cfg.interval, Interval::Daily);
        assert_eq!(cfg.horizon.get(), 5);
        assert_eq!(cfg.adjustment_factor, 1.0);
        assert_eq!(cfg.routes.len(), 4);
        assert_eq!(cfg.freight.default_rate, DEFAULT_BASE_RATE);
    }

    #[test]
    fn parses_overrides() {
        let cfg = AdvisorConfig::parse(
            r#"
            instruments = ["GC=F", "SI=F"]
            period = "6mo"
            interval = "1wk"
            horizon = 8
            jitter_pct = 0.0
            routes = ["Route B", "Northern Arc"]

            [freight]
            default_rate = 14.25
            currency = "EUR"

            [freight.rates]
            "Northern Arc" = 21.4
            "#,
        )
        .expect("must parse");
        assert_eq!(cfg.instruments.len(), 2);
        assert_eq!(cfg.period, Period::SixMonths);
        assert_eq!(cfg.interval, Interval::Weekly);
        assert_eq!(cfg.horizon.get(), 8);
        assert_eq!(cfg.jitter_pct, 0.0);

        let catalog = cfg.catalog();
        assert_eq!(catalog.base_rate(&Route::from("Northern Arc")), 21.4);
        assert_eq!(catalog.base_rate(&Route::from("no such lane")), 14.25);
        assert_eq!(catalog.currency(), "EUR");
    }

    #[test]
    fn rejects_zero_horizon_at_parse() {
        assert!(AdvisorConfig::parse("horizon = 0").is_err());
    }

    #[test]
    fn rejects_out_of_range_settings() {
        assert!(AdvisorConfig::parse("confidence = 1.5").is_err());
        assert!(AdvisorConfig::parse("jitter_pct = -0.2").is_err());
        assert!(AdvisorConfig::parse("adjustment_factor = 0.0").is_err());
        assert!(AdvisorConfig::parse("routes = []").is_err());
    }
}
