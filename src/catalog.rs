// src/catalog.rs
use std::collections::HashMap;

use crate::types::Route;

/// Base freight rate per shipping route, as shipped with the product demo.
pub static DEFAULT_BASE_RATES: phf::Map<&'static str, f64> = phf::phf_map! {
    "Route A" => 15.5,
    "Route B" => 18.2,
    "Route C" => 12.8,
    "Route D" => 20.0,
};

/// Base rate applied when a route is missing from the catalog.
pub const DEFAULT_BASE_RATE: f64 = 17.0;

pub const DEFAULT_CURRENCY: &str = "USD";

/// Display labels for the commodity tickers the demo tracks.
pub static COMMODITY_LABELS: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "CL=F" => "Crude Oil [Energy]",
    "GC=F" => "Gold [Metals]",
    "HG=F" => "Copper [Metals]",
    "SI=F" => "Silver [Metals]",
};

/// Human label for a ticker, falling back to the ticker itself.
pub fn commodity_label(symbol: &str) -> &str {
    COMMODITY_LABELS.get(symbol).copied().unwrap_or(symbol)
}

/// Route -> base-rate mapping with an explicit default for unknown routes.
/// Overrides layered from config shadow the static table.
#[derive(Debug, Clone)]
pub struct FreightCatalog {
    overrides: HashMap<String, f64>,
    default_rate: f64,
    currency: String,
}

impl FreightCatalog {
    pub fn new(
        overrides: HashMap<String, f64>,
        default_rate: f64,
        currency: impl Into<String>,
    ) -> Self {
        Self { overrides, default_rate, currency: currency.into() }
    }

    /// Base rate for `route`. Unknown routes resolve to the configured
    /// default rate; the fallback is logged, never silent.
    pub fn base_rate(&self, route: &Route) -> f64 {
        if let Some(rate) = self.overrides.get(route.name()) {
            return *rate;
        }
        if let Some(rate) = DEFAULT_BASE_RATES.get(route.name()) {
            return *rate;
        }
        tracing::debug!(
            route = %route,
            rate = self.default_rate,
            "route not in catalog, using default base rate"
        );
        self.default_rate
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// The static route set, in catalog order.
    pub fn default_routes() -> Vec<Route> {
        ["Route A", "Route B", "Route C", "Route D"]
            .iter()
            .map(|r| Route::from(*r))
            .collect()
    }
}

impl Default for FreightCatalog {
    fn default() -> Self {
        Self::new(HashMap::new(), DEFAULT_BASE_RATE, DEFAULT_CURRENCY)
    }
}
