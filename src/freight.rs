// src/freight.rs
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::catalog::FreightCatalog;
use crate::types::{round_cents, FreightQuote, Route};

/// Per-route freight quoting seam. Implementations must be callable from
/// multiple tasks at once; quoting never fails (unknown routes resolve to
/// the catalog default rate).
pub trait FreightQuoter: Send + Sync {
    fn quote(&self, route: &Route) -> FreightQuote;
}

/// Simulated freight market: a uniform relative jitter in
/// `[-jitter_pct, +jitter_pct]` around the catalog base rate, rounded to
/// minor units. The generator is injected and seedable; `jitter_pct = 0`
/// quotes the base rate exactly.
pub struct SimulatedFreightCost {
    catalog: FreightCatalog,
    jitter_pct: f64,
    rng: Mutex<StdRng>,
}

impl SimulatedFreightCost {
    pub fn new(catalog: FreightCatalog, jitter_pct: f64) -> Self {
        Self::with_rng(catalog, jitter_pct, StdRng::from_os_rng())
    }

    pub fn seeded(catalog: FreightCatalog, jitter_pct: f64, seed: u64) -> Self {
        Self::with_rng(catalog, jitter_pct, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(catalog: FreightCatalog, jitter_pct: f64, rng: StdRng) -> Self {
        Self { catalog, jitter_pct, rng: Mutex::new(rng) }
    }
}

impl FreightQuoter for SimulatedFreightCost {
    fn quote(&self, route: &Route) -> FreightQuote {
        let base = self.catalog.base_rate(route);
        let jitter = if self.jitter_pct > 0.0 {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            rng.random_range(-self.jitter_pct..=self.jitter_pct)
        } else {
            0.0
        };
        FreightQuote {
            route: route.clone(),
            freight_cost: round_cents(base * (1.0 + jitter)),
            currency: self.catalog.currency().to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DEFAULT_BASE_RATE;

    #[test]
    fn zero_jitter_quotes_base_rate_exactly() {
        let quoter = SimulatedFreightCost::seeded(FreightCatalog::default(), 0.0, 1);
        assert_eq!(quoter.quote(&Route::from("Route A")).freight_cost, 15.5);
        assert_eq!(quoter.quote(&Route::from("Route B")).freight_cost, 18.2);
        assert_eq!(quoter.quote(&Route::from("Route X")).freight_cost, DEFAULT_BASE_RATE);
        assert_eq!(quoter.quote(&Route::from("Route A")).currency, "USD");
    }

    #[test]
    fn jitter_stays_inside_band_and_minor_units() {
        let quoter = SimulatedFreightCost::seeded(FreightCatalog::default(), 0.10, 42);
        let route = Route::from("Route D"); // base 20.0
        for _ in 0..500 {
            let cost = quoter.quote(&route).freight_cost;
            assert!((18.0..=22.0).contains(&cost), "cost {cost} outside +/-10% band");
            let cents = cost * 100.0;
            assert!((cents - cents.round()).abs() < 1e-9, "cost {cost} not minor-unit rounded");
        }
    }

    #[test]
    fn same_seed_reproduces_quote_stream() {
        let a = SimulatedFreightCost::seeded(FreightCatalog::default(), 0.10, 7);
        let b = SimulatedFreightCost::seeded(FreightCatalog::default(), 0.10, 7);
        let route = Route::from("Route C");
        for _ in 0..20 {
            assert_eq!(a.quote(&route).freight_cost, b.quote(&route).freight_cost);
        }
    }

    #[test]
    fn draws_vary_across_calls() {
        let quoter = SimulatedFreightCost::seeded(FreightCatalog::default(), 0.10, 99);
        let route = Route::from("Route B");
        let draws: Vec<f64> = (0..50).map(|_| quoter.quote(&route).freight_cost).collect();
        assert!(draws.iter().any(|c| *c != draws[0]), "jittered quotes never varied");
    }
}
