// src/pricing.rs
use crate::freight::FreightQuoter;
use crate::types::{round_cents, EffectivePriceRecord, PriceSeries, Route};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    #[error("price series {symbol} has no observations")]
    EmptySeries { symbol: String },
}

/// Combines the latest commodity close with a freight quote per route.
///
/// `adjustment_factor` scales the freight leg before it is added, covering
/// surcharges or rebates negotiated on top of the published rate.
#[derive(Debug, Clone, Copy)]
pub struct PricingEngine {
    pub adjustment_factor: f64,
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self { adjustment_factor: 1.0 }
    }
}

impl PricingEngine {
    pub fn new(adjustment_factor: f64) -> Self {
        Self { adjustment_factor }
    }

    /// One record per requested route, in the order the routes were given.
    pub fn effective_prices(
        &self,
        series: &PriceSeries,
        routes: &[Route],
        quoter: &dyn FreightQuoter,
    ) -> Result<Vec<EffectivePriceRecord>, PricingError> {
        let latest = series.latest().ok_or_else(|| PricingError::EmptySeries {
            symbol: series.symbol().to_owned(),
        })?;
        let commodity_price = round_cents(latest.close);
        let records = routes
            .iter()
            .map(|route| {
                let quote = quoter.quote(route);
                let effective_price =
                    round_cents(commodity_price + quote.freight_cost * self.adjustment_factor);
                EffectivePriceRecord {
                    route: quote.route,
                    freight_cost: quote.freight_cost,
                    commodity_price,
                    effective_price,
                    currency: quote.currency,
                }
            })
            .collect();
        Ok(records)
    }
}
