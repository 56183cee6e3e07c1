// src/advisor.rs
use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;

use crate::config::AdvisorConfig;
use crate::forecast::holt::HoltWinters;
use crate::forecast::ForecastModel;
use crate::freight::{FreightQuoter, SimulatedFreightCost};
use crate::pricing::{PricingEngine, PricingError};
use crate::providers::{MarketDataSource, SourceError};
use crate::report::ReportSink;
use crate::routing::{rank, select_best, OptimizeError};
use crate::types::{EffectivePriceRecord, Forecast, Route};

#[derive(thiserror::Error, Debug)]
pub enum AdvisorError {
    #[error("market data: {0}")]
    Source(#[from] SourceError),
    #[error(transparent)]
    Pricing(#[from] PricingError),
    #[error(transparent)]
    Optimize(#[from] OptimizeError),
}

/// One instrument's answer for a single pass: the landed cost per route and
/// the cheapest pick. The forecast rides along when the history supports one.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub symbol: String,
    pub series_len: usize,
    pub forecast: Option<Forecast>,
    pub records: Vec<EffectivePriceRecord>,
    pub best: EffectivePriceRecord,
}

pub struct RouteAdvisor<S>
where
    S: ReportSink + Send + Sync + 'static,
{
    pub cfg: AdvisorConfig,
    pub sink: S,
    pub source: Arc<dyn MarketDataSource + Send + Sync>,
    routes: Vec<Route>,
    engine: PricingEngine,
    quoter: Box<dyn FreightQuoter>,
    model: Box<dyn ForecastModel>,
}

impl<S> RouteAdvisor<S>
where
    S: ReportSink + Send + Sync + 'static,
{
    pub fn new(cfg: AdvisorConfig, sink: S, source: Arc<dyn MarketDataSource + Send + Sync>) -> Self {
        let quoter = SimulatedFreightCost::new(cfg.catalog(), cfg.jitter_pct);
        Self::assemble(cfg, sink, source, Box::new(quoter))
    }

    /// Same assembly with a seeded freight stream, for replayable runs.
    pub fn seeded(
        cfg: AdvisorConfig,
        sink: S,
        source: Arc<dyn MarketDataSource + Send + Sync>,
        seed: u64,
    ) -> Self {
        let quoter = SimulatedFreightCost::seeded(cfg.catalog(), cfg.jitter_pct, seed);
        Self::assemble(cfg, sink, source, Box::new(quoter))
    }

    fn assemble(
        cfg: AdvisorConfig,
        sink: S,
        source: Arc<dyn MarketDataSource + Send + Sync>,
        quoter: Box<dyn FreightQuoter>,
    ) -> Self {
        Self {
            routes: cfg.route_list(),
            engine: PricingEngine::new(cfg.adjustment_factor),
            model: Box::new(HoltWinters::new(cfg.confidence)),
            cfg,
            sink,
            source,
            quoter,
        }
    }

    /// One full pass for one instrument: fetch, forecast, price, pick.
    pub async fn evaluate(&self, symbol: &str) -> Result<Evaluation, AdvisorError> {
        let series = self.source.history(symbol, self.cfg.period, self.cfg.interval).await?;

        #[cfg(feature = "metrics")]
        let fit_started = std::time::Instant::now();
        // The route pick never depends on the projection, so a history too
        // short or dirty to forecast downgrades to a warning.
        let forecast = match self.model.forecast(&series, self.cfg.horizon) {
            Ok(f) => {
                if let Err(e) = self.sink.publish_forecast(&f).await {
                    tracing::warn!("publish_forecast failed: {e:?}");
                }
                Some(f)
            }
            Err(e) => {
                tracing::warn!("forecast skipped for {symbol}: {e}");
                None
            }
        };
        #[cfg(feature = "metrics")]
        crate::metrics::FORECAST_LATENCY
            .with_label_values(&[self.cfg.interval.as_str()])
            .observe(fit_started.elapsed().as_secs_f64());

        let records = self.engine.effective_prices(&series, &self.routes, self.quoter.as_ref())?;
        tracing::debug!(
            "ranking for {symbol}: {}",
            rank(&records)
                .iter()
                .map(|r| format!("{}={:.2}", r.route, r.effective_price))
                .collect::<Vec<_>>()
                .join(", ")
        );
        let best = select_best(&records)?.clone();

        if let Err(e) = self.sink.publish_records(symbol, &records).await {
            tracing::warn!("publish_records failed: {e:?}");
        }
        if let Err(e) = self.sink.publish_best(symbol, &best).await {
            tracing::warn!("publish_best failed: {e:?}");
        }

        Ok(Evaluation { symbol: symbol.to_owned(), series_len: series.len(), forecast, records, best })
    }

    /// Evaluate every configured instrument concurrently. Failures are
    /// reported per symbol rather than aborting the pass.
    pub async fn evaluate_all(&self) -> Vec<(String, Result<Evaluation, AdvisorError>)> {
        let futs = self
            .cfg
            .instruments
            .iter()
            .map(|symbol| async move { (symbol.clone(), self.evaluate(symbol).await) });

        let results = join_all(futs).await;
        for (symbol, res) in &results {
            match res {
                Ok(_) => {
                    #[cfg(feature = "metrics")]
                    crate::metrics::EVALS_TOTAL.with_label_values(&[symbol.as_str()]).inc();
                }
                Err(e) => {
                    #[cfg(feature = "metrics")]
                    crate::metrics::REJECTS_TOTAL.with_label_values(&[stage(e)]).inc();
                    tracing::warn!("evaluation failed for {symbol}: {e}");
                }
            }
        }
        results
    }
}

#[cfg(feature = "metrics")]
fn stage(e: &AdvisorError) -> &'static str {
    match e {
        AdvisorError::Source(_) => "source",
        AdvisorError::Pricing(_) => "pricing",
        AdvisorError::Optimize(_) => "optimize",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::replay::ReplaySource;
    use crate::providers::synthetic::SyntheticSource;
    use crate::types::{Interval, Period};
    use std::num::NonZeroUsize;

    struct NullSink;

    #[async_trait::async_trait]
    impl ReportSink for NullSink {
        async fn publish_forecast(&self, _forecast: &Forecast) -> anyhow::Result<()> {
            Ok(())
        }
        async fn publish_records(
            &self,
            _symbol: &str,
            _records: &[EffectivePriceRecord],
        ) -> anyhow::Result<()> {
            Ok(())
        }
        async fn publish_best(
            &self,
            _symbol: &str,
            _best: &EffectivePriceRecord,
        ) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn flat_config() -> AdvisorConfig {
        AdvisorConfig {
            instruments: vec!["CL=F".into(), "GC=F".into()],
            period: Period::ThreeMonths,
            interval: Interval::Daily,
            horizon: NonZeroUsize::new(5).expect("non-zero"),
            jitter_pct: 0.0,
            ..AdvisorConfig::default()
        }
    }

    fn advisor(cfg: AdvisorConfig) -> RouteAdvisor<NullSink> {
        let source = Arc::new(SyntheticSource::anchored(17, 1_700_000_000_000));
        RouteAdvisor::seeded(cfg, NullSink, source, 17)
    }

    #[tokio::test]
    async fn evaluation_prices_every_route_in_order() {
        let advisor = advisor(flat_config());
        let eval = advisor.evaluate("CL=F").await.expect("evaluation");
        assert_eq!(eval.series_len, 66);
        let got: Vec<&str> = eval.records.iter().map(|r| r.route.name()).collect();
        assert_eq!(got, ["Route A", "Route B", "Route C", "Route D"]);
    }

    #[tokio::test]
    async fn best_is_the_cheapest_record() {
        let advisor = advisor(flat_config());
        let eval = advisor.evaluate("CL=F").await.expect("evaluation");
        // Flat quotes follow the rate card, so Route C wins.
        assert_eq!(eval.best.route.name(), "Route C");
        let min = eval
            .records
            .iter()
            .map(|r| r.effective_price)
            .fold(f64::INFINITY, f64::min);
        assert_eq!(eval.best.effective_price, min);
    }

    #[tokio::test]
    async fn forecast_spans_history_plus_horizon() {
        let advisor = advisor(flat_config());
        let eval = advisor.evaluate("GC=F").await.expect("evaluation");
        let forecast = eval.forecast.expect("forecast");
        assert_eq!(forecast.points.len(), eval.series_len + 5);
    }

    #[tokio::test]
    async fn missing_tape_surfaces_as_source_error() {
        let advisor = RouteAdvisor::seeded(
            flat_config(),
            NullSink,
            Arc::new(ReplaySource::new()),
            17,
        );
        let err = advisor.evaluate("CL=F").await.unwrap_err();
        assert!(matches!(err, AdvisorError::Source(SourceError::NoData { .. })));
    }

    #[tokio::test]
    async fn pass_covers_every_instrument() {
        let advisor = advisor(flat_config());
        let results = advisor.evaluate_all().await;
        let symbols: Vec<&str> = results.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(symbols, ["CL=F", "GC=F"]);
        assert!(results.iter().all(|(_, r)| r.is_ok()));
    }
}
