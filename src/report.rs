// src/report.rs
use crate::catalog::commodity_label;
use crate::types::{EffectivePriceRecord, Forecast};

#[async_trait::async_trait]
pub trait ReportSink: Send + Sync + 'static {
    /// Publish a fitted history plus projection for one instrument.
    async fn publish_forecast(&self, forecast: &Forecast) -> anyhow::Result<()>;
    /// Publish the per-route landed cost table, in evaluation order.
    async fn publish_records(&self, symbol: &str, records: &[EffectivePriceRecord])
        -> anyhow::Result<()>;
    /// Publish the cheapest route for one instrument.
    async fn publish_best(&self, symbol: &str, best: &EffectivePriceRecord) -> anyhow::Result<()>;
}

/// Plain-text sink for interactive runs.
pub struct StdoutReport;

#[async_trait::async_trait]
impl ReportSink for StdoutReport {
    async fn publish_forecast(&self, forecast: &Forecast) -> anyhow::Result<()> {
        println!(
            "[FORECAST] {} {} history={} horizon={}",
            commodity_label(&forecast.symbol),
            forecast.interval,
            forecast.history_len,
            forecast.horizon()
        );
        for p in forecast.projected() {
            println!(
                "[FORECAST]   @{} est={:.2} band=[{:.2}, {:.2}]",
                p.ts_ms, p.estimate, p.lower, p.upper
            );
        }
        Ok(())
    }

    async fn publish_records(
        &self,
        symbol: &str,
        records: &[EffectivePriceRecord],
    ) -> anyhow::Result<()> {
        for r in records {
            println!(
                "[ROUTE] {} {} freight={:.2} commodity={:.2} effective={:.2} {}",
                symbol, r.route, r.freight_cost, r.commodity_price, r.effective_price, r.currency
            );
        }
        Ok(())
    }

    async fn publish_best(&self, symbol: &str, best: &EffectivePriceRecord) -> anyhow::Result<()> {
        println!(
            "[BEST] {} {} effective={:.2} {}",
            symbol, best.route, best.effective_price, best.currency
        );
        Ok(())
    }
}

/// Machine-readable sink: one JSON object per line, easy to pipe into jq or
/// a collector.
pub struct JsonReport;

#[async_trait::async_trait]
impl ReportSink for JsonReport {
    async fn publish_forecast(&self, forecast: &Forecast) -> anyhow::Result<()> {
        println!("{}", serde_json::json!({ "kind": "forecast", "forecast": forecast }));
        Ok(())
    }

    async fn publish_records(
        &self,
        symbol: &str,
        records: &[EffectivePriceRecord],
    ) -> anyhow::Result<()> {
        println!(
            "{}",
            serde_json::json!({ "kind": "routes", "symbol": symbol, "records": records })
        );
        Ok(())
    }

    async fn publish_best(&self, symbol: &str, best: &EffectivePriceRecord) -> anyhow::Result<()> {
        println!("{}", serde_json::json!({ "kind": "best", "symbol": symbol, "record": best }));
        Ok(())
    }
}
