// src/bin/route_daemon.rs
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use landed::advisor::RouteAdvisor;
use landed::config::{self, AdvisorConfig};
use landed::providers::replay::ReplaySource;
use landed::providers::synthetic::SyntheticSource;
use landed::providers::MarketDataSource;
use landed::report::{JsonReport, ReportSink, StdoutReport};

#[derive(Parser, Debug)]
#[command(name = "route_daemon", about = "Landed-cost route advisor over commodity close histories")]
struct Args {
    /// TOML config file; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Comma-separated instrument symbols, e.g. "CL=F,GC=F".
    #[arg(long)]
    instruments: Option<String>,
    /// Lookback period: 1mo, 3mo, 6mo or 1y.
    #[arg(long)]
    period: Option<String>,
    /// Sampling interval: 1d, 1wk or 1mo.
    #[arg(long)]
    interval: Option<String>,
    /// Projection steps past the end of the history.
    #[arg(long)]
    horizon: Option<usize>,
    /// Replay *.json snapshots from this directory instead of synthesizing.
    #[arg(long)]
    replay: Option<PathBuf>,
    /// Seed for the synthetic tape and the freight jitter stream.
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Emit JSON lines instead of text.
    #[arg(long)]
    json: bool,
    /// Run a single pass and exit.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => AdvisorConfig::load(path)?,
        None => AdvisorConfig::default(),
    };
    if let Some(list) = &args.instruments {
        cfg.instruments =
            list.split(',').map(|s| s.trim().to_owned()).filter(|s| !s.is_empty()).collect();
    }
    if let Some(period) = &args.period {
        cfg.period = period.parse()?;
    }
    if let Some(interval) = &args.interval {
        cfg.interval = interval.parse()?;
    }
    if let Some(horizon) = args.horizon {
        cfg.horizon = NonZeroUsize::new(horizon)
            .ok_or_else(|| anyhow::anyhow!("horizon must be positive"))?;
    }
    cfg.validate()?;

    let source: Arc<dyn MarketDataSource + Send + Sync> = match &args.replay {
        Some(dir) => Arc::new(ReplaySource::load_dir(dir)?),
        None => Arc::new(SyntheticSource::new(args.seed)),
    };

    tracing::info!(
        "advising {} instrument(s) over {} at {}, horizon {}",
        cfg.instruments.len(),
        cfg.period,
        cfg.interval,
        cfg.horizon
    );

    if args.json {
        run(RouteAdvisor::seeded(cfg, JsonReport, source, args.seed), args.once).await
    } else {
        run(RouteAdvisor::seeded(cfg, StdoutReport, source, args.seed), args.once).await
    }
}

async fn run<S>(advisor: RouteAdvisor<S>, once: bool) -> anyhow::Result<()>
where
    S: ReportSink + Send + Sync + 'static,
{
    if once {
        advisor.evaluate_all().await;
        return Ok(());
    }
    let mut ticker = tokio::time::interval(config::ms(advisor.cfg.poll_ms));
    loop {
        ticker.tick().await;
        advisor.evaluate_all().await;
    }
}
