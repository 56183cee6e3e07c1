// src/metrics.rs
use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, register_histogram_vec, IntCounterVec, HistogramVec};

pub static EVALS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "advisor_evaluations_total", "Instrument evaluations completed", &["symbol"]
    ).unwrap()
});

pub static REJECTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "advisor_rejects_total", "Evaluations aborted", &["stage"] // source|pricing|optimize
    ).unwrap()
});

pub static FORECAST_LATENCY: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "advisor_forecast_latency_seconds",
        "Model fit plus projection latency",
        &["interval"], // 1d|1wk|1mo
        vec![0.001, 0.002, 0.005, 0.01, 0.02, 0.05, 0.1]
    ).unwrap()
});
