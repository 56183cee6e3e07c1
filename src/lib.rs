// src/lib.rs
pub mod types;
pub mod catalog;
pub mod config;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod report;
pub mod providers;
pub mod freight;
pub mod forecast;
pub mod pricing;
pub mod routing;
pub mod advisor;
