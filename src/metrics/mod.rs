//! Prometheus gauges for one B593 collection run
//!
//! All metrics use the `b593_` prefix. Scrape fields become one gauge each,
//! named after the field (`b593_uprate`, `b593_rssi`, ...).

pub mod pushgateway;

pub use pushgateway::PushGateway;

use prometheus::{Gauge, Opts, Registry};

use crate::error::CollectorError;
use crate::models::ScrapeResult;

const PREFIX: &str = "b593";

/// Values gathered by one run
#[derive(Debug, Clone)]
pub struct RunMetrics<'a> {
    pub signal: i64,
    pub mode: i64,
    pub scrape_seconds: f64,
    pub scrape: &'a ScrapeResult,
}

fn register_gauge(
    registry: &Registry,
    name: &str,
    help: &str,
    value: f64,
) -> Result<Gauge, CollectorError> {
    let gauge = Gauge::with_opts(Opts::new(format!("{}_{}", PREFIX, name), help))?;
    gauge.set(value);
    registry.register(Box::new(gauge.clone()))?;
    Ok(gauge)
}

/// Build a fresh registry holding every gauge of a run
pub fn build_registry(run: &RunMetrics<'_>) -> Result<Registry, CollectorError> {
    let registry = Registry::new();

    register_gauge(
        &registry,
        "signal",
        "Huawei B593 signal strength (0-5, as displayed on the device)",
        run.signal as f64,
    )?;
    register_gauge(
        &registry,
        "mode",
        "Huawei B593 signal mode (2g/3g/4g)",
        run.mode as f64,
    )?;
    register_gauge(
        &registry,
        "scrapetime",
        "time to scrape and parse all infos",
        run.scrape_seconds,
    )?;

    if run.scrape.is_empty() {
        tracing::warn!("[B593] No scrape fields; pushing status gauges only");
    }
    for (field, value) in run.scrape.iter() {
        register_gauge(
            &registry,
            field,
            &format!("Huawei B593 {}", field),
            value.as_f64()?,
        )?;
    }

    Ok(registry)
}

/// Value of an unlabelled sample in text exposition output
#[cfg(test)]
pub(crate) fn sample_value(exposition: &str, name: &str) -> Option<f64> {
    exposition
        .lines()
        .filter(|line| !line.starts_with('#'))
        .find_map(|line| line.strip_prefix(name)?.strip_prefix(' ')?.trim().parse().ok())
}
