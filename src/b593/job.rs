//! CollectorJob: one full collection run
//!
//! Scrapes the router, reads signal and mode, builds the gauges and pushes
//! them in a single request. The first failure aborts the run and nothing
//! is pushed.

use std::time::Instant;

use crate::b593::RouterStatsCollector;
use crate::error::CollectorError;
use crate::metrics::{self, PushGateway, RunMetrics};
use crate::models::{mode_label, ScrapeResult};

pub struct CollectorJob {
    collector: RouterStatsCollector,
    gateway: PushGateway,
}

impl CollectorJob {
    pub fn new(collector: RouterStatsCollector, gateway: PushGateway) -> Self {
        Self { collector, gateway }
    }

    pub async fn run(&self) -> Result<ScrapeResult, CollectorError> {
        tracing::info!("[B593] Collecting from {}", self.collector.base_url());

        // 1. Browser scrape, timed
        let started = Instant::now();
        let scrape = self.collector.scrape().await?;
        let scrape_seconds = started.elapsed().as_secs_f64();
        tracing::info!(
            "[B593] Scraped {} fields in {:.2}s",
            scrape.len(),
            scrape_seconds
        );
        for (field, value) in scrape.iter() {
            tracing::debug!("[B593] {} = {}", field, value);
        }
        if let (Some(rssi), Some(rsrp), Some(rsrq)) =
            (scrape.get("rssi"), scrape.get("rsrp"), scrape.get("rsrq"))
        {
            tracing::info!("[B593] RSSI {} dBm, RSRP {} dBm, RSRQ {} dB", rssi, rsrp, rsrq);
        }

        // 2. Status codes
        let signal = self.collector.signal().await?;
        let mode = self.collector.mode().await?;
        tracing::info!(
            "[B593] Signal {}/5, mode {} ({})",
            signal,
            mode,
            mode_label(mode).unwrap_or("unknown")
        );

        // 3. Push
        let registry = metrics::build_registry(&RunMetrics {
            signal,
            mode,
            scrape_seconds,
            scrape: &scrape,
        })?;
        self.gateway.push_add(&registry).await?;

        Ok(scrape)
    }
}
