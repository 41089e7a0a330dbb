//! b593-exporter - Huawei B593 router statistics exporter
//!
//! Logs into the router web UI, scrapes signal, mode, traffic and radio
//! quality, and pushes them to a Prometheus push gateway. Runs once per
//! invocation; schedule it with cron or a systemd timer.

mod b593;
mod browser;
mod config;
mod error;
mod metrics;
mod models;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::b593::{CollectorJob, RouterStatsCollector};
use crate::browser::WebDriverLauncher;
use crate::metrics::PushGateway;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "b593_exporter=info".into()),
        )
        .init();

    // Load configuration
    let config = config::Config::load()?;
    tracing::info!(
        "Configuration loaded (router {}, webdriver {}, push gateway {})",
        config.router.host,
        config.webdriver.url,
        config.pushgateway.url
    );

    let launcher = Arc::new(WebDriverLauncher::new(&config.webdriver));
    let collector = RouterStatsCollector::new(
        config.router,
        launcher,
        Duration::from_secs(config.webdriver.wait_timeout_secs),
    )?;
    let gateway = PushGateway::new(&config.pushgateway)?;

    let scrape = CollectorJob::new(collector, gateway).run().await?;
    tracing::info!(
        "Run complete: pushed {}",
        scrape.keys().collect::<Vec<_>>().join(", ")
    );

    Ok(())
}
