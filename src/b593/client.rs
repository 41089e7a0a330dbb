//! Huawei B593 web UI client
//!
//! Status codes come from a plain HTTP endpoint. Traffic counters and radio
//! quality are only visible in JavaScript-rendered pages, so those go through
//! a browser session.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use super::page;
use crate::browser::{BrowserLauncher, BrowserSession};
use crate::config::RouterConfig;
use crate::error::CollectorError;
use crate::models::{mode_label, signal_label, RouterStatus, ScrapeResult};

const STATUS_PATH: &str = "/index/getStatusByAjax.cgi";
const DIAGNOSE_PATH: &str = "/html/management/diagnose.asp";

/// `SIG` code the device shows as "off"; bars count up from here
const SIGNAL_OFFSET: i64 = 18;

// Element ids in the router UI
const USERNAME_INPUT: &str = "txt_Username";
const PASSWORD_INPUT: &str = "txt_Password";
const LOGIN_BUTTON: &str = "login_btn";
const MODEM_RADIO: &str = "id_modemRadio";
const FIRST_RADIO_ROW: &str = "tritem_3";

pub struct RouterStatsCollector {
    config: RouterConfig,
    base_url: String,
    http_client: Client,
    browser: Arc<dyn BrowserLauncher>,
    wait_timeout: Duration,
}

impl RouterStatsCollector {
    pub fn new(
        config: RouterConfig,
        browser: Arc<dyn BrowserLauncher>,
        wait_timeout: Duration,
    ) -> Result<Self, CollectorError> {
        let http_client = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            base_url: format!("http://{}", config.host),
            config,
            http_client,
            browser,
            wait_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ========================================================================
    // Status endpoint
    // ========================================================================

    /// Fetch the `<Status>` record
    pub async fn status(&self) -> Result<RouterStatus, CollectorError> {
        let url = format!("{}{}", self.base_url, STATUS_PATH);

        let body = self
            .http_client
            .post(&url)
            .send()
            .await
            .map_err(|e| CollectorError::Network(format!("Status request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| CollectorError::Network(format!("Status request failed: {}", e)))?
            .text()
            .await
            .map_err(|e| CollectorError::Network(format!("Status read failed: {}", e)))?;

        let status = page::parse_status(&body)?;
        if status.is_empty() {
            tracing::warn!("[B593] Status record is empty");
        } else {
            tracing::debug!("[B593] Status record has {} fields", status.len());
        }
        Ok(status)
    }

    /// Signal strength on the 0-5 scale the device displays. Codes outside
    /// the documented range are passed through as is.
    pub async fn signal(&self) -> Result<i64, CollectorError> {
        let code = self.status().await?.get_int("SIG")?;
        tracing::debug!(
            "[B593] SIG={} ({})",
            code,
            signal_label(code).unwrap_or("unknown")
        );
        Ok(code - SIGNAL_OFFSET)
    }

    /// Raw network mode code (e.g. 30 for 4G); see `mode_label`
    pub async fn mode(&self) -> Result<i64, CollectorError> {
        let code = self.status().await?.get_int("Mode")?;
        tracing::debug!(
            "[B593] Mode={} ({})",
            code,
            mode_label(code).unwrap_or("unknown")
        );
        Ok(code)
    }

    // ========================================================================
    // Browser scrape
    // ========================================================================

    /// Log in through the web UI and collect traffic and radio statistics.
    /// The browser session is closed whether or not the scrape succeeds.
    pub async fn scrape(&self) -> Result<ScrapeResult, CollectorError> {
        let mut session = self.browser.launch().await?;
        tracing::debug!("[B593] Browser session opened ({})", self.browser.name());

        let result = self.scrape_session(session.as_mut()).await;

        if let Err(e) = session.close().await {
            tracing::warn!("[B593] Failed to close browser session: {}", e);
        }

        result
    }

    async fn scrape_session(
        &self,
        session: &mut dyn BrowserSession,
    ) -> Result<ScrapeResult, CollectorError> {
        // 1. Login
        session.goto(&self.base_url).await?;
        session.fill(USERNAME_INPUT, &self.config.user).await?;
        session.fill(PASSWORD_INPUT, &self.config.password).await?;
        session.click(LOGIN_BUTTON).await?;

        // 2. Traffic counters from the home page script
        let home = session.source().await?;
        let traffic = page::extract_wan_statistics(&home)?;
        tracing::debug!("[B593] WanStatistics: {} fields", traffic.len());

        // 3. Modem table loads asynchronously after the radio click
        let diagnose_url = format!("{}{}", self.base_url, DIAGNOSE_PATH);
        session.goto(&diagnose_url).await?;
        session.click(MODEM_RADIO).await?;
        session.wait_for(FIRST_RADIO_ROW, self.wait_timeout).await?;

        let diagnostics = session.source().await?;
        let radio = page::extract_radio_quality(&diagnostics)?;

        Ok(ScrapeResult::merge(traffic, radio))
    }
}
