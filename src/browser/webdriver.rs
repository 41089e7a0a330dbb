//! WebDriver browser sessions
//!
//! Connects to any W3C WebDriver server (chromedriver, geckodriver,
//! selenium) and requests a headless browser.

use std::time::Duration;

use async_trait::async_trait;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};

use super::{BrowserLauncher, BrowserSession};
use crate::config::WebDriverConfig;
use crate::error::CollectorError;

pub struct WebDriverLauncher {
    url: String,
    headless: bool,
}

impl WebDriverLauncher {
    pub fn new(config: &WebDriverConfig) -> Self {
        Self {
            url: config.url.clone(),
            headless: config.headless,
        }
    }

    fn capabilities(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut caps = serde_json::Map::new();
        if self.headless {
            caps.insert(
                "goog:chromeOptions".to_string(),
                serde_json::json!({ "args": ["--headless", "--disable-gpu", "--no-sandbox"] }),
            );
            caps.insert(
                "moz:firefoxOptions".to_string(),
                serde_json::json!({ "args": ["-headless"] }),
            );
        }
        caps
    }
}

#[async_trait]
impl BrowserLauncher for WebDriverLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, CollectorError> {
        let client = ClientBuilder::native()
            .capabilities(self.capabilities())
            .connect(&self.url)
            .await
            .map_err(|e| {
                CollectorError::Browser(format!("WebDriver session at {} failed: {}", self.url, e))
            })?;

        tracing::debug!("[Browser] Session started via {}", self.url);
        Ok(Box::new(WebDriverSession { client }))
    }

    fn name(&self) -> &'static str {
        "webdriver"
    }
}

pub struct WebDriverSession {
    client: Client,
}

impl WebDriverSession {
    async fn find(&self, id: &str) -> Result<fantoccini::elements::Element, CollectorError> {
        self.client
            .find(Locator::Id(id))
            .await
            .map_err(|e| command_error(&format!("find #{}", id), e))
    }
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    async fn goto(&mut self, url: &str) -> Result<(), CollectorError> {
        tracing::debug!("[Browser] goto {}", url);
        self.client
            .goto(url)
            .await
            .map_err(|e| command_error(&format!("goto {}", url), e))
    }

    async fn fill(&mut self, id: &str, value: &str) -> Result<(), CollectorError> {
        let elem = self.find(id).await?;
        elem.clear()
            .await
            .map_err(|e| command_error(&format!("clear #{}", id), e))?;
        elem.send_keys(value)
            .await
            .map_err(|e| command_error(&format!("type into #{}", id), e))
    }

    async fn click(&mut self, id: &str) -> Result<(), CollectorError> {
        let elem = self.find(id).await?;
        elem.click()
            .await
            .map_err(|e| command_error(&format!("click #{}", id), e))
    }

    async fn wait_for(&mut self, id: &str, timeout: Duration) -> Result<(), CollectorError> {
        self.client
            .wait()
            .at_most(timeout)
            .for_element(Locator::Id(id))
            .await
            .map(|_| ())
            .map_err(|e| match e {
                CmdError::WaitTimeout => CollectorError::Timeout(format!(
                    "#{} not present after {}s",
                    id,
                    timeout.as_secs_f64()
                )),
                other => command_error(&format!("wait for #{}", id), other),
            })
    }

    async fn source(&mut self) -> Result<String, CollectorError> {
        self.client
            .source()
            .await
            .map_err(|e| command_error("read page source", e))
    }

    async fn close(&mut self) -> Result<(), CollectorError> {
        self.client
            .clone()
            .close()
            .await
            .map_err(|e| command_error("close session", e))
    }
}

fn command_error(action: &str, e: CmdError) -> CollectorError {
    match e {
        CmdError::WaitTimeout => CollectorError::Timeout(action.to_string()),
        e if e.is_no_such_element() => {
            CollectorError::Extraction(format!("{}: element not found", action))
        }
        other => CollectorError::Browser(format!("{}: {}", action, other)),
    }
}
