//! Browser automation capability
//!
//! - `webdriver`: W3C WebDriver implementation (fantoccini)
//!
//! The router renders its pages with client-side JavaScript, so scraping goes
//! through a real browser. Everything the scraper needs is expressed by
//! `BrowserSession`; tests substitute a scripted session.

pub mod webdriver;

pub use webdriver::WebDriverLauncher;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::CollectorError;

/// An open browser session
#[async_trait]
pub trait BrowserSession: Send {
    /// Navigate to a URL and wait for the page load
    async fn goto(&mut self, url: &str) -> Result<(), CollectorError>;

    /// Clear the input with the given element id and type `value` into it
    async fn fill(&mut self, id: &str, value: &str) -> Result<(), CollectorError>;

    /// Click the element with the given id
    async fn click(&mut self, id: &str) -> Result<(), CollectorError>;

    /// Block until an element with the given id is present, or fail with
    /// `CollectorError::Timeout` once `timeout` has elapsed
    async fn wait_for(&mut self, id: &str, timeout: Duration) -> Result<(), CollectorError>;

    /// Rendered page source of the current document
    async fn source(&mut self) -> Result<String, CollectorError>;

    /// End the session and release the browser
    async fn close(&mut self) -> Result<(), CollectorError>;
}

/// Starts browser sessions
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, CollectorError>;

    /// Get the launcher name
    fn name(&self) -> &'static str;
}
