//! Error handling module

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for CollectorError {
    fn from(e: reqwest::Error) -> Self {
        CollectorError::Network(e.to_string())
    }
}
