//! Data models for the B593 exporter

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::error::CollectorError;

// ============================================================================
// Router Status
// ============================================================================

/// Fields of the `<Status>` record returned by `getStatusByAjax.cgi`.
///
/// The set of keys depends on firmware, so it is kept as a plain map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterStatus {
    fields: HashMap<String, String>,
}

impl RouterStatus {
    pub fn new(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Read a field as an integer status code
    pub fn get_int(&self, key: &str) -> Result<i64, CollectorError> {
        let raw = self
            .get(key)
            .ok_or_else(|| CollectorError::Parse(format!("status field {} missing", key)))?;

        raw.trim().parse::<i64>().map_err(|_| {
            CollectorError::Parse(format!("status field {} is not numeric: {:?}", key, raw))
        })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Device display label for a raw `SIG` code (18 = off, 19..=23 = bars)
pub fn signal_label(code: i64) -> Option<&'static str> {
    match code {
        18 => Some("off"),
        19 => Some("1"),
        20 => Some("2"),
        21 => Some("3"),
        22 => Some("4"),
        23 => Some("5"),
        _ => None,
    }
}

/// Network mode label for a raw `Mode` code
pub fn mode_label(code: i64) -> Option<&'static str> {
    match code {
        27 => Some("off"),
        28 | 60 => Some("2g"),
        29 | 61 => Some("3g"),
        30 | 62 => Some("4g"),
        59 => Some("sim_disabled"),
        _ => None,
    }
}

// ============================================================================
// Scrape Result
// ============================================================================

/// A scraped value: traffic counters arrive as integers, radio readings
/// are kept as the text shown in the diagnostics table.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrapeValue {
    Integer(u64),
    Text(String),
}

impl ScrapeValue {
    /// Numeric value for a gauge
    pub fn as_f64(&self) -> Result<f64, CollectorError> {
        match self {
            ScrapeValue::Integer(n) => Ok(*n as f64),
            ScrapeValue::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| CollectorError::Parse(format!("value {:?} is not numeric", s))),
        }
    }
}

impl fmt::Display for ScrapeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrapeValue::Integer(n) => write!(f, "{}", n),
            ScrapeValue::Text(s) => f.write_str(s),
        }
    }
}

/// Flat result of one browser scrape: WanStatistics fields plus radio quality
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapeResult {
    values: BTreeMap<String, ScrapeValue>,
}

impl ScrapeResult {
    /// Merge traffic statistics and radio readings; radio keys win on collision
    pub fn merge(
        traffic: BTreeMap<String, ScrapeValue>,
        radio: BTreeMap<String, ScrapeValue>,
    ) -> Self {
        let mut values = traffic;
        values.extend(radio);
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&ScrapeValue> {
        self.values.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ScrapeValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
