//! Parsers for the documents the B593 web UI serves
//!
//! - status XML from `getStatusByAjax.cgi`
//! - the `WanStatistics` object literal embedded in the home page
//! - the modem table on the diagnostics page

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use scraper::{Html, Selector};

use crate::error::CollectorError;
use crate::models::{RouterStatus, ScrapeValue};

/// Diagnostics table rows and the metric name each one feeds
pub const RADIO_ROWS: [(&str, &str); 3] = [
    ("tritem_3", "rssi"),
    ("tritem_4", "rsrp"),
    ("tritem_5", "rsrq"),
];

// ============================================================================
// Status XML
// ============================================================================

/// Parse the status document into the children of its `<Status>` record.
///
/// ```xml
/// <?xml version="1.0" encoding="UTF-8"?>
/// <Status><SIG>21</SIG><Mode>30</Mode><Roam>0</Roam></Status>
/// ```
pub fn parse_status(xml: &str) -> Result<RouterStatus, CollectorError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut fields = HashMap::new();
    let mut depth = 0usize;
    let mut in_status = false;
    let mut seen_status = false;
    let mut current: Option<String> = None;
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                depth += 1;
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if depth == 1 && name == "Status" {
                    in_status = true;
                    seen_status = true;
                } else if depth == 2 && in_status {
                    current = Some(name);
                    text.clear();
                }
            }
            Ok(Event::Empty(e)) => {
                if depth == 0 && e.name().as_ref() == b"Status" {
                    seen_status = true;
                } else if depth == 1 && in_status {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    fields.insert(name, String::new());
                }
            }
            Ok(Event::Text(e)) => {
                if current.is_some() && depth == 2 {
                    let value = e
                        .unescape()
                        .map_err(|e| CollectorError::Parse(format!("status XML: {}", e)))?;
                    text.push_str(&value);
                }
            }
            Ok(Event::CData(e)) => {
                if current.is_some() && depth == 2 {
                    text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::End(_)) => {
                if depth == 2 {
                    if let Some(name) = current.take() {
                        fields.insert(name, std::mem::take(&mut text));
                    }
                } else if depth == 1 {
                    in_status = false;
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(CollectorError::Parse(format!(
                    "status XML at byte {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
        }
    }

    if depth != 0 {
        return Err(CollectorError::Parse("status XML is truncated".to_string()));
    }
    if !seen_status {
        return Err(CollectorError::Parse(
            "status XML has no <Status> record".to_string(),
        ));
    }

    Ok(RouterStatus::new(fields))
}

// ============================================================================
// WanStatistics literal
// ============================================================================

fn wan_statistics_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"WanStatistics = (\{.+\});").expect("WanStatistics pattern is valid")
    })
}

/// Pull the traffic counters out of the rendered home page.
///
/// The page carries a line like
/// `WanStatistics = {'uprate' : '51736' , 'downrate' : '389680' , ...};`
/// which becomes JSON once the single quotes are swapped for double quotes.
/// Counter values arrive as strings and are decoded to integers.
pub fn extract_wan_statistics(
    source: &str,
) -> Result<BTreeMap<String, ScrapeValue>, CollectorError> {
    let literal = wan_statistics_pattern()
        .captures(source)
        .and_then(|c| c.get(1))
        .ok_or_else(|| {
            CollectorError::Extraction("WanStatistics not found in page source".to_string())
        })?
        .as_str()
        .replace('\'', "\"");

    let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&literal)
        .map_err(|e| CollectorError::Extraction(format!("WanStatistics is malformed: {}", e)))?;

    object
        .into_iter()
        .map(|(key, value)| {
            let number = match &value {
                serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
                serde_json::Value::Number(n) => n.as_u64(),
                _ => None,
            };
            number
                .map(|n| (key.clone(), ScrapeValue::Integer(n)))
                .ok_or_else(|| {
                    CollectorError::Extraction(format!(
                        "WanStatistics field {} is not a counter: {}",
                        key, value
                    ))
                })
        })
        .collect()
}

// ============================================================================
// Diagnostics table
// ============================================================================

/// Read RSSI, RSRP and RSRQ from the modem table (third cell of each row).
/// Values are kept as the text the router renders, e.g. `-48.0`.
pub fn extract_radio_quality(
    source: &str,
) -> Result<BTreeMap<String, ScrapeValue>, CollectorError> {
    let document = Html::parse_document(source);
    let cell = Selector::parse("td")
        .map_err(|e| CollectorError::Extraction(format!("cell selector: {}", e)))?;

    let mut values = BTreeMap::new();
    for (row_id, metric) in RADIO_ROWS {
        let row_selector = Selector::parse(&format!("#{}", row_id))
            .map_err(|e| CollectorError::Extraction(format!("row selector: {}", e)))?;

        let row = document.select(&row_selector).next().ok_or_else(|| {
            CollectorError::Extraction(format!("row {} not found in diagnostics table", row_id))
        })?;

        let text = row
            .select(&cell)
            .nth(2)
            .map(|td| td.text().collect::<String>())
            .ok_or_else(|| {
                CollectorError::Extraction(format!("row {} has fewer than three cells", row_id))
            })?;

        values.insert(metric.to_string(), ScrapeValue::Text(text.trim().to_string()));
    }

    Ok(values)
}
