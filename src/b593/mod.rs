//! Huawei B593 LTE router integration module
//!
//! - `client`: Status endpoint and browser scrape (`RouterStatsCollector`)
//! - `page`: Parsers for the status XML, script literal and modem table
//! - `job`: One collection run, from scrape to push

pub mod client;
pub mod job;
pub mod page;

#[cfg(test)]
pub(crate) mod fixtures;

pub use client::RouterStatsCollector;
pub use job::CollectorJob;
