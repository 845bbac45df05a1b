//! Upstream device client.
//!
//! DSMR loggers expose their current meter snapshot over a small HTTP
//! API. Each Prometheus scrape triggers exactly one fresh read of that
//! snapshot; there are no retries and no caching across scrapes.

mod client;
mod measurement;

pub use client::{FetchError, Fetcher};
pub use measurement::Measurement;
