//! DSMR Bridge Library
//!
//! A pull-based Prometheus bridge for DSMR smart-meter devices. On each
//! inbound scrape the bridge fetches the device's current measurement
//! snapshot over HTTP, reclassifies the flat name/value list into four
//! labelled gauge families, updates an in-process registry, and renders
//! it in text exposition format.
//!
//! # Architecture
//!
//! Per scrape request, strictly ordered:
//!
//! ```text
//! fetch → classify/apply → render
//! ```
//!
//! # Design Principles
//!
//! - **Per-request failure**: a flaky device read fails that scrape
//!   with a server-error status; it never terminates the process or
//!   partially updates the registry
//! - **Exact upstream contract**: classification preserves the device's
//!   quirky naming conventions verbatim, including the trailing-`2`
//!   tariff rule
//! - **No ambient state**: the registry is constructed once and
//!   injected; gauge updates rely only on the prometheus crate's
//!   per-gauge atomicity
//!
//! # Example
//!
//! ```no_run
//! use dsmr_bridge::{fetch::Fetcher, metrics::MeterMetrics, server::BridgeServer};
//! use url::Url;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let base_url = Url::parse("http://10.0.0.5")?;
//! let fetcher = Fetcher::new(base_url)?;
//! let metrics = MeterMetrics::new()?;
//!
//! BridgeServer::new(fetcher, metrics).run().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod classify;
pub mod config;
pub mod fetch;
pub mod metrics;
pub mod server;

// Re-export commonly used types at crate root
pub use classify::{classify, Classification, Direction, Tariff};
pub use config::{Args, BridgeConfig, ConfigError};
pub use fetch::{FetchError, Fetcher, Measurement};
pub use metrics::{MeterMetrics, MetricsError};
pub use server::{BridgeServer, LISTEN_PORT};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
