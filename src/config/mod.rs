//! Runtime configuration.
//!
//! One setting is required: the base URL of the DSMR device API. It is
//! read from the `--base-url` flag or the `DSMR_BASE_URL` environment
//! variable and validated before any listener binds; a missing or
//! unparseable value is a startup error, never a runtime panic.

use clap::Parser;
use thiserror::Error;
use url::Url;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Base URL of the DSMR device API, e.g. http://10.0.0.5
    #[arg(long, env = "DSMR_BASE_URL")]
    pub base_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Configuration validation errors.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// No base URL was given via flag or environment.
    #[error("base URL is not set; pass --base-url or set DSMR_BASE_URL")]
    MissingBaseUrl,
    /// The given base URL did not parse.
    #[error("invalid base URL {0:?}: {1}")]
    InvalidBaseUrl(String, String),
}

/// Validated bridge configuration.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Base URL of the upstream device API.
    pub base_url: Url,
}

impl BridgeConfig {
    /// Validates raw arguments into a usable configuration.
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let raw = match args.base_url.as_deref() {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return Err(ConfigError::MissingBaseUrl),
        };

        let base_url = Url::parse(raw)
            .map_err(|e| ConfigError::InvalidBaseUrl(raw.to_string(), e.to_string()))?;

        Ok(Self { base_url })
    }
}
