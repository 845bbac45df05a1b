//! HTTP client for the device snapshot endpoint.

use thiserror::Error;
use url::Url;

use super::measurement::{ActualSnapshot, Measurement};

/// Path of the snapshot endpoint, relative to the device base URL.
const ACTUAL_PATH: &str = "/api/v1/sm/actual";

/// Errors that can occur while fetching a device snapshot.
///
/// All variants mean the same thing to the scrape pipeline: no usable
/// snapshot exists for this request and the registry must be left
/// untouched.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level failure reaching the device.
    #[error("upstream request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The device answered with a non-success status.
    #[error("upstream returned status {0}")]
    Status(reqwest::StatusCode),

    /// The response body was not a valid snapshot.
    #[error("failed to decode upstream response: {0}")]
    Decode(String),
}

/// Client for one DSMR device.
///
/// Wraps a pooled `reqwest::Client` and the resolved snapshot endpoint.
/// One fetcher serves the whole process.
pub struct Fetcher {
    client: reqwest::Client,
    endpoint: Url,
}

impl Fetcher {
    /// Creates a fetcher for the device at `base_url`.
    ///
    /// No timeout is set beyond the transport defaults: some meters
    /// answer slowly and a slow read must still yield a valid scrape.
    /// A hung device blocks only the scrape that hit it, never the
    /// whole process.
    pub fn new(base_url: Url) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("dsmr-bridge/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let mut endpoint = base_url;
        endpoint.set_path(ACTUAL_PATH);

        Ok(Self { client, endpoint })
    }

    /// Fetches one fresh snapshot from the device.
    ///
    /// Exactly one GET per call. On any failure the error describes the
    /// stage that failed and no partial measurement list is returned.
    pub async fn fetch(&self) -> Result<Vec<Measurement>, FetchError> {
        let response = self.client.get(self.endpoint.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let snapshot: ActualSnapshot = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        Ok(snapshot.actual)
    }
}
