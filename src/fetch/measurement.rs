//! Wire types for the device's `actual` snapshot.

use serde::Deserialize;

/// One named measurement from the device snapshot.
///
/// The name encodes the conceptual metric and its discriminators by
/// string convention; see [`crate::classify`]. A non-numeric `Value`
/// fails the whole snapshot decode rather than defaulting, so
/// downstream code never sees a placeholder reading.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Measurement {
    /// Upstream measurement name, e.g. `voltage_l1`.
    pub name: String,
    /// Measured value, unit as reported by the meter. Never converted.
    pub value: f64,
    /// Unit string, informational only. Some firmware omits it.
    #[serde(default)]
    pub unit: String,
}

/// Response body of `GET /api/v1/sm/actual`.
///
/// Unknown sibling fields are ignored; the API grows fields across
/// firmware revisions.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ActualSnapshot {
    pub actual: Vec<Measurement>,
}
