//! Gauge families and registry wiring.

use prometheus::{Encoder, Gauge, GaugeVec, Opts, Registry, TextEncoder};
use thiserror::Error;

use crate::classify::{classify, Classification};
use crate::fetch::Measurement;

/// Namespace prefix for every exported metric.
const NAMESPACE: &str = "dsmr";

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Gauge registration or text encoding failed.
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// Prometheus registry for the meter gauge families.
///
/// Created once at startup and shared across all scrape handlers. The
/// prometheus crate makes individual gauge reads and writes atomic;
/// there is no cross-family consistency beyond that, and concurrent
/// scrapes resolve per label combination as last-write-wins.
pub struct MeterMetrics {
    registry: Registry,

    voltage: GaugeVec,
    power: GaugeVec,
    energy_transported: GaugeVec,
    gas_delivered: Gauge,
}

impl MeterMetrics {
    /// Creates the registry with all four gauge families registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let voltage = GaugeVec::new(
            Opts::new("voltage", "Current voltage in V").namespace(NAMESPACE),
            &["phase"],
        )?;
        let power = GaugeVec::new(
            Opts::new("power", "Current power delivery in kW").namespace(NAMESPACE),
            &["direction", "phase"],
        )?;
        let energy_transported = GaugeVec::new(
            Opts::new("energy_transported", "Energy total in kWh").namespace(NAMESPACE),
            &["direction", "tariff"],
        )?;
        let gas_delivered = Gauge::with_opts(
            Opts::new("gas_delivered", "Gas delivered in m3").namespace(NAMESPACE),
        )?;

        registry.register(Box::new(voltage.clone()))?;
        registry.register(Box::new(power.clone()))?;
        registry.register(Box::new(energy_transported.clone()))?;
        registry.register(Box::new(gas_delivered.clone()))?;

        Ok(Self {
            registry,
            voltage,
            power,
            energy_transported,
            gas_delivered,
        })
    }

    /// Applies one snapshot of measurements to the gauges.
    ///
    /// Each measurement is classified by name and upserted into its
    /// family; unknown names are skipped. Values are written as-is with
    /// no unit conversion. This never fails: the snapshot was already
    /// validated during decode.
    pub fn apply(&self, measurements: &[Measurement]) {
        for m in measurements {
            match classify(&m.name) {
                Some(Classification::Voltage { phase }) => {
                    self.voltage.with_label_values(&[phase]).set(m.value);
                }
                Some(Classification::Power { direction, phase }) => {
                    self.power
                        .with_label_values(&[direction.as_str(), phase])
                        .set(m.value);
                }
                Some(Classification::Energy { direction, tariff }) => {
                    self.energy_transported
                        .with_label_values(&[direction.as_str(), tariff.as_str()])
                        .set(m.value);
                }
                Some(Classification::Gas) => {
                    self.gas_delivered.set(m.value);
                }
                None => {
                    tracing::debug!(name = %m.name, "ignoring unknown measurement");
                }
            }
        }
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
