//! Prometheus registry for the meter gauge families.
//!
//! Four gauge families exist, fixed at startup under the `dsmr`
//! namespace:
//!
//! - `dsmr_voltage{phase}` - instantaneous voltage per phase
//! - `dsmr_power{direction, phase}` - instantaneous power per phase and
//!   direction
//! - `dsmr_energy_transported{direction, tariff}` - cumulative energy
//!   counters
//! - `dsmr_gas_delivered` - cumulative gas counter
//!
//! The registry is the only shared mutable state in the process. Values
//! are overwritten on every scrape and never reset in between.

mod registry;

pub use registry::{MeterMetrics, MetricsError};
