//! The classification rules.
//!
//! Rules are checked in a fixed precedence order and a name matches at
//! most one rule. Names that match nothing are ignored by callers; the
//! upstream API adds fields over firmware revisions and unknown names
//! must not be treated as errors.

/// Direction of energy or power flow relative to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Drawn from the grid.
    Delivered,
    /// Fed back into the grid.
    Returned,
}

impl Direction {
    /// Label value in exposition output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Delivered => "delivered",
            Direction::Returned => "returned",
        }
    }
}

/// Tariff tier for cumulative energy counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tariff {
    /// Off-peak tier (tariff 1).
    Low,
    /// Peak tier (tariff 2).
    High,
}

impl Tariff {
    /// Label value in exposition output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tariff::Low => "low",
            Tariff::High => "high",
        }
    }
}

/// Metric family and label set derived from a measurement name.
///
/// Phase labels borrow from the input name; they are exactly the
/// stripped suffix, verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification<'a> {
    /// Instantaneous voltage on one electrical phase.
    Voltage {
        /// Phase identifier, e.g. `l1`.
        phase: &'a str,
    },
    /// Instantaneous power on one phase, in one direction.
    Power {
        /// Flow direction.
        direction: Direction,
        /// Phase identifier, e.g. `l1`.
        phase: &'a str,
    },
    /// Cumulative energy counter per direction and tariff.
    Energy {
        /// Flow direction.
        direction: Direction,
        /// Tariff tier.
        tariff: Tariff,
    },
    /// Cumulative gas counter, no labels.
    Gas,
}

/// Classifies a measurement name, or returns `None` for unknown names.
///
/// Precedence is fixed: voltage, power delivered, power returned,
/// energy, gas. The energy rule matches any name containing `energy_`;
/// its direction is `delivered` only if the name contains `_delivered_`
/// and its tariff is `high` only if the name ends with the character
/// `2`. The gas rule matches the exact name `gas_delivered` and nothing
/// else.
pub fn classify(name: &str) -> Option<Classification<'_>> {
    if let Some(phase) = name.strip_prefix("voltage_") {
        Some(Classification::Voltage { phase })
    } else if let Some(phase) = name.strip_prefix("power_delivered_") {
        Some(Classification::Power {
            direction: Direction::Delivered,
            phase,
        })
    } else if let Some(phase) = name.strip_prefix("power_returned_") {
        Some(Classification::Power {
            direction: Direction::Returned,
            phase,
        })
    } else if name.contains("energy_") {
        let direction = if name.contains("_delivered_") {
            Direction::Delivered
        } else {
            Direction::Returned
        };
        let tariff = if name.ends_with('2') {
            Tariff::High
        } else {
            Tariff::Low
        };
        Some(Classification::Energy { direction, tariff })
    } else if name == "gas_delivered" {
        Some(Classification::Gas)
    } else {
        None
    }
}
