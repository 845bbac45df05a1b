//! Classification of upstream measurement names into metric families.
//!
//! DSMR loggers report a flat list of loosely named measurements. The
//! names encode both the conceptual metric and its discriminators
//! (phase letter, direction, tariff tier) by string convention. This
//! module turns such a name into a fixed, well-typed metric family with
//! labels.
//!
//! The naming convention is an external contract fixed by the device
//! firmware, quirks included. The rules here must match it exactly and
//! must not be normalized or "improved".

mod rules;

pub use rules::{classify, Classification, Direction, Tariff};
