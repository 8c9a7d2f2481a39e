//! Monotonic counter samples

use serde::Serialize;

/// One reading of a monotonically increasing hardware counter
///
/// `value` is active time for engines or energy in microjoules for power
/// domains. `timestamp` is in microseconds, in the same clock as `value`
/// for engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CounterSample {
    pub value: u64,
    pub timestamp: u64,
}

impl CounterSample {
    pub const fn new(value: u64, timestamp: u64) -> Self {
        Self { value, timestamp }
    }
}
