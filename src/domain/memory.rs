//! Memory domain types
//!
//! Per-module state and the device-wide aggregate recomputed on demand.

use serde::Serialize;
use std::fmt;
use std::ops::AddAssign;

/// Live state of one memory module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoryState {
    /// Raw `zes_mem_health_t`
    pub health: u32,
    pub free: u64,
    pub size: u64,
}

/// Free and total bytes summed over every module of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MemoryUsage {
    pub free: u64,
    pub total: u64,
}

impl MemoryUsage {
    pub fn used(&self) -> u64 {
        self.total.saturating_sub(self.free)
    }

    /// Used memory as a percentage of total, 0 when total is unknown
    pub fn used_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.used() as f64 * 100.0 / self.total as f64
        }
    }
}

impl AddAssign<MemoryState> for MemoryUsage {
    fn add_assign(&mut self, state: MemoryState) {
        self.free = self.free.saturating_add(state.free);
        self.total = self.total.saturating_add(state.size);
    }
}

impl fmt::Display for MemoryUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} free",
            format_bytes(self.free),
            format_bytes(self.total)
        )
    }
}

/// Human-readable byte count using binary units
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
