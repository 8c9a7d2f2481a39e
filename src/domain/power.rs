//! Power domain types

use serde::Serialize;
use std::fmt;

/// Static power domain properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PowerProperties {
    pub on_subdevice: bool,
    pub subdevice_id: u32,
    /// Software can change the power limits
    pub can_control: bool,
    /// Energy threshold events are supported
    pub energy_threshold_supported: bool,
    /// Factory default limit in milliwatts, -1 when unknown
    pub default_limit_mw: i32,
    pub min_limit_mw: i32,
    pub max_limit_mw: i32,
}

/// Average power in watts, derived from two energy samples
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
pub struct Watts(pub f64);

impl Watts {
    #[inline]
    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Watts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} W", self.0)
    }
}

/// Render a milliwatt limit, `N/A` when the driver does not know it
pub fn format_limit(mw: i32) -> String {
    if mw < 0 {
        "N/A".to_string()
    } else {
        format!("{:.1} W", mw as f64 / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watts_display() {
        assert_eq!(Watts(42.126).to_string(), "42.13 W");
        assert_eq!(Watts::default().as_f64(), 0.0);
    }

    #[test]
    fn test_format_limit() {
        assert_eq!(format_limit(-1), "N/A");
        assert_eq!(format_limit(150_000), "150.0 W");
    }
}
