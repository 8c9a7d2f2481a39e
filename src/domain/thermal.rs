//! Thermal domain types

use serde::Serialize;
use std::fmt;

/// Instantaneous sensor reading in degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
pub struct Temperature(f64);

impl Temperature {
    pub const fn new(celsius: f64) -> Self {
        Self(celsius)
    }

    pub fn is_high(&self) -> bool {
        self.0 >= 80.0
    }

    pub fn is_critical(&self) -> bool {
        self.0 >= 95.0
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°C", self.0)
    }
}

impl From<f64> for Temperature {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_thresholds() {
        let t = Temperature::new(85.5);
        assert!(t.is_high());
        assert!(!t.is_critical());
        assert_eq!(t.to_string(), "85.5°C");
        assert!(Temperature::from(99.0).is_critical());
    }
}
