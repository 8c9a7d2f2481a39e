//! Power supply types

use serde::Serialize;
use std::fmt;

/// PSU voltage status (`zes_psu_voltage_status_t`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum VoltageStatus {
    #[default]
    Unknown,
    Normal,
    Over,
    Under,
}

impl VoltageStatus {
    pub fn from_raw(value: u32) -> Self {
        match value {
            1 => Self::Normal,
            2 => Self::Over,
            3 => Self::Under,
            _ => Self::Unknown,
        }
    }

    pub fn is_fault(&self) -> bool {
        matches!(self, Self::Over | Self::Under)
    }
}

impl fmt::Display for VoltageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "UNKNOWN"),
            Self::Normal => write!(f, "NORMAL"),
            Self::Over => write!(f, "OVER"),
            Self::Under => write!(f, "UNDER"),
        }
    }
}

/// Static PSU properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PsuProperties {
    pub on_subdevice: bool,
    pub subdevice_id: u32,
    pub have_fan: bool,
    /// Amp limit, -1 when unknown
    pub amp_limit: i32,
}

/// Live PSU state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PsuState {
    pub voltage_status: VoltageStatus,
    pub fan_failed: bool,
    /// Celsius
    pub temperature: i32,
    /// Milliamps
    pub current: i32,
}
