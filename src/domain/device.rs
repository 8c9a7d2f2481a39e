//! Device property types
//!
//! Static properties reported once per device by the Sysman driver.

use crate::domain::{DeviceUuid, PciAddress, PciId};
use serde::Serialize;
use std::fmt;

/// Kind of accelerator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DeviceKind {
    Gpu,
    Cpu,
    Fpga,
    Mca,
    Vpu,
    Unknown(u32),
}

impl DeviceKind {
    /// Convert from the raw `zes_device_type_t` value
    pub fn from_raw(value: u32) -> Self {
        match value {
            1 => Self::Gpu,
            2 => Self::Cpu,
            3 => Self::Fpga,
            4 => Self::Mca,
            5 => Self::Vpu,
            other => Self::Unknown(other),
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu => write!(f, "GPU"),
            Self::Cpu => write!(f, "CPU"),
            Self::Fpga => write!(f, "FPGA"),
            Self::Mca => write!(f, "MCA"),
            Self::Vpu => write!(f, "VPU"),
            Self::Unknown(_) => write!(f, "UNKNOWN"),
        }
    }
}

/// Device property flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DeviceFlags {
    /// Integrated with the host
    pub integrated: bool,
    /// This handle is a sub-device
    pub sub_device: bool,
    /// Supports error correcting memory
    pub ecc: bool,
    /// Supports on-demand page faulting
    pub on_demand_paging: bool,
}

impl DeviceFlags {
    const INTEGRATED: u32 = 1 << 0;
    const SUBDEVICE: u32 = 1 << 1;
    const ECC: u32 = 1 << 2;
    const ONDEMANDPAGING: u32 = 1 << 3;

    /// Decode a raw `zes_device_property_flags_t` bitmask
    pub fn from_raw(bits: u32) -> Self {
        Self {
            integrated: bits & Self::INTEGRATED != 0,
            sub_device: bits & Self::SUBDEVICE != 0,
            ecc: bits & Self::ECC != 0,
            on_demand_paging: bits & Self::ONDEMANDPAGING != 0,
        }
    }
}

/// Static device properties
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DeviceProperties {
    pub vendor_id: u32,
    pub device_id: u32,
    pub kind: Option<DeviceKind>,
    pub flags: DeviceFlags,
    pub uuid: DeviceUuid,
    pub core_name: String,
    pub num_subdevices: u32,
    pub serial_number: String,
    pub board_number: String,
    pub brand_name: String,
    pub model_name: String,
    pub vendor_name: String,
    pub driver_version: String,
}

impl DeviceProperties {
    /// PCI vendor:device pair
    pub fn pci_id(&self) -> PciId {
        PciId::new(self.vendor_id, self.device_id)
    }

    /// Model name, falling back to the core device name
    pub fn display_name(&self) -> &str {
        if self.model_name.is_empty() {
            &self.core_name
        } else {
            &self.model_name
        }
    }
}

/// PCI properties of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PciProperties {
    pub address: PciAddress,
    /// Max link generation, -1 when unknown
    pub max_generation: i32,
    /// Max link width, -1 when unknown
    pub max_width: i32,
    /// Max bandwidth in bytes/sec, -1 when unknown
    pub max_bandwidth: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_kind_from_raw() {
        assert_eq!(DeviceKind::from_raw(1), DeviceKind::Gpu);
        assert_eq!(DeviceKind::from_raw(5), DeviceKind::Vpu);
        assert_eq!(DeviceKind::from_raw(99).to_string(), "UNKNOWN");
    }

    #[test]
    fn test_device_flags_from_raw() {
        let flags = DeviceFlags::from_raw(0b0101);
        assert!(flags.integrated);
        assert!(!flags.sub_device);
        assert!(flags.ecc);
        assert!(!flags.on_demand_paging);
    }

    #[test]
    fn test_display_name_fallback() {
        let mut props = DeviceProperties {
            core_name: "Intel(R) Graphics [0x56c0]".to_string(),
            ..Default::default()
        };
        assert_eq!(props.display_name(), "Intel(R) Graphics [0x56c0]");

        props.model_name = "Data Center GPU Flex 170".to_string();
        assert_eq!(props.display_name(), "Data Center GPU Flex 170");
        assert_eq!(props.pci_id(), PciId::new(0, 0));
    }
}
