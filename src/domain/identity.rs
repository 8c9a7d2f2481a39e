//! Device identity types
//!
//! PCI vendor:device pairs, PCI topological addresses and the 16-byte
//! device UUID. Equality is exact, full-width comparison.

use crate::error::DomainError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// PCI vendor and device id pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct PciId {
    pub vendor: u32,
    pub device: u32,
}

impl PciId {
    pub const fn new(vendor: u32, device: u32) -> Self {
        Self { vendor, device }
    }
}

impl fmt::Display for PciId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}:{:04X}", self.vendor, self.device)
    }
}

/// PCI address as domain:bus:device:function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct PciAddress {
    pub domain: u32,
    pub bus: u32,
    pub device: u32,
    pub function: u32,
}

impl PciAddress {
    pub const fn new(domain: u32, bus: u32, device: u32, function: u32) -> Self {
        Self {
            domain,
            bus,
            device,
            function,
        }
    }
}

impl fmt::Display for PciAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04X}:{:04X}:{:04X}:{:04X}",
            self.domain, self.bus, self.device, self.function
        )
    }
}

/// Number of bytes in a device UUID
pub const UUID_SIZE: usize = 16;

/// Offsets of the dashes in the canonical 8-4-4-4-12 form
const UUID_DASHES: [usize; 4] = [8, 13, 18, 23];

/// 16-byte device UUID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DeviceUuid([u8; UUID_SIZE]);

impl DeviceUuid {
    pub const fn from_bytes(bytes: [u8; UUID_SIZE]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; UUID_SIZE] {
        &self.0
    }

    /// Whether `s` has the canonical 8-4-4-4-12 hex layout
    pub fn is_canonical(s: &str) -> bool {
        let bytes = s.as_bytes();
        bytes.len() == 36
            && bytes.iter().enumerate().all(|(i, b)| {
                if UUID_DASHES.contains(&i) {
                    *b == b'-'
                } else {
                    b.is_ascii_hexdigit()
                }
            })
    }
}

impl FromStr for DeviceUuid {
    type Err = DomainError;

    /// Parse the canonical form; dash positions must match exactly
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !Self::is_canonical(s) {
            return Err(DomainError::InvalidUuid(s.to_string()));
        }

        let digits: Vec<u8> = s.bytes().filter(|b| *b != b'-').collect();
        let mut bytes = [0u8; UUID_SIZE];
        for (slot, pair) in bytes.iter_mut().zip(digits.chunks_exact(2)) {
            let text = std::str::from_utf8(pair)
                .map_err(|_| DomainError::InvalidUuid(s.to_string()))?;
            *slot = u8::from_str_radix(text, 16)
                .map_err(|_| DomainError::InvalidUuid(s.to_string()))?;
        }

        Ok(Self(bytes))
    }
}

impl fmt::Display for DeviceUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            write!(f, "{:02X}", byte)?;
            if matches!(i, 3 | 5 | 7 | 9) {
                write!(f, "-")?;
            }
        }
        Ok(())
    }
}

impl Serialize for DeviceUuid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pci_id_display() {
        assert_eq!(PciId::new(0x8086, 0x56c0).to_string(), "8086:56C0");
    }

    #[test]
    fn test_pci_address_display() {
        let addr = PciAddress::new(0, 0x3, 0, 0);
        assert_eq!(addr.to_string(), "0000:0003:0000:0000");
    }

    #[test]
    fn test_uuid_round_trip_canonicalizes_to_uppercase() {
        let input = "8086a0e4-0c00-0000-0300-000000000000";
        let uuid: DeviceUuid = input.parse().unwrap();
        assert_eq!(uuid.as_bytes()[0], 0x80);
        assert_eq!(uuid.as_bytes()[3], 0xe4);
        assert_eq!(uuid.to_string(), input.to_uppercase());
    }

    #[test]
    fn test_uuid_rejects_misplaced_dashes() {
        assert!("8086a0e40-c00-0000-0300-000000000000"
            .parse::<DeviceUuid>()
            .is_err());
        assert!("8086a0e40c0000000300000000000000"
            .parse::<DeviceUuid>()
            .is_err());
        assert!("8086a0e4-0c00-0000-0300-00000000000g"
            .parse::<DeviceUuid>()
            .is_err());
    }

    #[test]
    fn test_uuid_equality_is_full_width() {
        let a: DeviceUuid = "00000000-0000-0000-0000-000000000001".parse().unwrap();
        let b: DeviceUuid = "00000000-0000-0000-0000-000000000002".parse().unwrap();
        assert_ne!(a, b);
        assert_eq!(a, DeviceUuid::from_bytes(*a.as_bytes()));
    }
}
