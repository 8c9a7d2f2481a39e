//! Device discovery and lookup
//!
//! All drivers are enumerated once, then all devices of each driver. A
//! device that fails to build is reported and left out; the others remain
//! usable.

use crate::device::{enumerate, Device, ProcessMonitor};
use crate::error::{DeviceInitError, InitStage, SelectorError};
use crate::selector::{DeviceSelector, SelectorTarget};
use crate::sysman::{DriverHandle, Sysman};

/// Devices in discovery order
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: Vec<Device>,
}

/// Result of discovery: the usable devices plus any that failed to build
#[derive(Debug)]
pub struct Discovery {
    pub registry: DeviceRegistry,
    pub failures: Vec<DeviceInitError>,
}

impl DeviceRegistry {
    /// Enumerate every device of every driver
    ///
    /// Driver and device enumeration failures are fatal; a single device
    /// failing to construct is not.
    pub fn discover<S: Sysman + ?Sized>(sysman: &S) -> Result<Discovery, DeviceInitError> {
        Self::discover_with(sysman, ProcessMonitor::new)
    }

    /// Discover, giving each device a process monitor from `monitor`
    pub fn discover_with<S, F>(sysman: &S, monitor: F) -> Result<Discovery, DeviceInitError>
    where
        S: Sysman + ?Sized,
        F: Fn() -> ProcessMonitor,
    {
        let drivers: Vec<DriverHandle> =
            enumerate(InitStage::Drivers, |count, out| sysman.drivers(count, out))?;
        log::debug!("Found {} Sysman driver(s)", drivers.len());

        let mut devices = Vec::new();
        let mut failures = Vec::new();

        for driver in drivers {
            let handles = enumerate(InitStage::Devices, |count, out| {
                sysman.devices(driver, count, out)
            })?;

            for handle in handles {
                match Device::new(sysman, handle) {
                    Ok(device) => devices.push(device.with_process_monitor(monitor())),
                    Err(e) => {
                        log::warn!("Skipping device: {}", e);
                        failures.push(e);
                    }
                }
            }
        }

        Ok(Discovery {
            registry: Self { devices },
            failures,
        })
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn get(&self, index: usize) -> Option<&Device> {
        self.devices.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Device> {
        self.devices.get_mut(index)
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Device> {
        self.devices.iter_mut()
    }

    /// 0-based position of the first device matching `selector`
    pub fn find(&self, selector: &DeviceSelector) -> Result<usize, SelectorError> {
        let not_found = || SelectorError::NotFound(selector.input().to_string());

        match selector.target() {
            SelectorTarget::Invalid => Err(SelectorError::Invalid(selector.input().to_string())),
            SelectorTarget::Index(index) => {
                let index = *index as usize;
                if index >= 1 && index <= self.devices.len() {
                    Ok(index - 1)
                } else {
                    Err(not_found())
                }
            }
            SelectorTarget::PciId(pci_id) | SelectorTarget::RenderNode { pci_id, .. } => self
                .devices
                .iter()
                .position(|d| d.properties().pci_id() == *pci_id)
                .ok_or_else(not_found),
            SelectorTarget::Bdf(address) => self
                .devices
                .iter()
                .position(|d| d.pci().address == *address)
                .ok_or_else(not_found),
            SelectorTarget::Uuid(uuid) => self
                .devices
                .iter()
                .position(|d| d.properties().uuid == *uuid)
                .ok_or_else(not_found),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockDevice, MockSysman};
    use crate::sysman::ResultCode;
    use tempfile::TempDir;

    fn three_devices() -> MockSysman {
        MockSysman::new(vec![
            MockDevice::new(0x8086, 0x56c0)
                .with_bdf(3)
                .with_uuid("00000000-0000-0000-0000-000000000001"),
            MockDevice::new(0x8086, 0x56c1)
                .with_bdf(4)
                .with_uuid("00000000-0000-0000-0000-000000000002"),
            MockDevice::new(0x10de, 0x2684)
                .with_bdf(5)
                .with_uuid("00000000-0000-0000-0000-000000000003"),
        ])
    }

    fn registry(mock: &MockSysman) -> DeviceRegistry {
        let discovery = DeviceRegistry::discover(mock).unwrap();
        assert!(discovery.failures.is_empty());
        discovery.registry
    }

    fn find(registry: &DeviceRegistry, input: &str) -> Result<usize, SelectorError> {
        let drm = TempDir::new().unwrap();
        registry.find(&DeviceSelector::parse_with(input, drm.path()))
    }

    #[test]
    fn test_discovery_order() {
        let mock = three_devices();
        let registry = registry(&mock);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.devices()[2].properties().vendor_id, 0x10de);
    }

    #[test]
    fn test_find_by_mixed_case_pci_id() {
        let registry = registry(&three_devices());
        assert_eq!(find(&registry, "8086:56c1"), Ok(1));
    }

    #[test]
    fn test_find_by_index() {
        let registry = registry(&three_devices());
        assert_eq!(find(&registry, "2"), Ok(1));
        assert_eq!(find(&registry, "1"), Ok(0));
        assert_eq!(find(&registry, "3"), Ok(2));
    }

    #[test]
    fn test_index_out_of_range_is_not_found() {
        let registry = registry(&three_devices());
        assert_eq!(
            find(&registry, "0"),
            Err(SelectorError::NotFound("0".to_string()))
        );
        assert_eq!(
            find(&registry, "4"),
            Err(SelectorError::NotFound("4".to_string()))
        );
    }

    #[test]
    fn test_find_by_bdf() {
        let registry = registry(&three_devices());
        assert_eq!(find(&registry, "0000:0005:0000:0000"), Ok(2));
        assert!(matches!(
            find(&registry, "0000:0009:0000:0000"),
            Err(SelectorError::NotFound(_))
        ));
    }

    #[test]
    fn test_find_by_uuid() {
        let registry = registry(&three_devices());
        assert_eq!(find(&registry, "00000000-0000-0000-0000-000000000002"), Ok(1));
        assert!(find(&registry, "00000000-0000-0000-0000-000000000009").is_err());
    }

    #[test]
    fn test_unknown_pci_id_is_not_found() {
        let registry = registry(&three_devices());
        assert_eq!(
            find(&registry, "1002:744c"),
            Err(SelectorError::NotFound("1002:744c".to_string()))
        );
    }

    #[test]
    fn test_invalid_selector_is_distinct_from_not_found() {
        let registry = registry(&three_devices());
        assert_eq!(
            find(&registry, "bogus"),
            Err(SelectorError::Invalid("bogus".to_string()))
        );
    }

    #[test]
    fn test_failed_device_is_left_out() {
        let mock = three_devices();
        mock.fail_once("zesDeviceGetProperties", ResultCode::ERROR_DEVICE_LOST);

        let discovery = DeviceRegistry::discover(&mock).unwrap();
        assert_eq!(discovery.registry.len(), 2);
        assert_eq!(discovery.failures.len(), 1);
        assert_eq!(discovery.failures[0].stage, InitStage::Properties);
        assert_eq!(
            discovery.registry.devices()[0].properties().device_id,
            0x56c1
        );
    }

    #[test]
    fn test_device_enumeration_failure_is_fatal() {
        let mock = three_devices();
        mock.fail_fill("zesDeviceGet", ResultCode::ERROR_UNKNOWN);
        let err = DeviceRegistry::discover(&mock).unwrap_err();
        assert_eq!(
            err.stage,
            InitStage::Devices(crate::error::EnumPhase::Fill)
        );
    }
}
