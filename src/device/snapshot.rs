//! Immutable view of a device for renderers
//!
//! Renderers only ever see a `DeviceSnapshot`, never a live `Device`.

use crate::device::Device;
use crate::domain::{
    DeviceProperties, EngineGroup, MemoryUsage, PciProperties, PowerProperties, ProcessList,
    PsuProperties, PsuState, Temperature, Watts,
};
use crate::sysman::Sysman;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineSnapshot {
    pub group: EngineGroup,
    pub on_subdevice: bool,
    pub subdevice_id: u32,
    /// Unclamped percentage
    pub utilization: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerSnapshot {
    pub properties: PowerProperties,
    pub power: Watts,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PsuSnapshot {
    pub properties: PsuProperties,
    pub state: PsuState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceSnapshot {
    /// 1-based position in discovery order
    pub index: usize,
    pub properties: DeviceProperties,
    pub pci: PciProperties,
    pub engines: Vec<EngineSnapshot>,
    pub power_domains: Vec<PowerSnapshot>,
    pub psus: Vec<PsuSnapshot>,
    /// One entry per sensor; `None` until it has been read
    pub temperatures: Vec<Option<Temperature>>,
    /// `None` when the memory state could not be read
    pub memory: Option<MemoryUsage>,
    pub processes: ProcessList,
}

impl DeviceSnapshot {
    /// Copy the derived values out of `device`; memory is read live
    pub fn capture<S: Sysman + ?Sized>(index: usize, device: &Device, sysman: &S) -> Self {
        let memory = match device.memory_usage(sysman) {
            Ok(usage) => Some(usage),
            Err(e) => {
                log::debug!("Device {}: memory state unavailable: {}", index, e);
                None
            }
        };

        Self {
            index,
            properties: device.properties().clone(),
            pci: *device.pci(),
            engines: device
                .engines()
                .iter()
                .map(|engine| EngineSnapshot {
                    group: engine.properties().group,
                    on_subdevice: engine.properties().on_subdevice,
                    subdevice_id: engine.properties().subdevice_id,
                    utilization: engine.utilization(),
                })
                .collect(),
            power_domains: device
                .power_domains()
                .iter()
                .map(|domain| PowerSnapshot {
                    properties: *domain.properties(),
                    power: domain.power(),
                })
                .collect(),
            psus: device
                .psus()
                .iter()
                .map(|psu| PsuSnapshot {
                    properties: *psu.properties(),
                    state: *psu.state(),
                })
                .collect(),
            temperatures: device
                .temperature_sensors()
                .iter()
                .map(|sensor| sensor.reading())
                .collect(),
            memory,
            processes: device.processes().clone(),
        }
    }

    /// Sum of all power domains
    pub fn total_power(&self) -> Watts {
        Watts(self.power_domains.iter().map(|p| p.power.as_f64()).sum())
    }

    /// Hottest sensor reading, if any sensor has been read
    pub fn max_temperature(&self) -> Option<Temperature> {
        self.temperatures
            .iter()
            .flatten()
            .copied()
            .fold(None, |max, t| match max {
                Some(m) if m >= t => Some(m),
                _ => Some(t),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EngineGroup;
    use crate::mock::{MockDevice, MockSysman};
    use crate::sysman::{DeviceHandle, ResultCode};

    #[test]
    fn test_capture_copies_derived_values() {
        let mock = MockSysman::new(vec![MockDevice::new(0x8086, 0x56c0)
            .with_engines(&[EngineGroup::RenderSingle], &[(1000, 1000), (1500, 2000)])
            .with_energy(&[(1_000_000, 1_000_000), (31_000_000, 2_000_000)])]);
        let mut device = Device::new(&mock, DeviceHandle(1)).unwrap();
        device.refresh(&mock);

        let snapshot = DeviceSnapshot::capture(1, &device, &mock);
        assert_eq!(snapshot.engines[0].group, EngineGroup::RenderSingle);
        assert_eq!(snapshot.engines[0].utilization, 50.0);
        assert_eq!(snapshot.total_power(), Watts(30.0));
        assert_eq!(snapshot.max_temperature(), Some(Temperature::new(45.0)));
        assert!(snapshot.memory.is_some());
    }

    #[test]
    fn test_memory_failure_is_none() {
        let mock = MockSysman::new(vec![MockDevice::new(0x8086, 0x56c0)]);
        let device = Device::new(&mock, DeviceHandle(1)).unwrap();
        mock.fail("zesMemoryGetState", ResultCode::ERROR_UNKNOWN);

        let snapshot = DeviceSnapshot::capture(1, &device, &mock);
        assert_eq!(snapshot.memory, None);
        assert_eq!(snapshot.max_temperature(), None);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mock = MockSysman::new(vec![MockDevice::new(0x8086, 0x56c0)]);
        let device = Device::new(&mock, DeviceHandle(1)).unwrap();
        let snapshot = DeviceSnapshot::capture(1, &device, &mock);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["index"], 1);
        assert_eq!(json["engines"][0]["group"], "ALL");
    }
}
