//! Mock implementations for testing
//!
//! `MockSysman` is an in-memory driver with scripted counter samples and
//! per-call failure injection. All state lives in the instance.

use crate::domain::{
    CounterSample, DeviceProperties, DeviceUuid, EngineGroup, EngineProperties, MemoryState,
    PciAddress, PciProperties, PowerProperties, ProcessState, PsuProperties, PsuState,
};
use crate::error::SysmanError;
use crate::sysman::{
    DeviceHandle, DriverHandle, EngineHandle, MemoryHandle, PowerHandle, PsuHandle, ResultCode,
    Sysman, TempHandle,
};

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Entity handles pack the owning device index with the entity index
fn encode(device: usize, entity: usize) -> usize {
    ((device + 1) << 16) | entity
}

fn decode(handle: usize) -> (usize, usize) {
    ((handle >> 16) - 1, handle & 0xffff)
}

/// A counter that replays scripted samples, then repeats the last one
#[derive(Debug, Clone, Default)]
pub struct ScriptedCounter {
    samples: VecDeque<CounterSample>,
}

impl ScriptedCounter {
    pub fn new(samples: &[(u64, u64)]) -> Self {
        Self {
            samples: samples
                .iter()
                .map(|(v, t)| CounterSample::new(*v, *t))
                .collect(),
        }
    }

    fn next(&mut self) -> CounterSample {
        if self.samples.len() > 1 {
            self.samples.pop_front().unwrap_or_default()
        } else {
            self.samples.front().copied().unwrap_or_default()
        }
    }
}

/// One scripted engine
#[derive(Debug, Clone)]
pub struct MockEngine {
    pub properties: EngineProperties,
    pub activity: ScriptedCounter,
}

/// One scripted power domain
#[derive(Debug, Clone)]
pub struct MockPower {
    pub properties: PowerProperties,
    pub energy: ScriptedCounter,
}

/// Mock accelerator
#[derive(Debug, Clone)]
pub struct MockDevice {
    pub properties: DeviceProperties,
    pub pci: PciProperties,
    pub engines: Vec<MockEngine>,
    pub power: Vec<MockPower>,
    pub psus: Vec<(PsuProperties, PsuState)>,
    pub temperatures: Vec<f64>,
    pub memory: Vec<MemoryState>,
    pub processes: Vec<ProcessState>,
}

impl MockDevice {
    /// Device with one `ALL` engine, one power domain, one sensor and one
    /// memory module
    pub fn new(vendor_id: u32, device_id: u32) -> Self {
        Self {
            properties: DeviceProperties {
                vendor_id,
                device_id,
                model_name: format!("Mock {:04X}", device_id),
                ..Default::default()
            },
            pci: PciProperties::default(),
            engines: vec![MockEngine {
                properties: EngineProperties {
                    group: EngineGroup::All,
                    on_subdevice: false,
                    subdevice_id: 0,
                },
                activity: ScriptedCounter::new(&[(0, 1)]),
            }],
            power: vec![MockPower {
                properties: PowerProperties::default(),
                energy: ScriptedCounter::new(&[(0, 1)]),
            }],
            psus: Vec::new(),
            temperatures: vec![45.0],
            memory: vec![MemoryState {
                health: 1,
                free: 12 << 30,
                size: 16 << 30,
            }],
            processes: Vec::new(),
        }
    }

    pub fn with_bdf(mut self, bus: u32) -> Self {
        self.pci.address = PciAddress::new(0, bus, 0, 0);
        self
    }

    pub fn with_uuid(mut self, uuid: &str) -> Self {
        self.properties.uuid = uuid.parse::<DeviceUuid>().unwrap();
        self
    }

    /// Replace the engines with one engine per group, each replaying `samples`
    pub fn with_engines(mut self, groups: &[EngineGroup], samples: &[(u64, u64)]) -> Self {
        self.engines = groups
            .iter()
            .map(|group| MockEngine {
                properties: EngineProperties {
                    group: *group,
                    on_subdevice: false,
                    subdevice_id: 0,
                },
                activity: ScriptedCounter::new(samples),
            })
            .collect();
        self
    }

    pub fn with_energy(mut self, samples: &[(u64, u64)]) -> Self {
        for domain in &mut self.power {
            domain.energy = ScriptedCounter::new(samples);
        }
        self
    }

    pub fn with_psu(mut self, properties: PsuProperties, state: PsuState) -> Self {
        self.psus.push((properties, state));
        self
    }

    pub fn with_processes(mut self, processes: Vec<ProcessState>) -> Self {
        self.processes = processes;
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct Failure {
    code: ResultCode,
    fill_only: bool,
    remaining: Option<usize>,
}

#[derive(Debug, Default)]
struct State {
    devices: Vec<MockDevice>,
    failures: HashMap<&'static str, Failure>,
    calls: HashMap<&'static str, usize>,
}

/// Mock Sysman driver with a single driver handle
#[derive(Debug, Default)]
pub struct MockSysman {
    state: Mutex<State>,
}

impl MockSysman {
    pub fn new(devices: Vec<MockDevice>) -> Self {
        Self {
            state: Mutex::new(State {
                devices,
                ..Default::default()
            }),
        }
    }

    /// Fail every call to `call` with `code`
    pub fn fail(&self, call: &'static str, code: ResultCode) {
        self.insert_failure(call, code, false, None);
    }

    /// Fail only the fill phase of an enumeration
    pub fn fail_fill(&self, call: &'static str, code: ResultCode) {
        self.insert_failure(call, code, true, None);
    }

    /// Fail the next call to `call`, then succeed
    pub fn fail_once(&self, call: &'static str, code: ResultCode) {
        self.insert_failure(call, code, false, Some(1));
    }

    /// Number of times `call` was made
    pub fn calls(&self, call: &'static str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .get(call)
            .copied()
            .unwrap_or(0)
    }

    /// Edit a device's script between ticks
    pub fn with_device<R>(&self, index: usize, f: impl FnOnce(&mut MockDevice) -> R) -> R {
        f(&mut self.state.lock().unwrap().devices[index])
    }

    fn insert_failure(
        &self,
        call: &'static str,
        code: ResultCode,
        fill_only: bool,
        remaining: Option<usize>,
    ) {
        self.state.lock().unwrap().failures.insert(
            call,
            Failure {
                code,
                fill_only,
                remaining,
            },
        );
    }

    /// Record the call and return an injected failure, if any
    fn enter(&self, call: &'static str, filling: bool) -> Result<(), SysmanError> {
        let mut state = self.state.lock().unwrap();
        *state.calls.entry(call).or_insert(0) += 1;

        let Some(failure) = state.failures.get_mut(call) else {
            return Ok(());
        };
        if failure.fill_only && !filling {
            return Ok(());
        }
        let code = failure.code;
        if let Some(remaining) = failure.remaining.as_mut() {
            *remaining -= 1;
            if *remaining == 0 {
                state.failures.remove(call);
            }
        }
        Err(SysmanError::call(call, code))
    }

    fn enumerate<H>(
        &self,
        call: &'static str,
        available: usize,
        count: &mut u32,
        handles: Option<&mut [H]>,
        make: impl Fn(usize) -> H,
    ) -> Result<(), SysmanError> {
        self.enter(call, handles.is_some())?;
        match handles {
            None => *count = available as u32,
            Some(out) => {
                let n = available.min(*count as usize).min(out.len());
                for (i, slot) in out.iter_mut().take(n).enumerate() {
                    *slot = make(i);
                }
                *count = n as u32;
            }
        }
        Ok(())
    }

    fn device<R>(&self, handle: DeviceHandle, f: impl FnOnce(&mut MockDevice) -> R) -> R {
        f(&mut self.state.lock().unwrap().devices[handle.0 - 1])
    }

    fn entity<R>(&self, handle: usize, f: impl FnOnce(&mut MockDevice, usize) -> R) -> R {
        let (device, entity) = decode(handle);
        f(&mut self.state.lock().unwrap().devices[device], entity)
    }
}

impl Sysman for MockSysman {
    fn drivers(
        &self,
        count: &mut u32,
        handles: Option<&mut [DriverHandle]>,
    ) -> Result<(), SysmanError> {
        self.enumerate("zesDriverGet", 1, count, handles, |_| DriverHandle(1))
    }

    fn devices(
        &self,
        _driver: DriverHandle,
        count: &mut u32,
        handles: Option<&mut [DeviceHandle]>,
    ) -> Result<(), SysmanError> {
        let available = self.state.lock().unwrap().devices.len();
        self.enumerate("zesDeviceGet", available, count, handles, |i| {
            DeviceHandle(i + 1)
        })
    }

    fn device_properties(&self, device: DeviceHandle) -> Result<DeviceProperties, SysmanError> {
        self.enter("zesDeviceGetProperties", false)?;
        Ok(self.device(device, |d| d.properties.clone()))
    }

    fn pci_properties(&self, device: DeviceHandle) -> Result<PciProperties, SysmanError> {
        self.enter("zesDevicePciGetProperties", false)?;
        Ok(self.device(device, |d| d.pci))
    }

    fn engine_groups(
        &self,
        device: DeviceHandle,
        count: &mut u32,
        handles: Option<&mut [EngineHandle]>,
    ) -> Result<(), SysmanError> {
        let available = self.device(device, |d| d.engines.len());
        self.enumerate("zesDeviceEnumEngineGroups", available, count, handles, |i| {
            EngineHandle(encode(device.0 - 1, i))
        })
    }

    fn engine_properties(&self, engine: EngineHandle) -> Result<EngineProperties, SysmanError> {
        self.enter("zesEngineGetProperties", false)?;
        Ok(self.entity(engine.0, |d, i| d.engines[i].properties))
    }

    fn engine_activity(&self, engine: EngineHandle) -> Result<CounterSample, SysmanError> {
        self.enter("zesEngineGetActivity", false)?;
        Ok(self.entity(engine.0, |d, i| d.engines[i].activity.next()))
    }

    fn power_domains(
        &self,
        device: DeviceHandle,
        count: &mut u32,
        handles: Option<&mut [PowerHandle]>,
    ) -> Result<(), SysmanError> {
        let available = self.device(device, |d| d.power.len());
        self.enumerate("zesDeviceEnumPowerDomains", available, count, handles, |i| {
            PowerHandle(encode(device.0 - 1, i))
        })
    }

    fn power_properties(&self, power: PowerHandle) -> Result<PowerProperties, SysmanError> {
        self.enter("zesPowerGetProperties", false)?;
        Ok(self.entity(power.0, |d, i| d.power[i].properties))
    }

    fn energy_counter(&self, power: PowerHandle) -> Result<CounterSample, SysmanError> {
        self.enter("zesPowerGetEnergyCounter", false)?;
        Ok(self.entity(power.0, |d, i| d.power[i].energy.next()))
    }

    fn psus(
        &self,
        device: DeviceHandle,
        count: &mut u32,
        handles: Option<&mut [PsuHandle]>,
    ) -> Result<(), SysmanError> {
        let available = self.device(device, |d| d.psus.len());
        self.enumerate("zesDeviceEnumPsus", available, count, handles, |i| {
            PsuHandle(encode(device.0 - 1, i))
        })
    }

    fn psu_properties(&self, psu: PsuHandle) -> Result<PsuProperties, SysmanError> {
        self.enter("zesPsuGetProperties", false)?;
        Ok(self.entity(psu.0, |d, i| d.psus[i].0))
    }

    fn psu_state(&self, psu: PsuHandle) -> Result<PsuState, SysmanError> {
        self.enter("zesPsuGetState", false)?;
        Ok(self.entity(psu.0, |d, i| d.psus[i].1))
    }

    fn temperature_sensors(
        &self,
        device: DeviceHandle,
        count: &mut u32,
        handles: Option<&mut [TempHandle]>,
    ) -> Result<(), SysmanError> {
        let available = self.device(device, |d| d.temperatures.len());
        self.enumerate(
            "zesDeviceEnumTemperatureSensors",
            available,
            count,
            handles,
            |i| TempHandle(encode(device.0 - 1, i)),
        )
    }

    fn temperature(&self, sensor: TempHandle) -> Result<f64, SysmanError> {
        self.enter("zesTemperatureGetState", false)?;
        Ok(self.entity(sensor.0, |d, i| d.temperatures[i]))
    }

    fn memory_modules(
        &self,
        device: DeviceHandle,
        count: &mut u32,
        handles: Option<&mut [MemoryHandle]>,
    ) -> Result<(), SysmanError> {
        let available = self.device(device, |d| d.memory.len());
        self.enumerate("zesDeviceEnumMemoryModules", available, count, handles, |i| {
            MemoryHandle(encode(device.0 - 1, i))
        })
    }

    fn memory_state(&self, memory: MemoryHandle) -> Result<MemoryState, SysmanError> {
        self.enter("zesMemoryGetState", false)?;
        Ok(self.entity(memory.0, |d, i| d.memory[i]))
    }

    fn process_states(
        &self,
        device: DeviceHandle,
        count: &mut u32,
        states: &mut [ProcessState],
    ) -> Result<(), SysmanError> {
        let call = "zesDeviceProcessesGetState";
        let processes = self.device(device, |d| d.processes.clone());
        if let Err(e) = self.enter(call, true) {
            if e.is_invalid_size() {
                *count = processes.len() as u32;
            }
            return Err(e);
        }

        let capacity = (*count as usize).min(states.len());
        if processes.len() > capacity {
            // Fill what fits, report the full count
            for (slot, process) in states.iter_mut().zip(&processes).take(capacity) {
                *slot = *process;
            }
            *count = processes.len() as u32;
            return Err(SysmanError::call(call, ResultCode::ERROR_INVALID_SIZE));
        }
        for (slot, process) in states.iter_mut().zip(&processes) {
            *slot = *process;
        }
        *count = processes.len() as u32;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_counter_repeats_last() {
        let mut counter = ScriptedCounter::new(&[(1, 10), (2, 20)]);
        assert_eq!(counter.next(), CounterSample::new(1, 10));
        assert_eq!(counter.next(), CounterSample::new(2, 20));
        assert_eq!(counter.next(), CounterSample::new(2, 20));
    }

    #[test]
    fn test_two_phase_enumeration() {
        let mock = MockSysman::new(vec![MockDevice::new(0x8086, 0x56c0)]);
        let mut count = 0;
        mock.devices(DriverHandle(1), &mut count, None).unwrap();
        assert_eq!(count, 1);

        let mut handles = vec![DeviceHandle::default(); count as usize];
        mock.devices(DriverHandle(1), &mut count, Some(&mut handles))
            .unwrap();
        assert_eq!(handles[0], DeviceHandle(1));
    }

    #[test]
    fn test_fill_only_failure() {
        let mock = MockSysman::new(vec![MockDevice::new(0x8086, 0x56c0)]);
        mock.fail_fill("zesDeviceGet", ResultCode::ERROR_UNKNOWN);

        let mut count = 0;
        assert!(mock.devices(DriverHandle(1), &mut count, None).is_ok());
        let mut handles = vec![DeviceHandle::default(); count as usize];
        assert!(mock
            .devices(DriverHandle(1), &mut count, Some(&mut handles))
            .is_err());
        assert_eq!(mock.calls("zesDeviceGet"), 2);
    }

    #[test]
    fn test_fail_once_clears() {
        let mock = MockSysman::new(vec![MockDevice::new(0x8086, 0x56c0)]);
        mock.fail_once("zesDeviceGetProperties", ResultCode::ERROR_DEVICE_LOST);
        assert!(mock.device_properties(DeviceHandle(1)).is_err());
        assert!(mock.device_properties(DeviceHandle(1)).is_ok());
    }
}
