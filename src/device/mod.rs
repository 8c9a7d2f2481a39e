//! Device model
//!
//! A `Device` owns its engines, power domains, PSUs and temperature sensors
//! as plain vectors; everything else refers to them by position. Devices
//! are built in one pass and construction fails as a whole.

pub mod engine;
pub mod power;
pub mod process;
pub mod psu;
pub mod rate;
pub mod registry;
pub mod snapshot;
pub mod temperature;

pub use engine::Engine;
pub use power::PowerDomain;
pub use process::{CommandLineSource, ProcessMonitor, ProcfsCommandLine, MAX_PROCESSES};
pub use psu::Psu;
pub use rate::{RateKind, RateSampler};
pub use registry::{DeviceRegistry, Discovery};
pub use snapshot::DeviceSnapshot;
pub use temperature::TemperatureSensor;

use crate::domain::{DeviceProperties, MemoryUsage, PciProperties, ProcessList};
use crate::error::{DeviceInitError, EnumPhase, InitStage, SysmanError};
use crate::sysman::{DeviceHandle, MemoryHandle, Sysman};

use std::fmt;

/// Run a two-phase enumeration: count with no buffer, then fill
///
/// A failure in either phase is reported with that phase's stage.
pub fn enumerate<H, F>(
    stage: fn(EnumPhase) -> InitStage,
    mut call: F,
) -> Result<Vec<H>, DeviceInitError>
where
    H: Copy + Default,
    F: FnMut(&mut u32, Option<&mut [H]>) -> Result<(), SysmanError>,
{
    let mut count = 0u32;
    call(&mut count, None).map_err(|e| DeviceInitError::new(stage(EnumPhase::Count), e))?;
    if count == 0 {
        return Ok(Vec::new());
    }

    let mut handles = vec![H::default(); count as usize];
    call(&mut count, Some(&mut handles))
        .map_err(|e| DeviceInitError::new(stage(EnumPhase::Fill), e))?;
    handles.truncate(count as usize);
    Ok(handles)
}

/// Like `enumerate`, but an unsupported feature at the count phase means none
fn enumerate_optional<H, F>(
    stage: fn(EnumPhase) -> InitStage,
    call: F,
) -> Result<Vec<H>, DeviceInitError>
where
    H: Copy + Default,
    F: FnMut(&mut u32, Option<&mut [H]>) -> Result<(), SysmanError>,
{
    match enumerate(stage, call) {
        Err(e) if e.stage == stage(EnumPhase::Count) && e.source.is_unsupported_feature() => {
            log::debug!("{} not supported, treating as none", e.stage);
            Ok(Vec::new())
        }
        other => other,
    }
}

/// Identifies one owned sub-resource of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceId {
    Engine(usize),
    PowerDomain(usize),
    Psu(usize),
    TemperatureSensor(usize),
    Memory,
    Processes,
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Engine(i) => write!(f, "engine {}", i),
            Self::PowerDomain(i) => write!(f, "power domain {}", i),
            Self::Psu(i) => write!(f, "PSU {}", i),
            Self::TemperatureSensor(i) => write!(f, "temperature sensor {}", i),
            Self::Memory => write!(f, "memory"),
            Self::Processes => write!(f, "process list"),
        }
    }
}

/// A sub-resource whose refresh failed this tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshFailure {
    pub resource: ResourceId,
    pub error: SysmanError,
}

impl fmt::Display for RefreshFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.resource, self.error)
    }
}

/// One managed accelerator
#[derive(Debug)]
pub struct Device {
    handle: DeviceHandle,
    properties: DeviceProperties,
    pci: PciProperties,
    engines: Vec<Engine>,
    power_domains: Vec<PowerDomain>,
    psus: Vec<Psu>,
    temperature_sensors: Vec<TemperatureSensor>,
    memory_modules: Vec<MemoryHandle>,
    processes: ProcessMonitor,
}

impl Device {
    /// Query properties and enumerate every sub-resource
    pub fn new<S: Sysman + ?Sized>(
        sysman: &S,
        handle: DeviceHandle,
    ) -> Result<Self, DeviceInitError> {
        let properties = sysman
            .device_properties(handle)
            .map_err(|e| DeviceInitError::new(InitStage::Properties, e))?;
        let pci = sysman
            .pci_properties(handle)
            .map_err(|e| DeviceInitError::new(InitStage::PciProperties, e))?;

        let engines = enumerate(InitStage::EngineGroups, |count, out| {
            sysman.engine_groups(handle, count, out)
        })?
        .into_iter()
        .enumerate()
        .map(|(i, h)| {
            Engine::new(sysman, h).map_err(|e| DeviceInitError::new(InitStage::Engine(i), e))
        })
        .collect::<Result<Vec<_>, _>>()?;

        let power_domains = enumerate(InitStage::PowerDomains, |count, out| {
            sysman.power_domains(handle, count, out)
        })?
        .into_iter()
        .enumerate()
        .map(|(i, h)| {
            PowerDomain::new(sysman, h)
                .map_err(|e| DeviceInitError::new(InitStage::PowerDomain(i), e))
        })
        .collect::<Result<Vec<_>, _>>()?;

        let psus = enumerate_optional(InitStage::Psus, |count, out| {
            sysman.psus(handle, count, out)
        })?
        .into_iter()
        .enumerate()
        .map(|(i, h)| Psu::new(sysman, h).map_err(|e| DeviceInitError::new(InitStage::Psu(i), e)))
        .collect::<Result<Vec<_>, _>>()?;

        let memory_modules = enumerate_optional(InitStage::MemoryModules, |count, out| {
            sysman.memory_modules(handle, count, out)
        })?;

        let temperature_sensors = enumerate_optional(InitStage::TemperatureSensors, |count, out| {
            sysman.temperature_sensors(handle, count, out)
        })?
        .into_iter()
        .map(TemperatureSensor::new)
        .collect();

        log::debug!(
            "Device {}: {} engines, {} power domains, {} PSUs, {} memory modules",
            properties.pci_id(),
            engines.len(),
            power_domains.len(),
            psus.len(),
            memory_modules.len()
        );

        Ok(Self {
            handle,
            properties,
            pci,
            engines,
            power_domains,
            psus,
            temperature_sensors,
            memory_modules,
            processes: ProcessMonitor::new(),
        })
    }

    /// Replace the process monitor, e.g. to change its capacity
    pub fn with_process_monitor(mut self, monitor: ProcessMonitor) -> Self {
        self.processes = monitor;
        self
    }

    pub fn handle(&self) -> DeviceHandle {
        self.handle
    }

    pub fn properties(&self) -> &DeviceProperties {
        &self.properties
    }

    pub fn pci(&self) -> &PciProperties {
        &self.pci
    }

    pub fn engines(&self) -> &[Engine] {
        &self.engines
    }

    pub fn power_domains(&self) -> &[PowerDomain] {
        &self.power_domains
    }

    pub fn psus(&self) -> &[Psu] {
        &self.psus
    }

    pub fn temperature_sensors(&self) -> &[TemperatureSensor] {
        &self.temperature_sensors
    }

    pub fn memory_module_count(&self) -> usize {
        self.memory_modules.len()
    }

    /// Processes from the last successful refresh
    pub fn processes(&self) -> &ProcessList {
        self.processes.processes()
    }

    /// Sum free and total bytes over every memory module, live
    pub fn memory_usage<S: Sysman + ?Sized>(&self, sysman: &S) -> Result<MemoryUsage, SysmanError> {
        let mut usage = MemoryUsage::default();
        for module in &self.memory_modules {
            usage += sysman.memory_state(*module)?;
        }
        Ok(usage)
    }

    /// Read every temperature sensor
    pub fn refresh_temperatures<S: Sysman + ?Sized>(&mut self, sysman: &S) -> Vec<RefreshFailure> {
        let mut failures = Vec::new();
        for (i, sensor) in self.temperature_sensors.iter_mut().enumerate() {
            if let Err(error) = sensor.refresh(sysman) {
                failures.push(RefreshFailure {
                    resource: ResourceId::TemperatureSensor(i),
                    error,
                });
            }
        }
        failures
    }

    /// Recompute engine utilization and power, and re-read PSU state
    pub fn refresh_rates<S: Sysman + ?Sized>(&mut self, sysman: &S) -> Vec<RefreshFailure> {
        let mut failures = Vec::new();
        for (i, engine) in self.engines.iter_mut().enumerate() {
            if let Err(error) = engine.refresh(sysman) {
                failures.push(RefreshFailure {
                    resource: ResourceId::Engine(i),
                    error,
                });
            }
        }
        for (i, domain) in self.power_domains.iter_mut().enumerate() {
            if let Err(error) = domain.refresh(sysman) {
                failures.push(RefreshFailure {
                    resource: ResourceId::PowerDomain(i),
                    error,
                });
            }
        }
        for (i, psu) in self.psus.iter_mut().enumerate() {
            if let Err(error) = psu.refresh(sysman) {
                failures.push(RefreshFailure {
                    resource: ResourceId::Psu(i),
                    error,
                });
            }
        }
        failures
    }

    pub fn refresh_processes<S: Sysman + ?Sized>(
        &mut self,
        sysman: &S,
    ) -> Result<&ProcessList, SysmanError> {
        self.processes.refresh(sysman, self.handle)
    }

    /// One full tick: temperatures, then rates, then processes
    pub fn refresh<S: Sysman + ?Sized>(&mut self, sysman: &S) -> Vec<RefreshFailure> {
        let mut failures = self.refresh_temperatures(sysman);
        failures.extend(self.refresh_rates(sysman));
        if let Err(error) = self.refresh_processes(sysman) {
            failures.push(RefreshFailure {
                resource: ResourceId::Processes,
                error,
            });
        }
        failures
    }
}
