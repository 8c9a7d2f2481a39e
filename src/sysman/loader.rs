//! Level Zero loader
//!
//! Production `Sysman` implementation. `libze_loader` is opened at runtime
//! with `libloading` and every entry point is resolved once, so a missing
//! loader is a normal startup error rather than a link failure.

use crate::domain::{
    CounterSample, DeviceFlags, DeviceKind, DeviceProperties, DeviceUuid, EngineGroup,
    EngineProperties, EngineTypeFlags, MemoryState, PciAddress, PciProperties, PowerProperties,
    ProcessState, PsuProperties, PsuState, VoltageStatus,
};
use crate::error::SysmanError;
use crate::sysman::ffi::{self, c_string, zes_handle_t};
use crate::sysman::traits::{
    DeviceHandle, DriverHandle, EngineHandle, MemoryHandle, PowerHandle, PsuHandle, Sysman,
    TempHandle,
};
use crate::sysman::ResultCode;
use libloading::{Library, Symbol};
use std::ffi::c_void;
use std::ptr;

const LIBRARY_NAMES: &[&str] = &["libze_loader.so.1", "libze_loader.so"];

fn check(call: &'static str, raw: ffi::ze_result_t) -> Result<(), SysmanError> {
    ResultCode::check(raw).map_err(|code| SysmanError::call(call, code))
}

#[inline]
fn raw(handle: usize) -> zes_handle_t {
    handle as zes_handle_t
}

/// Resolved entry points
struct Api {
    driver_get: ffi::zesDriverGet_t,
    device_get: ffi::EnumFn,
    device_get_properties: ffi::zesDeviceGetProperties_t,
    pci_get_properties: ffi::zesDevicePciGetProperties_t,
    enum_engine_groups: ffi::EnumFn,
    engine_get_properties: ffi::zesEngineGetProperties_t,
    engine_get_activity: ffi::zesEngineGetActivity_t,
    enum_power_domains: ffi::EnumFn,
    power_get_properties: ffi::zesPowerGetProperties_t,
    power_get_energy_counter: ffi::zesPowerGetEnergyCounter_t,
    enum_psus: ffi::EnumFn,
    psu_get_properties: ffi::zesPsuGetProperties_t,
    psu_get_state: ffi::zesPsuGetState_t,
    enum_temperature_sensors: ffi::EnumFn,
    temperature_get_state: ffi::zesTemperatureGetState_t,
    enum_memory_modules: ffi::EnumFn,
    memory_get_state: ffi::zesMemoryGetState_t,
    processes_get_state: ffi::zesDeviceProcessesGetState_t,
}

/// Copy a function pointer out of the library
///
/// # Safety
/// `T` must match the C signature of `name`.
unsafe fn symbol<T: Copy>(library: &Library, name: &str) -> Result<T, SysmanError> {
    let sym: Symbol<T> = library
        .get(name.as_bytes())
        .map_err(|e| SysmanError::SymbolNotFound(format!("{}: {}", name, e)))?;
    Ok(*sym)
}

impl Api {
    unsafe fn resolve(library: &Library) -> Result<Self, SysmanError> {
        Ok(Self {
            driver_get: symbol(library, "zesDriverGet")?,
            device_get: symbol(library, "zesDeviceGet")?,
            device_get_properties: symbol(library, "zesDeviceGetProperties")?,
            pci_get_properties: symbol(library, "zesDevicePciGetProperties")?,
            enum_engine_groups: symbol(library, "zesDeviceEnumEngineGroups")?,
            engine_get_properties: symbol(library, "zesEngineGetProperties")?,
            engine_get_activity: symbol(library, "zesEngineGetActivity")?,
            enum_power_domains: symbol(library, "zesDeviceEnumPowerDomains")?,
            power_get_properties: symbol(library, "zesPowerGetProperties")?,
            power_get_energy_counter: symbol(library, "zesPowerGetEnergyCounter")?,
            enum_psus: symbol(library, "zesDeviceEnumPsus")?,
            psu_get_properties: symbol(library, "zesPsuGetProperties")?,
            psu_get_state: symbol(library, "zesPsuGetState")?,
            enum_temperature_sensors: symbol(library, "zesDeviceEnumTemperatureSensors")?,
            temperature_get_state: symbol(library, "zesTemperatureGetState")?,
            enum_memory_modules: symbol(library, "zesDeviceEnumMemoryModules")?,
            memory_get_state: symbol(library, "zesMemoryGetState")?,
            processes_get_state: symbol(library, "zesDeviceProcessesGetState")?,
        })
    }
}

/// Sysman session backed by the system Level Zero loader
pub struct LevelZero {
    api: Api,
    // Keeps the resolved entry points mapped
    _library: Library,
}

impl LevelZero {
    /// Open the loader, resolve entry points and call `zesInit(0)`
    pub fn new() -> Result<Self, SysmanError> {
        let library = Self::open()?;

        // SAFETY: the aliases in `ffi` mirror the loader's exported signatures
        let api = unsafe { Api::resolve(&library)? };
        let init: ffi::zesInit_t = unsafe { symbol(&library, "zesInit")? };
        check("zesInit", unsafe { init(0) })?;

        log::debug!("Level Zero Sysman initialized");
        Ok(Self {
            api,
            _library: library,
        })
    }

    fn open() -> Result<Library, SysmanError> {
        let mut last_error = String::new();
        for name in LIBRARY_NAMES {
            // SAFETY: loading the vendor loader runs only its own initializers
            match unsafe { Library::new(name) } {
                Ok(library) => {
                    log::debug!("Loaded {}", name);
                    return Ok(library);
                }
                Err(e) => last_error = e.to_string(),
            }
        }
        Err(SysmanError::LibraryNotFound(last_error))
    }

    /// Shared body of every `zesDeviceEnum*` call
    fn enumerate<H>(
        &self,
        call: &'static str,
        func: ffi::EnumFn,
        parent: zes_handle_t,
        count: &mut u32,
        handles: Option<&mut [H]>,
        wrap: fn(usize) -> H,
    ) -> Result<(), SysmanError> {
        match handles {
            None => check(call, unsafe { func(parent, count, ptr::null_mut()) }),
            Some(out) => {
                let requested = (*count as usize).min(out.len());
                let mut buffer: Vec<zes_handle_t> = vec![ptr::null_mut(); requested];
                *count = requested as u32;
                check(call, unsafe { func(parent, count, buffer.as_mut_ptr()) })?;
                for (slot, handle) in out.iter_mut().zip(buffer.iter().take(*count as usize)) {
                    *slot = wrap(*handle as usize);
                }
                Ok(())
            }
        }
    }
}

impl Sysman for LevelZero {
    fn drivers(
        &self,
        count: &mut u32,
        handles: Option<&mut [DriverHandle]>,
    ) -> Result<(), SysmanError> {
        let call = "zesDriverGet";
        match handles {
            None => check(call, unsafe { (self.api.driver_get)(count, ptr::null_mut()) }),
            Some(out) => {
                let requested = (*count as usize).min(out.len());
                let mut buffer: Vec<zes_handle_t> = vec![ptr::null_mut(); requested];
                *count = requested as u32;
                check(call, unsafe {
                    (self.api.driver_get)(count, buffer.as_mut_ptr())
                })?;
                for (slot, handle) in out.iter_mut().zip(buffer.iter().take(*count as usize)) {
                    *slot = DriverHandle(*handle as usize);
                }
                Ok(())
            }
        }
    }

    fn devices(
        &self,
        driver: DriverHandle,
        count: &mut u32,
        handles: Option<&mut [DeviceHandle]>,
    ) -> Result<(), SysmanError> {
        self.enumerate(
            "zesDeviceGet",
            self.api.device_get,
            raw(driver.0),
            count,
            handles,
            DeviceHandle,
        )
    }

    fn device_properties(&self, device: DeviceHandle) -> Result<DeviceProperties, SysmanError> {
        let mut ext = ffi::zes_device_ext_properties_t::new();
        let mut props = ffi::zes_device_properties_t::new();
        props.p_next = &mut ext as *mut ffi::zes_device_ext_properties_t as *mut c_void;

        check("zesDeviceGetProperties", unsafe {
            (self.api.device_get_properties)(raw(device.0), &mut props)
        })?;

        // Older drivers ignore the extension chain
        let extended = ext.uuid.iter().any(|b| *b != 0);
        let uuid = if extended { ext.uuid } else { props.core.uuid };

        Ok(DeviceProperties {
            vendor_id: props.core.vendor_id,
            device_id: props.core.device_id,
            kind: extended.then(|| DeviceKind::from_raw(ext.device_type)),
            flags: DeviceFlags::from_raw(ext.flags),
            uuid: DeviceUuid::from_bytes(uuid),
            core_name: c_string(&props.core.name),
            num_subdevices: props.num_subdevices,
            serial_number: c_string(&props.serial_number),
            board_number: c_string(&props.board_number),
            brand_name: c_string(&props.brand_name),
            model_name: c_string(&props.model_name),
            vendor_name: c_string(&props.vendor_name),
            driver_version: c_string(&props.driver_version),
        })
    }

    fn pci_properties(&self, device: DeviceHandle) -> Result<PciProperties, SysmanError> {
        let mut props = ffi::zes_pci_properties_t::new();
        check("zesDevicePciGetProperties", unsafe {
            (self.api.pci_get_properties)(raw(device.0), &mut props)
        })?;

        Ok(PciProperties {
            address: PciAddress::new(
                props.address.domain,
                props.address.bus,
                props.address.device,
                props.address.function,
            ),
            max_generation: props.max_speed.gen,
            max_width: props.max_speed.width,
            max_bandwidth: props.max_speed.max_bandwidth,
        })
    }

    fn engine_groups(
        &self,
        device: DeviceHandle,
        count: &mut u32,
        handles: Option<&mut [EngineHandle]>,
    ) -> Result<(), SysmanError> {
        self.enumerate(
            "zesDeviceEnumEngineGroups",
            self.api.enum_engine_groups,
            raw(device.0),
            count,
            handles,
            EngineHandle,
        )
    }

    fn engine_properties(&self, engine: EngineHandle) -> Result<EngineProperties, SysmanError> {
        let mut props = ffi::zes_engine_properties_t::new();
        check("zesEngineGetProperties", unsafe {
            (self.api.engine_get_properties)(raw(engine.0), &mut props)
        })?;

        Ok(EngineProperties {
            group: EngineGroup::from_raw(props.engine_type),
            on_subdevice: props.on_subdevice != 0,
            subdevice_id: props.subdevice_id,
        })
    }

    fn engine_activity(&self, engine: EngineHandle) -> Result<CounterSample, SysmanError> {
        let mut stats = ffi::zes_engine_stats_t::default();
        check("zesEngineGetActivity", unsafe {
            (self.api.engine_get_activity)(raw(engine.0), &mut stats)
        })?;
        Ok(CounterSample::new(stats.active_time, stats.timestamp))
    }

    fn power_domains(
        &self,
        device: DeviceHandle,
        count: &mut u32,
        handles: Option<&mut [PowerHandle]>,
    ) -> Result<(), SysmanError> {
        self.enumerate(
            "zesDeviceEnumPowerDomains",
            self.api.enum_power_domains,
            raw(device.0),
            count,
            handles,
            PowerHandle,
        )
    }

    fn power_properties(&self, power: PowerHandle) -> Result<PowerProperties, SysmanError> {
        let mut props = ffi::zes_power_properties_t::new();
        check("zesPowerGetProperties", unsafe {
            (self.api.power_get_properties)(raw(power.0), &mut props)
        })?;

        Ok(PowerProperties {
            on_subdevice: props.on_subdevice != 0,
            subdevice_id: props.subdevice_id,
            can_control: props.can_control != 0,
            energy_threshold_supported: props.is_energy_threshold_supported != 0,
            default_limit_mw: props.default_limit,
            min_limit_mw: props.min_limit,
            max_limit_mw: props.max_limit,
        })
    }

    fn energy_counter(&self, power: PowerHandle) -> Result<CounterSample, SysmanError> {
        let mut counter = ffi::zes_power_energy_counter_t::default();
        check("zesPowerGetEnergyCounter", unsafe {
            (self.api.power_get_energy_counter)(raw(power.0), &mut counter)
        })?;
        Ok(CounterSample::new(counter.energy, counter.timestamp))
    }

    fn psus(
        &self,
        device: DeviceHandle,
        count: &mut u32,
        handles: Option<&mut [PsuHandle]>,
    ) -> Result<(), SysmanError> {
        self.enumerate(
            "zesDeviceEnumPsus",
            self.api.enum_psus,
            raw(device.0),
            count,
            handles,
            PsuHandle,
        )
    }

    fn psu_properties(&self, psu: PsuHandle) -> Result<PsuProperties, SysmanError> {
        let mut props = ffi::zes_psu_properties_t::new();
        check("zesPsuGetProperties", unsafe {
            (self.api.psu_get_properties)(raw(psu.0), &mut props)
        })?;

        Ok(PsuProperties {
            on_subdevice: props.on_subdevice != 0,
            subdevice_id: props.subdevice_id,
            have_fan: props.have_fan != 0,
            amp_limit: props.amp_limit,
        })
    }

    fn psu_state(&self, psu: PsuHandle) -> Result<PsuState, SysmanError> {
        let mut state = ffi::zes_psu_state_t::new();
        check("zesPsuGetState", unsafe {
            (self.api.psu_get_state)(raw(psu.0), &mut state)
        })?;

        Ok(PsuState {
            voltage_status: VoltageStatus::from_raw(state.volt_status),
            fan_failed: state.fan_failed != 0,
            temperature: state.temperature,
            current: state.current,
        })
    }

    fn temperature_sensors(
        &self,
        device: DeviceHandle,
        count: &mut u32,
        handles: Option<&mut [TempHandle]>,
    ) -> Result<(), SysmanError> {
        self.enumerate(
            "zesDeviceEnumTemperatureSensors",
            self.api.enum_temperature_sensors,
            raw(device.0),
            count,
            handles,
            TempHandle,
        )
    }

    fn temperature(&self, sensor: TempHandle) -> Result<f64, SysmanError> {
        let mut celsius = 0.0f64;
        check("zesTemperatureGetState", unsafe {
            (self.api.temperature_get_state)(raw(sensor.0), &mut celsius)
        })?;
        Ok(celsius)
    }

    fn memory_modules(
        &self,
        device: DeviceHandle,
        count: &mut u32,
        handles: Option<&mut [MemoryHandle]>,
    ) -> Result<(), SysmanError> {
        self.enumerate(
            "zesDeviceEnumMemoryModules",
            self.api.enum_memory_modules,
            raw(device.0),
            count,
            handles,
            MemoryHandle,
        )
    }

    fn memory_state(&self, memory: MemoryHandle) -> Result<MemoryState, SysmanError> {
        let mut state = ffi::zes_mem_state_t::new();
        check("zesMemoryGetState", unsafe {
            (self.api.memory_get_state)(raw(memory.0), &mut state)
        })?;

        Ok(MemoryState {
            health: state.health,
            free: state.free,
            size: state.size,
        })
    }

    fn process_states(
        &self,
        device: DeviceHandle,
        count: &mut u32,
        states: &mut [ProcessState],
    ) -> Result<(), SysmanError> {
        let capacity = (*count as usize).min(states.len());
        let mut buffer = vec![ffi::zes_process_state_t::new(); capacity];
        *count = capacity as u32;

        check("zesDeviceProcessesGetState", unsafe {
            (self.api.processes_get_state)(raw(device.0), count, buffer.as_mut_ptr())
        })?;

        for (slot, state) in states.iter_mut().zip(buffer.iter().take(*count as usize)) {
            *slot = ProcessState {
                pid: state.process_id,
                mem_size: state.mem_size,
                shared_size: state.shared_size,
                engines: EngineTypeFlags::from_bits(state.engines),
            };
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore = "Requires Level Zero hardware"]
    fn test_level_zero_init() {
        let sysman = LevelZero::new();
        assert!(sysman.is_ok());
    }

    #[test]
    #[ignore = "Requires Level Zero hardware"]
    fn test_driver_count() {
        let sysman = LevelZero::new().unwrap();
        let mut count = 0;
        sysman.drivers(&mut count, None).unwrap();
        assert!(count > 0);
    }
}
