//! Trait definitions for Sysman driver operations
//!
//! The `Sysman` trait is the narrow driver surface the device model needs.
//! It mirrors the driver's calling convention so the production loader is a
//! thin shim and tests can script every failure mode.

use crate::domain::{
    CounterSample, DeviceProperties, EngineProperties, MemoryState, PciProperties,
    PowerProperties, ProcessState, PsuProperties, PsuState,
};
use crate::error::SysmanError;

macro_rules! opaque_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name(pub usize);
    };
}

opaque_handle!(
    /// Driver handle; valid for the lifetime of the session
    DriverHandle
);
opaque_handle!(
    /// Device handle; owned by the driver, never freed by us
    DeviceHandle
);
opaque_handle!(EngineHandle);
opaque_handle!(PowerHandle);
opaque_handle!(PsuHandle);
opaque_handle!(TempHandle);
opaque_handle!(MemoryHandle);

/// Driver operations used by the device model
///
/// Enumeration calls follow the two-phase convention: with `handles` set to
/// `None` they store the available count in `count`; with a buffer they fill
/// at most `*count` entries and store the number written.
pub trait Sysman: Send + Sync {
    fn drivers(
        &self,
        count: &mut u32,
        handles: Option<&mut [DriverHandle]>,
    ) -> Result<(), SysmanError>;

    fn devices(
        &self,
        driver: DriverHandle,
        count: &mut u32,
        handles: Option<&mut [DeviceHandle]>,
    ) -> Result<(), SysmanError>;

    // Device
    fn device_properties(&self, device: DeviceHandle) -> Result<DeviceProperties, SysmanError>;

    fn pci_properties(&self, device: DeviceHandle) -> Result<PciProperties, SysmanError>;

    // Engines
    fn engine_groups(
        &self,
        device: DeviceHandle,
        count: &mut u32,
        handles: Option<&mut [EngineHandle]>,
    ) -> Result<(), SysmanError>;

    fn engine_properties(&self, engine: EngineHandle) -> Result<EngineProperties, SysmanError>;

    /// Active time and timestamp, both in microseconds
    fn engine_activity(&self, engine: EngineHandle) -> Result<CounterSample, SysmanError>;

    // Power
    fn power_domains(
        &self,
        device: DeviceHandle,
        count: &mut u32,
        handles: Option<&mut [PowerHandle]>,
    ) -> Result<(), SysmanError>;

    fn power_properties(&self, power: PowerHandle) -> Result<PowerProperties, SysmanError>;

    /// Energy in microjoules and timestamp in microseconds
    fn energy_counter(&self, power: PowerHandle) -> Result<CounterSample, SysmanError>;

    // PSUs
    fn psus(
        &self,
        device: DeviceHandle,
        count: &mut u32,
        handles: Option<&mut [PsuHandle]>,
    ) -> Result<(), SysmanError>;

    fn psu_properties(&self, psu: PsuHandle) -> Result<PsuProperties, SysmanError>;

    fn psu_state(&self, psu: PsuHandle) -> Result<PsuState, SysmanError>;

    // Temperature
    fn temperature_sensors(
        &self,
        device: DeviceHandle,
        count: &mut u32,
        handles: Option<&mut [TempHandle]>,
    ) -> Result<(), SysmanError>;

    /// Current reading in degrees Celsius
    fn temperature(&self, sensor: TempHandle) -> Result<f64, SysmanError>;

    // Memory
    fn memory_modules(
        &self,
        device: DeviceHandle,
        count: &mut u32,
        handles: Option<&mut [MemoryHandle]>,
    ) -> Result<(), SysmanError>;

    fn memory_state(&self, memory: MemoryHandle) -> Result<MemoryState, SysmanError>;

    // Processes
    /// Fill `states` with up to `*count` entries
    ///
    /// Fails with `ERROR_INVALID_SIZE` when more processes exist than
    /// `*count`; `count` then holds the number required.
    fn process_states(
        &self,
        device: DeviceHandle,
        count: &mut u32,
        states: &mut [ProcessState],
    ) -> Result<(), SysmanError>;
}
