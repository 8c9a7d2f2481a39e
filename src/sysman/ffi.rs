//! Raw `#[repr(C)]` mirrors of the Sysman structures
//!
//! Only the structures and entry points the device model calls are
//! declared. Field order and widths follow `zes_api.h`.

#![allow(non_camel_case_types)]

use std::ffi::{c_char, c_void};

pub type ze_result_t = u32;
pub type ze_bool_t = u8;
pub type zes_handle_t = *mut c_void;

pub const ZE_MAX_DEVICE_UUID_SIZE: usize = 16;
pub const ZE_MAX_DEVICE_NAME: usize = 256;
pub const ZES_STRING_PROPERTY_SIZE: usize = 64;

// zes_structure_type_t
pub const STYPE_DEVICE_PROPERTIES: u32 = 0x1;
pub const STYPE_PCI_PROPERTIES: u32 = 0x2;
pub const STYPE_ENGINE_PROPERTIES: u32 = 0x5;
pub const STYPE_POWER_PROPERTIES: u32 = 0xd;
pub const STYPE_PSU_PROPERTIES: u32 = 0xe;
pub const STYPE_PROCESS_STATE: u32 = 0x16;
pub const STYPE_MEM_STATE: u32 = 0x1e;
pub const STYPE_PSU_STATE: u32 = 0x24;
pub const STYPE_DEVICE_EXT_PROPERTIES: u32 = 0x32;
// ze_structure_type_t
pub const ZE_STYPE_DEVICE_PROPERTIES: u32 = 0x3;

#[repr(C)]
pub struct ze_device_properties_t {
    pub stype: u32,
    pub p_next: *mut c_void,
    pub device_type: u32,
    pub vendor_id: u32,
    pub device_id: u32,
    pub flags: u32,
    pub subdevice_id: u32,
    pub core_clock_rate: u32,
    pub max_mem_alloc_size: u64,
    pub max_hardware_contexts: u32,
    pub max_command_queue_priority: u32,
    pub num_threads_per_eu: u32,
    pub physical_eu_simd_width: u32,
    pub num_eus_per_subslice: u32,
    pub num_subslices_per_slice: u32,
    pub num_slices: u32,
    pub timer_resolution: u64,
    pub timestamp_valid_bits: u32,
    pub kernel_timestamp_valid_bits: u32,
    pub uuid: [u8; ZE_MAX_DEVICE_UUID_SIZE],
    pub name: [c_char; ZE_MAX_DEVICE_NAME],
}

#[repr(C)]
pub struct zes_device_properties_t {
    pub stype: u32,
    pub p_next: *mut c_void,
    pub core: ze_device_properties_t,
    pub num_subdevices: u32,
    pub serial_number: [c_char; ZES_STRING_PROPERTY_SIZE],
    pub board_number: [c_char; ZES_STRING_PROPERTY_SIZE],
    pub brand_name: [c_char; ZES_STRING_PROPERTY_SIZE],
    pub model_name: [c_char; ZES_STRING_PROPERTY_SIZE],
    pub vendor_name: [c_char; ZES_STRING_PROPERTY_SIZE],
    pub driver_version: [c_char; ZES_STRING_PROPERTY_SIZE],
}

/// Chained through `zes_device_properties_t::p_next`
#[repr(C)]
pub struct zes_device_ext_properties_t {
    pub stype: u32,
    pub p_next: *mut c_void,
    pub uuid: [u8; ZE_MAX_DEVICE_UUID_SIZE],
    pub device_type: u32,
    pub flags: u32,
}

#[repr(C)]
#[derive(Default)]
pub struct zes_pci_address_t {
    pub domain: u32,
    pub bus: u32,
    pub device: u32,
    pub function: u32,
}

#[repr(C)]
#[derive(Default)]
pub struct zes_pci_speed_t {
    pub gen: i32,
    pub width: i32,
    pub max_bandwidth: i64,
}

#[repr(C)]
pub struct zes_pci_properties_t {
    pub stype: u32,
    pub p_next: *mut c_void,
    pub address: zes_pci_address_t,
    pub max_speed: zes_pci_speed_t,
    pub have_bandwidth_counters: ze_bool_t,
    pub have_packet_counters: ze_bool_t,
    pub have_replay_counters: ze_bool_t,
}

#[repr(C)]
pub struct zes_engine_properties_t {
    pub stype: u32,
    pub p_next: *mut c_void,
    pub engine_type: u32,
    pub on_subdevice: ze_bool_t,
    pub subdevice_id: u32,
}

#[repr(C)]
#[derive(Default)]
pub struct zes_engine_stats_t {
    pub active_time: u64,
    pub timestamp: u64,
}

#[repr(C)]
pub struct zes_power_properties_t {
    pub stype: u32,
    pub p_next: *mut c_void,
    pub on_subdevice: ze_bool_t,
    pub subdevice_id: u32,
    pub can_control: ze_bool_t,
    pub is_energy_threshold_supported: ze_bool_t,
    pub default_limit: i32,
    pub min_limit: i32,
    pub max_limit: i32,
}

#[repr(C)]
#[derive(Default)]
pub struct zes_power_energy_counter_t {
    pub energy: u64,
    pub timestamp: u64,
}

#[repr(C)]
pub struct zes_psu_properties_t {
    pub stype: u32,
    pub p_next: *mut c_void,
    pub on_subdevice: ze_bool_t,
    pub subdevice_id: u32,
    pub have_fan: ze_bool_t,
    pub amp_limit: i32,
}

#[repr(C)]
pub struct zes_psu_state_t {
    pub stype: u32,
    pub p_next: *mut c_void,
    pub volt_status: u32,
    pub fan_failed: ze_bool_t,
    pub temperature: i32,
    pub current: i32,
}

#[repr(C)]
pub struct zes_mem_state_t {
    pub stype: u32,
    pub p_next: *const c_void,
    pub health: u32,
    pub free: u64,
    pub size: u64,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct zes_process_state_t {
    pub stype: u32,
    pub p_next: *const c_void,
    pub process_id: u32,
    pub mem_size: u64,
    pub shared_size: u64,
    pub engines: u32,
}

macro_rules! zeroed_with_stype {
    ($ty:ty, $stype:expr) => {
        impl $ty {
            /// Zero-initialized with `stype` set
            pub fn new() -> Self {
                // SAFETY: plain C struct of integers, arrays and raw
                // pointers; all-zero is a valid bit pattern.
                let mut value: Self = unsafe { std::mem::zeroed() };
                value.stype = $stype;
                value
            }
        }
    };
}

zeroed_with_stype!(ze_device_properties_t, ZE_STYPE_DEVICE_PROPERTIES);
zeroed_with_stype!(zes_device_properties_t, STYPE_DEVICE_PROPERTIES);
zeroed_with_stype!(zes_device_ext_properties_t, STYPE_DEVICE_EXT_PROPERTIES);
zeroed_with_stype!(zes_pci_properties_t, STYPE_PCI_PROPERTIES);
zeroed_with_stype!(zes_engine_properties_t, STYPE_ENGINE_PROPERTIES);
zeroed_with_stype!(zes_power_properties_t, STYPE_POWER_PROPERTIES);
zeroed_with_stype!(zes_psu_properties_t, STYPE_PSU_PROPERTIES);
zeroed_with_stype!(zes_psu_state_t, STYPE_PSU_STATE);
zeroed_with_stype!(zes_mem_state_t, STYPE_MEM_STATE);
zeroed_with_stype!(zes_process_state_t, STYPE_PROCESS_STATE);

pub type zesInit_t = unsafe extern "C" fn(flags: u32) -> ze_result_t;
pub type EnumFn =
    unsafe extern "C" fn(parent: zes_handle_t, count: *mut u32, out: *mut zes_handle_t) -> ze_result_t;
pub type zesDriverGet_t = unsafe extern "C" fn(count: *mut u32, out: *mut zes_handle_t) -> ze_result_t;
pub type zesDeviceGetProperties_t =
    unsafe extern "C" fn(device: zes_handle_t, props: *mut zes_device_properties_t) -> ze_result_t;
pub type zesDevicePciGetProperties_t =
    unsafe extern "C" fn(device: zes_handle_t, props: *mut zes_pci_properties_t) -> ze_result_t;
pub type zesEngineGetProperties_t =
    unsafe extern "C" fn(engine: zes_handle_t, props: *mut zes_engine_properties_t) -> ze_result_t;
pub type zesEngineGetActivity_t =
    unsafe extern "C" fn(engine: zes_handle_t, stats: *mut zes_engine_stats_t) -> ze_result_t;
pub type zesPowerGetProperties_t =
    unsafe extern "C" fn(power: zes_handle_t, props: *mut zes_power_properties_t) -> ze_result_t;
pub type zesPowerGetEnergyCounter_t = unsafe extern "C" fn(
    power: zes_handle_t,
    energy: *mut zes_power_energy_counter_t,
) -> ze_result_t;
pub type zesPsuGetProperties_t =
    unsafe extern "C" fn(psu: zes_handle_t, props: *mut zes_psu_properties_t) -> ze_result_t;
pub type zesPsuGetState_t =
    unsafe extern "C" fn(psu: zes_handle_t, state: *mut zes_psu_state_t) -> ze_result_t;
pub type zesTemperatureGetState_t =
    unsafe extern "C" fn(sensor: zes_handle_t, celsius: *mut f64) -> ze_result_t;
pub type zesMemoryGetState_t =
    unsafe extern "C" fn(memory: zes_handle_t, state: *mut zes_mem_state_t) -> ze_result_t;
pub type zesDeviceProcessesGetState_t = unsafe extern "C" fn(
    device: zes_handle_t,
    count: *mut u32,
    processes: *mut zes_process_state_t,
) -> ze_result_t;

/// Decode a fixed-size NUL-padded C string field
pub fn c_string(field: &[c_char]) -> String {
    let bytes: Vec<u8> = field
        .iter()
        .take_while(|c| **c != 0)
        .map(|c| *c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).trim().to_string()
}
