//! Domain models for zemon
//!
//! Plain value types shared by the driver layer, the device model and the
//! renderers. Raw driver enums are decoded here.

pub mod device;
pub mod engine;
pub mod identity;
pub mod memory;
pub mod power;
pub mod process;
pub mod psu;
pub mod sample;
pub mod thermal;

pub use device::{DeviceFlags, DeviceKind, DeviceProperties, PciProperties};
pub use engine::{EngineGroup, EngineProperties, EngineTypeFlags};
pub use identity::{DeviceUuid, PciAddress, PciId, UUID_SIZE};
pub use memory::{MemoryState, MemoryUsage};
pub use power::{PowerProperties, Watts};
pub use process::{ProcessList, ProcessRecord, ProcessState};
pub use psu::{PsuProperties, PsuState, VoltageStatus};
pub use sample::CounterSample;
pub use thermal::Temperature;
