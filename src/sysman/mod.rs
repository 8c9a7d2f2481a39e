//! Sysman abstraction layer
//!
//! Provides a trait over the Level Zero Sysman API for testability.

pub mod ffi;
pub mod loader;
pub mod result;
pub mod traits;

pub use loader::LevelZero;
pub use result::ResultCode;
pub use traits::{
    DeviceHandle, DriverHandle, EngineHandle, MemoryHandle, PowerHandle, PsuHandle, Sysman,
    TempHandle,
};
