//! Driver status codes
//!
//! Every Sysman entry point returns a 32-bit `ze_result_t`. The values and
//! names below follow the Level Zero headers.

use serde::{Serialize, Serializer};
use std::fmt;

/// Raw `ze_result_t` status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResultCode(pub u32);

impl ResultCode {
    pub const SUCCESS: Self = Self(0);
    pub const NOT_READY: Self = Self(1);
    pub const ERROR_DEVICE_LOST: Self = Self(0x7000_0001);
    pub const ERROR_OUT_OF_HOST_MEMORY: Self = Self(0x7000_0002);
    pub const ERROR_OUT_OF_DEVICE_MEMORY: Self = Self(0x7000_0003);
    pub const ERROR_MODULE_BUILD_FAILURE: Self = Self(0x7000_0004);
    pub const ERROR_MODULE_LINK_FAILURE: Self = Self(0x7000_0005);
    pub const ERROR_DEVICE_REQUIRES_RESET: Self = Self(0x7000_0006);
    pub const ERROR_DEVICE_IN_LOW_POWER_STATE: Self = Self(0x7000_0007);
    pub const ERROR_INSUFFICIENT_PERMISSIONS: Self = Self(0x7001_0000);
    pub const ERROR_NOT_AVAILABLE: Self = Self(0x7001_0001);
    pub const ERROR_DEPENDENCY_UNAVAILABLE: Self = Self(0x7002_0000);
    pub const WARNING_DROPPED_DATA: Self = Self(0x7002_0001);
    pub const ERROR_UNINITIALIZED: Self = Self(0x7800_0001);
    pub const ERROR_UNSUPPORTED_VERSION: Self = Self(0x7800_0002);
    pub const ERROR_UNSUPPORTED_FEATURE: Self = Self(0x7800_0003);
    pub const ERROR_INVALID_ARGUMENT: Self = Self(0x7800_0004);
    pub const ERROR_INVALID_NULL_HANDLE: Self = Self(0x7800_0005);
    pub const ERROR_HANDLE_OBJECT_IN_USE: Self = Self(0x7800_0006);
    pub const ERROR_INVALID_NULL_POINTER: Self = Self(0x7800_0007);
    pub const ERROR_INVALID_SIZE: Self = Self(0x7800_0008);
    pub const ERROR_UNSUPPORTED_SIZE: Self = Self(0x7800_0009);
    pub const ERROR_UNSUPPORTED_ALIGNMENT: Self = Self(0x7800_000a);
    pub const ERROR_INVALID_SYNCHRONIZATION_OBJECT: Self = Self(0x7800_000b);
    pub const ERROR_INVALID_ENUMERATION: Self = Self(0x7800_000c);
    pub const ERROR_UNSUPPORTED_ENUMERATION: Self = Self(0x7800_000d);
    pub const ERROR_UNSUPPORTED_IMAGE_FORMAT: Self = Self(0x7800_000e);
    pub const ERROR_INVALID_NATIVE_BINARY: Self = Self(0x7800_000f);
    pub const ERROR_INVALID_GLOBAL_NAME: Self = Self(0x7800_0010);
    pub const ERROR_INVALID_KERNEL_NAME: Self = Self(0x7800_0011);
    pub const ERROR_INVALID_FUNCTION_NAME: Self = Self(0x7800_0012);
    pub const ERROR_INVALID_GROUP_SIZE_DIMENSION: Self = Self(0x7800_0013);
    pub const ERROR_INVALID_GLOBAL_WIDTH_DIMENSION: Self = Self(0x7800_0014);
    pub const ERROR_INVALID_KERNEL_ARGUMENT_INDEX: Self = Self(0x7800_0015);
    pub const ERROR_INVALID_KERNEL_ARGUMENT_SIZE: Self = Self(0x7800_0016);
    pub const ERROR_INVALID_KERNEL_ATTRIBUTE_VALUE: Self = Self(0x7800_0017);
    pub const ERROR_INVALID_MODULE_UNLINKED: Self = Self(0x7800_0018);
    pub const ERROR_INVALID_COMMAND_LIST_TYPE: Self = Self(0x7800_0019);
    pub const ERROR_OVERLAPPING_REGIONS: Self = Self(0x7800_001a);
    pub const WARNING_ACTION_REQUIRED: Self = Self(0x7800_001b);
    pub const ERROR_UNKNOWN: Self = Self(0x7fff_fffe);

    /// Whether this code reports success
    #[inline]
    pub const fn is_success(&self) -> bool {
        self.0 == Self::SUCCESS.0
    }

    /// Map a raw code to `Ok(())` or the code itself
    pub fn check(raw: u32) -> Result<(), Self> {
        let code = Self(raw);
        if code.is_success() {
            Ok(())
        } else {
            Err(code)
        }
    }

    /// Symbolic name of the code
    pub fn name(&self) -> &'static str {
        match *self {
            Self::SUCCESS => "ZE_RESULT_SUCCESS",
            Self::NOT_READY => "ZE_RESULT_NOT_READY",
            Self::ERROR_DEVICE_LOST => "ZE_RESULT_ERROR_DEVICE_LOST",
            Self::ERROR_OUT_OF_HOST_MEMORY => "ZE_RESULT_ERROR_OUT_OF_HOST_MEMORY",
            Self::ERROR_OUT_OF_DEVICE_MEMORY => "ZE_RESULT_ERROR_OUT_OF_DEVICE_MEMORY",
            Self::ERROR_MODULE_BUILD_FAILURE => "ZE_RESULT_ERROR_MODULE_BUILD_FAILURE",
            Self::ERROR_MODULE_LINK_FAILURE => "ZE_RESULT_ERROR_MODULE_LINK_FAILURE",
            Self::ERROR_DEVICE_REQUIRES_RESET => "ZE_RESULT_ERROR_DEVICE_REQUIRES_RESET",
            Self::ERROR_DEVICE_IN_LOW_POWER_STATE => "ZE_RESULT_ERROR_DEVICE_IN_LOW_POWER_STATE",
            Self::ERROR_INSUFFICIENT_PERMISSIONS => "ZE_RESULT_ERROR_INSUFFICIENT_PERMISSIONS",
            Self::ERROR_NOT_AVAILABLE => "ZE_RESULT_ERROR_NOT_AVAILABLE",
            Self::ERROR_DEPENDENCY_UNAVAILABLE => "ZE_RESULT_ERROR_DEPENDENCY_UNAVAILABLE",
            Self::WARNING_DROPPED_DATA => "ZE_RESULT_WARNING_DROPPED_DATA",
            Self::ERROR_UNINITIALIZED => "ZE_RESULT_ERROR_UNINITIALIZED",
            Self::ERROR_UNSUPPORTED_VERSION => "ZE_RESULT_ERROR_UNSUPPORTED_VERSION",
            Self::ERROR_UNSUPPORTED_FEATURE => "ZE_RESULT_ERROR_UNSUPPORTED_FEATURE",
            Self::ERROR_INVALID_ARGUMENT => "ZE_RESULT_ERROR_INVALID_ARGUMENT",
            Self::ERROR_INVALID_NULL_HANDLE => "ZE_RESULT_ERROR_INVALID_NULL_HANDLE",
            Self::ERROR_HANDLE_OBJECT_IN_USE => "ZE_RESULT_ERROR_HANDLE_OBJECT_IN_USE",
            Self::ERROR_INVALID_NULL_POINTER => "ZE_RESULT_ERROR_INVALID_NULL_POINTER",
            Self::ERROR_INVALID_SIZE => "ZE_RESULT_ERROR_INVALID_SIZE",
            Self::ERROR_UNSUPPORTED_SIZE => "ZE_RESULT_ERROR_UNSUPPORTED_SIZE",
            Self::ERROR_UNSUPPORTED_ALIGNMENT => "ZE_RESULT_ERROR_UNSUPPORTED_ALIGNMENT",
            Self::ERROR_INVALID_SYNCHRONIZATION_OBJECT => {
                "ZE_RESULT_ERROR_INVALID_SYNCHRONIZATION_OBJECT"
            }
            Self::ERROR_INVALID_ENUMERATION => "ZE_RESULT_ERROR_INVALID_ENUMERATION",
            Self::ERROR_UNSUPPORTED_ENUMERATION => "ZE_RESULT_ERROR_UNSUPPORTED_ENUMERATION",
            Self::ERROR_UNSUPPORTED_IMAGE_FORMAT => "ZE_RESULT_ERROR_UNSUPPORTED_IMAGE_FORMAT",
            Self::ERROR_INVALID_NATIVE_BINARY => "ZE_RESULT_ERROR_INVALID_NATIVE_BINARY",
            Self::ERROR_INVALID_GLOBAL_NAME => "ZE_RESULT_ERROR_INVALID_GLOBAL_NAME",
            Self::ERROR_INVALID_KERNEL_NAME => "ZE_RESULT_ERROR_INVALID_KERNEL_NAME",
            Self::ERROR_INVALID_FUNCTION_NAME => "ZE_RESULT_ERROR_INVALID_FUNCTION_NAME",
            Self::ERROR_INVALID_GROUP_SIZE_DIMENSION => {
                "ZE_RESULT_ERROR_INVALID_GROUP_SIZE_DIMENSION"
            }
            Self::ERROR_INVALID_GLOBAL_WIDTH_DIMENSION => {
                "ZE_RESULT_ERROR_INVALID_GLOBAL_WIDTH_DIMENSION"
            }
            Self::ERROR_INVALID_KERNEL_ARGUMENT_INDEX => {
                "ZE_RESULT_ERROR_INVALID_KERNEL_ARGUMENT_INDEX"
            }
            Self::ERROR_INVALID_KERNEL_ARGUMENT_SIZE => {
                "ZE_RESULT_ERROR_INVALID_KERNEL_ARGUMENT_SIZE"
            }
            Self::ERROR_INVALID_KERNEL_ATTRIBUTE_VALUE => {
                "ZE_RESULT_ERROR_INVALID_KERNEL_ATTRIBUTE_VALUE"
            }
            Self::ERROR_INVALID_MODULE_UNLINKED => "ZE_RESULT_ERROR_INVALID_MODULE_UNLINKED",
            Self::ERROR_INVALID_COMMAND_LIST_TYPE => "ZE_RESULT_ERROR_INVALID_COMMAND_LIST_TYPE",
            Self::ERROR_OVERLAPPING_REGIONS => "ZE_RESULT_ERROR_OVERLAPPING_REGIONS",
            Self::WARNING_ACTION_REQUIRED => "ZE_RESULT_WARNING_ACTION_REQUIRED",
            Self::ERROR_UNKNOWN => "ZE_RESULT_ERROR_UNKNOWN",
            _ => "UNKNOWN",
        }
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#x})", self.name(), self.0)
    }
}

impl Serialize for ResultCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}
