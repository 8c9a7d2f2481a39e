//! Unified error types for zemon
//!
//! This module defines all error types used throughout the application.
//! Uses thiserror for ergonomic error definitions.

use crate::sysman::ResultCode;
use std::fmt;
use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from the Sysman driver layer
    #[error("Sysman error: {0}")]
    Sysman(#[from] SysmanError),

    /// A device could not be constructed
    #[error("Device initialization failed: {0}")]
    DeviceInit(#[from] DeviceInitError),

    /// Device selector was invalid or matched nothing
    #[error("{0}")]
    Selector(#[from] SelectorError),

    /// Error from configuration parsing/validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from domain type validation
    #[error("Domain validation error: {0}")]
    Domain(#[from] DomainError),

    /// No Sysman devices detected in the system
    #[error("No Level Zero Sysman devices detected")]
    NoDevicesFound,

    /// IO error (terminal, file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the Sysman driver layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SysmanError {
    /// The Level Zero loader library could not be opened
    #[error("Level Zero loader not found ({0}). Is the Level Zero loader installed?")]
    LibraryNotFound(String),

    /// The loader does not export a required entry point
    #[error("Sysman entry point not available: {0}")]
    SymbolNotFound(String),

    /// A driver call returned a non-success status
    #[error("{call} failed: {code}")]
    Call {
        call: &'static str,
        code: ResultCode,
    },
}

impl SysmanError {
    /// Build a call failure from a raw status code
    pub fn call(call: &'static str, code: ResultCode) -> Self {
        Self::Call { call, code }
    }

    /// Driver status code, if this error came from a driver call
    pub fn code(&self) -> Option<ResultCode> {
        match self {
            Self::Call { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// The hardware does not implement this feature
    pub fn is_unsupported_feature(&self) -> bool {
        self.code() == Some(ResultCode::ERROR_UNSUPPORTED_FEATURE)
    }

    /// The caller's buffer was too small
    pub fn is_invalid_size(&self) -> bool {
        self.code() == Some(ResultCode::ERROR_INVALID_SIZE)
    }

    /// The caller lacks permission for this query
    pub fn is_permission_denied(&self) -> bool {
        self.code() == Some(ResultCode::ERROR_INSUFFICIENT_PERMISSIONS)
    }
}

/// Which phase of a two-phase enumeration failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumPhase {
    /// Count query with no buffer
    Count,
    /// Fill query with a sized buffer
    Fill,
}

impl fmt::Display for EnumPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count => write!(f, "count"),
            Self::Fill => write!(f, "fill"),
        }
    }
}

/// Step of device construction that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStage {
    Drivers(EnumPhase),
    Devices(EnumPhase),
    Properties,
    PciProperties,
    EngineGroups(EnumPhase),
    Engine(usize),
    PowerDomains(EnumPhase),
    PowerDomain(usize),
    Psus(EnumPhase),
    Psu(usize),
    MemoryModules(EnumPhase),
    TemperatureSensors(EnumPhase),
}

impl fmt::Display for InitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Drivers(p) => write!(f, "driver enumeration ({})", p),
            Self::Devices(p) => write!(f, "device enumeration ({})", p),
            Self::Properties => write!(f, "device properties"),
            Self::PciProperties => write!(f, "PCI properties"),
            Self::EngineGroups(p) => write!(f, "engine group enumeration ({})", p),
            Self::Engine(i) => write!(f, "engine {}", i),
            Self::PowerDomains(p) => write!(f, "power domain enumeration ({})", p),
            Self::PowerDomain(i) => write!(f, "power domain {}", i),
            Self::Psus(p) => write!(f, "PSU enumeration ({})", p),
            Self::Psu(i) => write!(f, "PSU {}", i),
            Self::MemoryModules(p) => write!(f, "memory module enumeration ({})", p),
            Self::TemperatureSensors(p) => write!(f, "temperature sensor enumeration ({})", p),
        }
    }
}

/// A device failed to construct; it is never added half-initialized
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{stage}: {source}")]
pub struct DeviceInitError {
    pub stage: InitStage,
    #[source]
    pub source: SysmanError,
}

impl DeviceInitError {
    pub fn new(stage: InitStage, source: SysmanError) -> Self {
        Self { stage, source }
    }
}

/// Errors from device selection
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// The selector string matches none of the accepted forms
    #[error("Invalid device selector: {0}")]
    Invalid(String),

    /// The selector parsed but no device matched it
    #[error("Device {0} not found")]
    NotFound(String),
}

/// Errors from domain type validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Not a canonical 8-4-4-4-12 UUID
    #[error("Invalid UUID: {0}")]
    InvalidUuid(String),

    /// Not a hexadecimal number
    #[error("Invalid hex value: {0}")]
    InvalidHex(String),
}

/// Errors from configuration parsing and validation
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Invalid config value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
