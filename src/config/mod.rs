//! Configuration system
//!
//! Handles TOML config file parsing and CLI argument merging.

pub mod builder;
pub mod file;

pub use builder::ConfigBuilder;
pub use file::ConfigFile;

use crate::cli::dashboard::DashboardOptions;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,
    /// Device selection
    pub device: DeviceConfig,
    /// Dashboard layout
    pub dashboard: DashboardConfig,
}

impl Config {
    /// Reject values the monitor cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.general.interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "general.interval_ms".into(),
                message: "interval must be greater than zero".into(),
            });
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.general.interval_ms)
    }
}

/// General configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable verbose logging
    pub verbose: bool,
    /// Refresh interval in milliseconds
    pub interval_ms: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            interval_ms: 1000,
        }
    }
}

/// Device selection configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Selector string, same forms as `--device`
    pub selector: Option<String>,
}

/// Dashboard configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub show_processes: bool,
    pub max_processes: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            show_processes: true,
            max_processes: 32,
        }
    }
}

impl DashboardConfig {
    pub fn options(&self) -> DashboardOptions {
        DashboardOptions {
            show_processes: self.show_processes,
            max_processes: self.max_processes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.interval_ms, 1000);
        assert_eq!(config.interval(), Duration::from_secs(1));
        assert!(config.device.selector.is_none());
        assert!(config.dashboard.show_processes);
        assert_eq!(config.dashboard.max_processes, 32);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut config = Config::default();
        config.general.interval_ms = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str("[device]\nselector = \"8086:56c1\"\n").unwrap();
        assert_eq!(config.device.selector.as_deref(), Some("8086:56c1"));
        assert_eq!(config.general.interval_ms, 1000);
    }

    #[test]
    fn test_dashboard_options() {
        let config = DashboardConfig {
            show_processes: false,
            max_processes: 5,
        };
        let options = config.options();
        assert!(!options.show_processes);
        assert_eq!(options.max_processes, 5);
    }
}
