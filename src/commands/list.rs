//! List command implementation
//!
//! Lists every discovered device.

use crate::cli::args::OutputFormat;
use crate::cli::output::{print_output, DeviceList, DeviceListEntry};
use crate::device::DeviceRegistry;
use crate::error::Result;

/// One entry per device, numbered from 1
pub fn device_list(registry: &DeviceRegistry) -> DeviceList {
    DeviceList {
        devices: registry
            .devices()
            .iter()
            .enumerate()
            .map(|(i, device)| DeviceListEntry::new(i + 1, device))
            .collect(),
    }
}

/// Execute the list command
pub fn run_list(registry: &DeviceRegistry, format: OutputFormat) -> Result<()> {
    print_output(&device_list(registry), format)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::output::TableDisplay;
    use crate::mock::{MockDevice, MockSysman};

    #[test]
    fn test_device_list_lines() {
        let mock = MockSysman::new(vec![
            MockDevice::new(0x8086, 0x56c0),
            MockDevice::new(0x8086, 0x56c1),
        ]);
        let registry = DeviceRegistry::discover(&mock).unwrap().registry;

        let list = device_list(&registry);
        assert_eq!(
            list.to_table(),
            "Device 1: 8086:56C0 (Mock 56C0)\nDevice 2: 8086:56C1 (Mock 56C1)"
        );
    }
}
