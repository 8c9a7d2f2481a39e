//! Info command implementation
//!
//! Dumps static properties and current readings for one or all devices.

use crate::cli::args::OutputFormat;
use crate::cli::output::{print_output, DeviceInfoList};
use crate::device::{DeviceRegistry, DeviceSnapshot};
use crate::error::Result;
use crate::sysman::Sysman;

/// Snapshot the selected device, or every device
///
/// Temperatures are read first so the dump shows live values.
pub fn collect_info<S: Sysman + ?Sized>(
    registry: &mut DeviceRegistry,
    sysman: &S,
    selected: Option<usize>,
) -> DeviceInfoList {
    let mut snapshots = Vec::new();

    for (i, device) in registry.iter_mut().enumerate() {
        if selected.is_some_and(|s| s != i) {
            continue;
        }
        for failure in device.refresh_temperatures(sysman) {
            log::warn!("Device {}: {}", i + 1, failure);
        }
        snapshots.push(DeviceSnapshot::capture(i + 1, device, sysman));
    }

    DeviceInfoList(snapshots)
}

/// Execute the info command
pub fn run_info<S: Sysman + ?Sized>(
    registry: &mut DeviceRegistry,
    sysman: &S,
    selected: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let info = collect_info(registry, sysman, selected);
    print_output(&info, format)?;
    Ok(())
}
