//! Processes command implementation
//!
//! Lists processes using a device with their memory and engines.

use crate::cli::args::{OutputFormat, ProcessesArgs};
use crate::cli::output::{print_output, ProcessTable};
use crate::device::DeviceRegistry;
use crate::error::Result;
use crate::sysman::Sysman;

/// Query processes for the selected device, or every device
///
/// For a single selected device a failed query is an error. Across all
/// devices a failing device is logged and skipped; it is only an error if
/// every device failed.
pub fn collect_processes<S: Sysman + ?Sized>(
    registry: &mut DeviceRegistry,
    sysman: &S,
    selected: Option<usize>,
    args: &ProcessesArgs,
) -> Result<Vec<ProcessTable>> {
    let mut tables = Vec::new();
    let mut first_error = None;

    for (i, device) in registry.iter_mut().enumerate() {
        if selected.is_some_and(|s| s != i) {
            continue;
        }
        let list = match device.refresh_processes(sysman) {
            Ok(list) => list,
            Err(e) if selected.is_none() => {
                log::warn!("Device {}: {}", i + 1, e);
                first_error.get_or_insert(e);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let mut processes = if args.sort_pid {
            list.sorted_by_pid()
        } else {
            list.sorted_by_memory()
        };
        if let Some(n) = args.top {
            processes.truncate(n);
        }

        tables.push(ProcessTable {
            device_index: i + 1,
            processes: processes.into_iter().cloned().collect(),
            total_mem_size: list.total_mem_size,
        });
    }

    match first_error {
        Some(e) if tables.is_empty() => Err(e.into()),
        _ => Ok(tables),
    }
}

/// Execute the processes command
pub fn run_processes<S: Sysman + ?Sized>(
    registry: &mut DeviceRegistry,
    sysman: &S,
    selected: Option<usize>,
    args: &ProcessesArgs,
    format: OutputFormat,
) -> Result<()> {
    let tables = collect_processes(registry, sysman, selected, args)?;

    for (i, table) in tables.iter().enumerate() {
        if i > 0 && format == OutputFormat::Table {
            println!(); // Separator between devices
        }
        print_output(table, format)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{CommandLineSource, ProcessMonitor};
    use crate::domain::{EngineTypeFlags, ProcessState};
    use crate::error::AppError;
    use crate::mock::{MockDevice, MockSysman};
    use crate::sysman::ResultCode;

    #[derive(Debug)]
    struct PidNames;

    impl CommandLineSource for PidNames {
        fn command_line(&self, pid: u32) -> String {
            format!("proc-{}", pid)
        }
    }

    fn state(pid: u32, mem_size: u64) -> ProcessState {
        ProcessState {
            pid,
            mem_size,
            shared_size: 0,
            engines: EngineTypeFlags::COMPUTE,
        }
    }

    fn registry(mock: &MockSysman) -> DeviceRegistry {
        DeviceRegistry::discover_with(mock, || {
            ProcessMonitor::new().with_source(Box::new(PidNames))
        })
        .unwrap()
        .registry
    }

    fn mock() -> MockSysman {
        MockSysman::new(vec![MockDevice::new(0x8086, 0x56c0).with_processes(vec![
            state(30, 100),
            state(10, 300),
            state(20, 200),
        ])])
    }

    #[test]
    fn test_sorted_by_memory_with_top() {
        let mock = mock();
        let mut registry = registry(&mock);
        let args = ProcessesArgs {
            top: Some(2),
            sort_pid: false,
        };

        let tables = collect_processes(&mut registry, &mock, None, &args).unwrap();
        let pids: Vec<u32> = tables[0].processes.iter().map(|p| p.pid).collect();
        assert_eq!(pids, vec![10, 20]);
        assert_eq!(tables[0].total_mem_size, 600);
        assert_eq!(tables[0].processes[0].command_line, "proc-10");
    }

    #[test]
    fn test_sorted_by_pid() {
        let mock = mock();
        let mut registry = registry(&mock);
        let args = ProcessesArgs {
            top: None,
            sort_pid: true,
        };

        let tables = collect_processes(&mut registry, &mock, Some(0), &args).unwrap();
        let pids: Vec<u32> = tables[0].processes.iter().map(|p| p.pid).collect();
        assert_eq!(pids, vec![10, 20, 30]);
    }

    #[test]
    fn test_failing_device_is_skipped() {
        let mock = MockSysman::new(vec![
            MockDevice::new(0x8086, 0x56c0).with_processes(vec![state(10, 100)]),
            MockDevice::new(0x8086, 0x56c1).with_processes(vec![state(20, 200)]),
        ]);
        let mut registry = registry(&mock);
        mock.fail_once(
            "zesDeviceProcessesGetState",
            ResultCode::ERROR_INSUFFICIENT_PERMISSIONS,
        );
        let args = ProcessesArgs {
            top: None,
            sort_pid: false,
        };

        let tables = collect_processes(&mut registry, &mock, None, &args).unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].device_index, 2);
        assert_eq!(tables[0].processes[0].pid, 20);
    }

    #[test]
    fn test_query_failure_is_error() {
        let mock = mock();
        let mut registry = registry(&mock);
        mock.fail(
            "zesDeviceProcessesGetState",
            ResultCode::ERROR_INSUFFICIENT_PERMISSIONS,
        );
        let args = ProcessesArgs {
            top: None,
            sort_pid: false,
        };

        let result = collect_processes(&mut registry, &mock, None, &args);
        assert!(matches!(result, Err(AppError::Sysman(e)) if e.is_permission_denied()));
    }
}
