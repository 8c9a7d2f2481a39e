//! Process domain types
//!
//! Per-process device memory and engine usage as reported by the driver,
//! plus the command line looked up from the host.

use crate::domain::EngineTypeFlags;
use serde::Serialize;
use std::fmt;

/// Raw per-process usage from `zesDeviceProcessesGetState`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProcessState {
    pub pid: u32,
    /// Device memory allocated by the process (bytes)
    pub mem_size: u64,
    /// Memory shared with other processes (bytes)
    pub shared_size: u64,
    pub engines: EngineTypeFlags,
}

/// A process using the device, with its command line resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessRecord {
    pub pid: u32,
    pub command_line: String,
    pub mem_size: u64,
    pub shared_size: u64,
    pub engines: EngineTypeFlags,
}

impl ProcessRecord {
    pub fn new(state: ProcessState, command_line: String) -> Self {
        Self {
            pid: state.pid,
            command_line,
            mem_size: state.mem_size,
            shared_size: state.shared_size,
            engines: state.engines,
        }
    }

    /// Memory usage in MiB
    pub fn memory_mib(&self) -> f64 {
        self.mem_size as f64 / 1024.0 / 1024.0
    }
}

impl fmt::Display for ProcessRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PID {} ({}): {:.1} MiB",
            self.pid,
            self.engines,
            self.memory_mib()
        )
    }
}

/// Processes using a device at one point in time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessList {
    pub processes: Vec<ProcessRecord>,
    /// Sum of `mem_size` over all processes (bytes)
    pub total_mem_size: u64,
}

impl ProcessList {
    pub fn new(processes: Vec<ProcessRecord>) -> Self {
        let total_mem_size = processes.iter().map(|p| p.mem_size).sum();
        Self {
            processes,
            total_mem_size,
        }
    }

    pub fn count(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Processes sorted by memory usage, largest first
    pub fn sorted_by_memory(&self) -> Vec<&ProcessRecord> {
        let mut sorted: Vec<&ProcessRecord> = self.processes.iter().collect();
        sorted.sort_by(|a, b| b.mem_size.cmp(&a.mem_size).then(a.pid.cmp(&b.pid)));
        sorted
    }

    /// Processes sorted by PID, ascending
    pub fn sorted_by_pid(&self) -> Vec<&ProcessRecord> {
        let mut sorted: Vec<&ProcessRecord> = self.processes.iter().collect();
        sorted.sort_by_key(|p| p.pid);
        sorted
    }

    pub fn top_by_memory(&self, n: usize) -> Vec<&ProcessRecord> {
        self.sorted_by_memory().into_iter().take(n).collect()
    }
}
