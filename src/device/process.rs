//! Process monitoring
//!
//! The driver's process list is re-queried on every refresh into a buffer of
//! fixed capacity and replaces the previous set in full. Command lines come
//! from a `CommandLineSource` so tests do not depend on `/proc`.

use crate::domain::{ProcessList, ProcessRecord, ProcessState};
use crate::error::SysmanError;
use crate::sysman::{DeviceHandle, Sysman};

use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Upper bound on processes fetched per refresh
pub const MAX_PROCESSES: usize = 2048;

/// Shown when a process's command line cannot be read
pub const UNAVAILABLE: &str = "N/A";

/// Looks up a process's command line by pid
pub trait CommandLineSource: Send + Sync + fmt::Debug {
    /// Best effort; never fails, returns a placeholder instead
    fn command_line(&self, pid: u32) -> String;
}

/// Reads `/proc/<pid>/cmdline`, falling back to `comm` for kernel threads
#[derive(Debug, Clone)]
pub struct ProcfsCommandLine {
    root: PathBuf,
}

impl ProcfsCommandLine {
    pub fn new() -> Self {
        Self::with_root("/proc")
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for ProcfsCommandLine {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandLineSource for ProcfsCommandLine {
    fn command_line(&self, pid: u32) -> String {
        let dir = self.root.join(pid.to_string());

        let Ok(raw) = fs::read(dir.join("cmdline")) else {
            return UNAVAILABLE.to_string();
        };
        let cmdline = String::from_utf8_lossy(&raw).replace('\0', " ");
        let cmdline = cmdline.trim();
        if !cmdline.is_empty() {
            return cmdline.to_string();
        }

        match fs::read_to_string(dir.join("comm")) {
            Ok(comm) if !comm.trim().is_empty() => format!("[{}]", comm.trim()),
            _ => UNAVAILABLE.to_string(),
        }
    }
}

/// Per-device process list
#[derive(Debug)]
pub struct ProcessMonitor {
    capacity: usize,
    records: ProcessList,
    source: Box<dyn CommandLineSource>,
}

impl ProcessMonitor {
    pub fn new() -> Self {
        Self::with_capacity(MAX_PROCESSES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            records: ProcessList::default(),
            source: Box::new(ProcfsCommandLine::new()),
        }
    }

    pub fn with_source(mut self, source: Box<dyn CommandLineSource>) -> Self {
        self.source = source;
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Query the driver and replace the stored records
    ///
    /// An undersized buffer is retried once with the count clamped to the
    /// capacity; if that is still too small the list is truncated to the
    /// capacity. Any other failure returns the error and keeps the previous
    /// records.
    pub fn refresh<S: Sysman + ?Sized>(
        &mut self,
        sysman: &S,
        device: DeviceHandle,
    ) -> Result<&ProcessList, SysmanError> {
        let mut states = vec![ProcessState::default(); self.capacity];
        let mut count = self.capacity as u32;

        match sysman.process_states(device, &mut count, &mut states) {
            Ok(()) => {}
            Err(e) if e.is_invalid_size() => {
                let needed = count;
                count = count.min(self.capacity as u32);
                log::debug!(
                    "Process buffer too small ({} reported), retrying with {}",
                    needed,
                    count
                );
                let limit = count;
                match sysman.process_states(device, &mut count, &mut states) {
                    Ok(()) => {}
                    Err(e) if e.is_invalid_size() => {
                        log::debug!(
                            "{} processes reported, keeping the first {}",
                            count,
                            limit
                        );
                        count = limit;
                    }
                    Err(e) => return Err(e),
                }
            }
            Err(e) => return Err(e),
        }

        let records = states
            .iter()
            .take(count as usize)
            .map(|state| ProcessRecord::new(*state, self.source.command_line(state.pid)))
            .collect();
        self.records = ProcessList::new(records);
        Ok(&self.records)
    }

    /// Records from the last successful refresh
    pub fn processes(&self) -> &ProcessList {
        &self.records
    }
}

impl Default for ProcessMonitor {
    fn default() -> Self {
        Self::new()
    }
}
