//! Refresh loop
//!
//! Single-threaded and poll-driven: each tick refreshes temperatures, then
//! rates, then processes, and then renders a snapshot. The only cancellation
//! point is the wait between ticks.

use crate::cli::dashboard::Renderer;
use crate::device::{Device, DeviceSnapshot, RefreshFailure, ResourceId};
use crate::error::AppError;
use crate::sysman::Sysman;

use std::collections::HashSet;
use std::io;
use std::time::Duration;

/// Configuration for the monitor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Interval between ticks
    pub interval: Duration,
    /// Stop after this many ticks
    pub iterations: Option<u64>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(1000),
            iterations: None,
        }
    }
}

/// Where the loop waits between ticks
pub trait InputSource {
    /// Block for up to `timeout`; `Ok(true)` means the user asked to quit
    fn wait_for_quit(&mut self, timeout: Duration) -> io::Result<bool>;
}

/// Sleeps through the interval and never quits
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInput;

impl InputSource for NoInput {
    fn wait_for_quit(&mut self, timeout: Duration) -> io::Result<bool> {
        std::thread::sleep(timeout);
        Ok(false)
    }
}

/// Sub-resources that failed during one tick
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub failures: Vec<RefreshFailure>,
    /// Resources in `failures` that succeeded on the previous tick
    pub new_failures: Vec<ResourceId>,
}

impl TickReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Drives one device through refresh ticks
pub struct Monitor {
    config: MonitorConfig,
    failing: HashSet<ResourceId>,
}

impl Monitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            failing: HashSet::new(),
        }
    }

    /// Refresh every sub-resource once
    ///
    /// Values that failed to refresh keep their previous reading. A failure
    /// is logged at `warn` when it starts and at `debug` while it repeats,
    /// so a persistent one does not flood stderr under the dashboard.
    pub fn tick<S: Sysman + ?Sized>(&mut self, device: &mut Device, sysman: &S) -> TickReport {
        let failures = device.refresh(sysman);
        let mut new_failures = Vec::new();

        for failure in &failures {
            if self.failing.contains(&failure.resource) {
                log::debug!("{}: {}", device.properties().pci_id(), failure);
            } else {
                log::warn!("{}: {}", device.properties().pci_id(), failure);
                new_failures.push(failure.resource);
            }
        }
        self.failing = failures.iter().map(|f| f.resource).collect();

        TickReport {
            failures,
            new_failures,
        }
    }

    /// Tick, render and wait until the user quits or the iteration limit
    /// is reached. Returns the number of ticks run.
    pub fn run<S, R, I>(
        &mut self,
        device: &mut Device,
        index: usize,
        sysman: &S,
        renderer: &mut R,
        input: &mut I,
    ) -> Result<u64, AppError>
    where
        S: Sysman + ?Sized,
        R: Renderer + ?Sized,
        I: InputSource + ?Sized,
    {
        let mut ticks = 0;
        loop {
            self.tick(device, sysman);
            ticks += 1;

            renderer.render(&DeviceSnapshot::capture(index, device, sysman))?;

            if self.config.iterations.is_some_and(|limit| ticks >= limit) {
                log::debug!("Stopping after {} tick(s)", ticks);
                break;
            }

            if input.wait_for_quit(self.config.interval)? {
                break;
            }
        }

        Ok(ticks)
    }

    /// Get the monitor configuration
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }
}
