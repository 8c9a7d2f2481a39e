//! Top command implementation
//!
//! Live dashboard for one device. On a terminal it takes over the screen
//! until `q` is pressed; otherwise frames are streamed to stdout.

use crate::cli::args::{OutputFormat, TopArgs};
use crate::cli::dashboard::{
    JsonRenderer, KeyboardInput, TerminalDashboard, TextRenderer, DEFAULT_WIDTH,
};
use crate::config::Config;
use crate::device::DeviceRegistry;
use crate::error::{AppError, Result};
use crate::services::{Monitor, MonitorConfig, NoInput};
use crate::sysman::Sysman;

use std::io::{self, IsTerminal};

/// Execute the top command on the device at `index` (0-based)
pub fn run_top<S: Sysman + ?Sized>(
    registry: &mut DeviceRegistry,
    sysman: &S,
    index: usize,
    args: &TopArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let device = registry.get_mut(index).ok_or(AppError::NoDevicesFound)?;
    let mut monitor = Monitor::new(MonitorConfig {
        interval: config.interval(),
        iterations: args.iterations,
    });
    let options = config.dashboard.options();

    let ticks = match format {
        OutputFormat::Table if io::stdout().is_terminal() => {
            let mut dashboard = TerminalDashboard::enter(options)?;
            monitor.run(device, index + 1, sysman, &mut dashboard, &mut KeyboardInput)?
        }
        OutputFormat::Table => {
            let mut renderer = TextRenderer::new(io::stdout().lock(), DEFAULT_WIDTH, options);
            monitor.run(device, index + 1, sysman, &mut renderer, &mut NoInput)?
        }
        OutputFormat::Json | OutputFormat::Compact => {
            let mut renderer = JsonRenderer::new(io::stdout().lock());
            monitor.run(device, index + 1, sysman, &mut renderer, &mut NoInput)?
        }
    };

    log::debug!("Dashboard exited after {} tick(s)", ticks);
    Ok(())
}
