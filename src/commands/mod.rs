//! Command handlers
//!
//! Each command handler orchestrates the execution of a CLI command against
//! an already discovered `DeviceRegistry`.

pub mod info;
pub mod list;
pub mod processes;
pub mod top;

pub use info::run_info;
pub use list::run_list;
pub use processes::run_processes;
pub use top::run_top;

use crate::cli::args::{Cli, Commands, TopArgs};
use crate::config::Config;
use crate::device::DeviceRegistry;
use crate::error::{AppError, Result};
use crate::selector::DeviceSelector;
use crate::sysman::Sysman;

/// Discover devices; an empty result is an error
pub fn discover<S: Sysman + ?Sized>(sysman: &S) -> Result<DeviceRegistry> {
    let discovery = DeviceRegistry::discover(sysman)?;
    if discovery.registry.is_empty() {
        return Err(match discovery.failures.into_iter().next() {
            Some(e) => AppError::DeviceInit(e),
            None => AppError::NoDevicesFound,
        });
    }
    log::debug!(
        "Discovered {} device(s), {} skipped",
        discovery.registry.len(),
        discovery.failures.len()
    );
    Ok(discovery.registry)
}

/// 0-based registry position for a selector string
pub fn select_device(registry: &DeviceRegistry, input: &str) -> Result<usize> {
    let selector = DeviceSelector::parse(input);
    Ok(registry.find(&selector)?)
}

fn selected(registry: &DeviceRegistry, config: &Config) -> Result<Option<usize>> {
    config
        .device
        .selector
        .as_deref()
        .map(|input| select_device(registry, input))
        .transpose()
}

/// Run the command named on the command line
///
/// With no command, a configured selector opens the dashboard on that
/// device; otherwise the devices are listed.
pub fn dispatch<S: Sysman + ?Sized>(
    cli: &Cli,
    config: &Config,
    sysman: &S,
    registry: &mut DeviceRegistry,
) -> Result<()> {
    match &cli.command {
        Some(Commands::List) => run_list(registry, cli.format),
        Some(Commands::Info) => {
            let device = selected(registry, config)?;
            run_info(registry, sysman, device, cli.format)
        }
        Some(Commands::Processes(args)) => {
            let device = selected(registry, config)?;
            run_processes(registry, sysman, device, args, cli.format)
        }
        Some(Commands::Top(args)) => {
            let device = selected(registry, config)?.unwrap_or(0);
            run_top(registry, sysman, device, args, config, cli.format)
        }
        None => match selected(registry, config)? {
            Some(index) => run_top(
                registry,
                sysman,
                index,
                &TopArgs::default(),
                config,
                cli.format,
            ),
            None => run_list(registry, cli.format),
        },
        // Handled before the driver is loaded
        Some(Commands::Completions { .. }) => Ok(()),
    }
}
