//! zemon - Level Zero Sysman accelerator monitor
//!
//! A command-line tool for watching engine utilization, power, temperature,
//! memory and processes on Level Zero devices.

use clap::Parser;
use zemon::cli::args::{generate_completions, Cli, Commands, OutputFormat};
use zemon::commands::{discover, dispatch, run_list};
use zemon::config::ConfigBuilder;
use zemon::error::{AppError, SelectorError, SysmanError};
use zemon::sysman::LevelZero;

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Set log level based on verbose flag
    if cli.verbose {
        log::set_max_level(log::LevelFilter::Debug);
    }

    // Run the appropriate command
    let result = run(&cli);

    if let Err(e) = result {
        log::error!("{}", e);
        print_error(&e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    if let Some(Commands::Completions { shell }) = &cli.command {
        generate_completions(*shell);
        return Ok(());
    }

    let config = ConfigBuilder::new()
        .with_file(cli.config.as_deref())?
        .with_verbose(cli.verbose.then_some(true))
        .with_interval(cli.interval)
        .with_device(cli.device.clone())
        .build()?;

    if config.general.verbose {
        log::set_max_level(log::LevelFilter::Debug);
    }

    let sysman = LevelZero::new()?;
    let mut registry = discover(&sysman)?;

    match dispatch(cli, &config, &sysman, &mut registry) {
        Err(err @ AppError::Selector(SelectorError::NotFound(_))) => {
            print_error(&err);
            eprintln!();
            eprintln!("Available devices:");
            run_list(&registry, OutputFormat::Table)?;
            std::process::exit(1);
        }
        other => other,
    }
}

fn print_error(err: &AppError) {
    eprintln!("Error: {}", err);

    // Print helpful hints for common errors
    match err {
        AppError::Sysman(SysmanError::LibraryNotFound(_)) => {
            eprintln!();
            eprintln!("Hint: Install the Level Zero loader (libze_loader.so.1).");
            eprintln!("      Sysman may also need ZES_ENABLE_SYSMAN=1 on older drivers.");
        }
        AppError::Sysman(e) if e.is_permission_denied() => {
            eprintln!();
            eprintln!("Hint: Try running as root or add your user to the 'render' group.");
        }
        AppError::Selector(SelectorError::Invalid(_)) => {
            eprintln!();
            eprintln!("Hint: Use a 1-based index, VVVV:DDDD, DDDD:BBBB:DDDD:FFFF,");
            eprintln!("      a UUID, or a render node such as /dev/dri/renderD128.");
        }
        AppError::NoDevicesFound => {
            eprintln!();
            eprintln!("Hint: Make sure a Level Zero GPU driver is installed.");
            eprintln!("      Check that /dev/dri/renderD* is present.");
        }
        _ => {}
    }
}
