//! CLI argument definitions using clap derive

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Level Zero Sysman accelerator monitor
///
/// Shows engine utilization, power, temperature, memory and per-process
/// usage for devices exposed through the Level Zero Sysman API.
#[derive(Parser, Debug)]
#[command(name = "zemon")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "ZEMON_CONFIG")]
    pub config: Option<String>,

    /// Device to monitor: 1-based index, VVVV:DDDD, DDDD:BBBB:DDDD:FFFF,
    /// UUID, or a render node path such as /dev/dri/renderD128
    #[arg(short, long, global = true, value_name = "SELECTOR")]
    pub device: Option<String>,

    /// Refresh interval in milliseconds
    #[arg(short, long, global = true, value_name = "MS")]
    pub interval: Option<u64>,

    /// Command to run; defaults to `top` with --device, `list` without
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all detected devices
    List,

    /// Show static and current properties of one or all devices
    Info,

    /// Show processes using a device
    Processes(ProcessesArgs),

    /// Live dashboard for one device
    Top(TopArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for the processes command
#[derive(Parser, Debug)]
pub struct ProcessesArgs {
    /// Show only the N largest processes by memory
    #[arg(short = 'n', long)]
    pub top: Option<usize>,

    /// Sort by PID instead of memory
    #[arg(long)]
    pub sort_pid: bool,
}

/// Arguments for the top command
#[derive(Parser, Debug, Default)]
pub struct TopArgs {
    /// Exit after N refreshes
    #[arg(short = 'n', long)]
    pub iterations: Option<u64>,
}

/// Output format
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format for machine parsing
    Json,
    /// Compact single-line format
    Compact,
}

/// Generate shell completions and print to stdout
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_list() {
        let args = Cli::try_parse_from(["zemon", "list"]).unwrap();
        assert!(matches!(args.command, Some(Commands::List)));
    }

    #[test]
    fn test_cli_no_command() {
        let args = Cli::try_parse_from(["zemon"]).unwrap();
        assert!(args.command.is_none());
        assert!(args.device.is_none());
    }

    #[test]
    fn test_cli_parse_verbose() {
        let args = Cli::try_parse_from(["zemon", "-v", "list"]).unwrap();
        assert!(args.verbose);
    }

    #[test]
    fn test_cli_parse_device_selector() {
        let args = Cli::try_parse_from(["zemon", "--device", "8086:56c1"]).unwrap();
        assert_eq!(args.device.as_deref(), Some("8086:56c1"));

        let args = Cli::try_parse_from(["zemon", "info", "-d", "2"]).unwrap();
        assert_eq!(args.device.as_deref(), Some("2"));
        assert!(matches!(args.command, Some(Commands::Info)));
    }

    #[test]
    fn test_cli_parse_interval() {
        let args = Cli::try_parse_from(["zemon", "-i", "250", "top"]).unwrap();
        assert_eq!(args.interval, Some(250));
    }

    #[test]
    fn test_cli_parse_top_iterations() {
        let args = Cli::try_parse_from(["zemon", "top", "--iterations", "3"]).unwrap();
        match args.command {
            Some(Commands::Top(top)) => assert_eq!(top.iterations, Some(3)),
            other => panic!("Expected Top command, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_parse_processes() {
        let args = Cli::try_parse_from(["zemon", "processes", "--top", "5", "--sort-pid"]).unwrap();
        match args.command {
            Some(Commands::Processes(p)) => {
                assert_eq!(p.top, Some(5));
                assert!(p.sort_pid);
            }
            other => panic!("Expected Processes command, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_parse_format() {
        let args = Cli::try_parse_from(["zemon", "--format", "json", "list"]).unwrap();
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_cli_invalid_interval() {
        assert!(Cli::try_parse_from(["zemon", "-i", "fast"]).is_err());
    }

    #[test]
    fn test_cli_debug_assert() {
        Cli::command().debug_assert();
    }
}
