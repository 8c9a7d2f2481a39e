//! CLI argument parsing and output
//!
//! Uses clap for argument definitions, serde for JSON output and crossterm
//! for the live dashboard.

pub mod args;
pub mod dashboard;
pub mod output;

pub use args::{Cli, Commands};
pub use dashboard::{Renderer, TerminalDashboard, TextRenderer};
