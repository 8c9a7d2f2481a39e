//! zemon - Level Zero Sysman accelerator monitor
//!
//! This library discovers devices through the Level Zero Sysman API, turns
//! their raw counters into utilization and power rates, and renders them as
//! device lists, info dumps, process tables and a live dashboard.
//!
//! # Modules
//!
//! - [`cli`]: Command-line interface, output formatting and dashboard
//! - [`commands`]: Command handlers
//! - [`config`]: Configuration system
//! - [`device`]: Device model, rate sampling and discovery
//! - [`domain`]: Domain value types
//! - [`error`]: Error types
//! - [`selector`]: Device selector parsing
//! - [`services`]: Refresh loop
//! - [`sysman`]: Sysman driver abstraction and loader

pub mod cli;
pub mod commands;
pub mod config;
pub mod device;
pub mod domain;
pub mod error;
pub mod selector;
pub mod services;
pub mod sysman;

#[cfg(test)]
pub mod mock;

pub use error::{AppError, Result};
