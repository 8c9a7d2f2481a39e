//! Service layer
//!
//! The refresh loop that drives a device between the driver and a renderer.

pub mod monitor;

pub use monitor::{InputSource, Monitor, MonitorConfig, NoInput, TickReport};
