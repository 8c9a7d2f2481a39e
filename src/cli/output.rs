//! Output formatting utilities
//!
//! Provides table, JSON and compact output for CLI commands.

use crate::cli::args::OutputFormat;
use crate::device::snapshot::DeviceSnapshot;
use crate::device::Device;
use crate::domain::memory::format_bytes;
use crate::domain::power::format_limit;
use crate::domain::ProcessRecord;
use serde::Serialize;
use std::io::{self, Write};

/// Format and print output based on the selected format
pub fn print_output<T: Serialize + TableDisplay>(data: &T, format: OutputFormat) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_output(&mut handle, data, format)
}

/// Like `print_output`, into any writer
pub fn write_output<W: Write, T: Serialize + TableDisplay>(
    out: &mut W,
    data: &T,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Table => writeln!(out, "{}", data.to_table()),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data).map_err(io::Error::other)?;
            writeln!(out, "{}", json)
        }
        OutputFormat::Compact => writeln!(out, "{}", data.to_compact()),
    }
}

/// Trait for types that can be displayed as a table
pub trait TableDisplay {
    /// Format as a table string
    fn to_table(&self) -> String;

    /// Format as a compact single line
    fn to_compact(&self) -> String {
        self.to_table().replace('\n', " | ")
    }
}

/// Device list entry for display
#[derive(Debug, Clone, Serialize)]
pub struct DeviceListEntry {
    /// 1-based
    pub index: usize,
    pub pci_id: String,
    pub bdf: String,
    pub uuid: String,
    pub name: String,
}

impl DeviceListEntry {
    pub fn new(index: usize, device: &Device) -> Self {
        let properties = device.properties();
        Self {
            index,
            pci_id: properties.pci_id().to_string(),
            bdf: device.pci().address.to_string(),
            uuid: properties.uuid.to_string(),
            name: properties.display_name().to_string(),
        }
    }
}

impl TableDisplay for DeviceListEntry {
    fn to_table(&self) -> String {
        format!("Device {}: {} ({})", self.index, self.pci_id, self.name)
    }

    fn to_compact(&self) -> String {
        format!("{}:{}", self.index, self.pci_id)
    }
}

/// Device list for display
#[derive(Debug, Clone, Serialize)]
pub struct DeviceList {
    pub devices: Vec<DeviceListEntry>,
}

impl TableDisplay for DeviceList {
    fn to_table(&self) -> String {
        let mut output = String::new();
        for device in &self.devices {
            output.push_str(&device.to_table());
            output.push('\n');
        }
        output.trim_end().to_string()
    }

    fn to_compact(&self) -> String {
        self.devices
            .iter()
            .map(|d| d.to_compact())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

impl TableDisplay for DeviceSnapshot {
    fn to_table(&self) -> String {
        let p = &self.properties;
        let mut out = String::new();

        out.push_str(&format!("Device {}: {} ({})\n", self.index, p.pci_id(), p.display_name()));
        out.push_str(&format!("  UUID: {}\n", p.uuid));
        out.push_str(&format!("  BDF: {}\n", self.pci.address));
        out.push_str(&format!("  PCI ID: {}\n", p.pci_id()));
        out.push_str(&format!("  Subdevices: {}\n", p.num_subdevices));
        out.push_str(&format!("  Serial Number: {}\n", p.serial_number));
        out.push_str(&format!("  Board Number: {}\n", p.board_number));
        out.push_str(&format!("  Brand Name: {}\n", p.brand_name));
        out.push_str(&format!("  Model Name: {}\n", p.model_name));
        out.push_str(&format!("  Vendor Name: {}\n", p.vendor_name));
        out.push_str(&format!("  Driver Version: {}\n", p.driver_version));
        out.push_str(&format!(
            "  Type: {}\n",
            p.kind.map(|k| k.to_string()).unwrap_or_else(|| "UNKNOWN".into())
        ));
        out.push_str(&format!(
            "  Integrated: {}  Subdevice: {}  ECC: {}  On-demand paging: {}\n",
            yes_no(p.flags.integrated),
            yes_no(p.flags.sub_device),
            yes_no(p.flags.ecc),
            yes_no(p.flags.on_demand_paging)
        ));

        out.push_str(&format!("  Engines: {}\n", self.engines.len()));
        for (i, engine) in self.engines.iter().enumerate() {
            if engine.on_subdevice {
                out.push_str(&format!(
                    "    {}: {} (subdevice {})\n",
                    i, engine.group, engine.subdevice_id
                ));
            } else {
                out.push_str(&format!("    {}: {}\n", i, engine.group));
            }
        }

        out.push_str(&format!("  Temperature sensors: {}\n", self.temperatures.len()));
        for (i, reading) in self.temperatures.iter().enumerate() {
            match reading {
                Some(t) => out.push_str(&format!("    {}: {}\n", i, t)),
                None => out.push_str(&format!("    {}: N/A\n", i)),
            }
        }

        out.push_str(&format!("  Power domains: {}\n", self.power_domains.len()));
        for (i, domain) in self.power_domains.iter().enumerate() {
            let props = &domain.properties;
            out.push_str(&format!(
                "    {}: can control: {}, energy threshold: {}, default limit: {}{}\n",
                i,
                yes_no(props.can_control),
                yes_no(props.energy_threshold_supported),
                format_limit(props.default_limit_mw),
                if props.on_subdevice {
                    format!(", subdevice {}", props.subdevice_id)
                } else {
                    String::new()
                }
            ));
        }

        out.push_str(&format!("  PSUs: {}\n", self.psus.len()));
        for (i, psu) in self.psus.iter().enumerate() {
            let amp_limit = if psu.properties.amp_limit < 0 {
                "N/A".to_string()
            } else {
                format!("{} A", psu.properties.amp_limit)
            };
            out.push_str(&format!(
                "    {}: fan: {}, amp limit: {}, voltage: {}\n",
                i,
                yes_no(psu.properties.have_fan),
                amp_limit,
                psu.state.voltage_status
            ));
        }

        match &self.memory {
            Some(memory) => out.push_str(&format!(
                "  Memory: {} free of {}",
                format_bytes(memory.free),
                format_bytes(memory.total)
            )),
            None => out.push_str("  Memory: N/A"),
        }

        out
    }

    fn to_compact(&self) -> String {
        let memory = self
            .memory
            .map(|m| format!("{:.0}%", m.used_percent()))
            .unwrap_or_else(|| "N/A".into());
        format!(
            "{}:{} {} power={} mem={}",
            self.index,
            self.properties.pci_id(),
            self.properties.display_name(),
            self.total_power(),
            memory
        )
    }
}

/// Several device snapshots
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct DeviceInfoList(pub Vec<DeviceSnapshot>);

impl TableDisplay for DeviceInfoList {
    fn to_table(&self) -> String {
        self.0
            .iter()
            .map(|d| d.to_table())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn to_compact(&self) -> String {
        self.0
            .iter()
            .map(|d| d.to_compact())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Process table for one device
#[derive(Debug, Clone, Serialize)]
pub struct ProcessTable {
    pub device_index: usize,
    pub processes: Vec<ProcessRecord>,
    pub total_mem_size: u64,
}

impl TableDisplay for ProcessTable {
    fn to_table(&self) -> String {
        let mut out = format!(
            "Device {}: {} process(es), {} total\n",
            self.device_index,
            self.processes.len(),
            format_bytes(self.total_mem_size)
        );
        if self.processes.is_empty() {
            out.push_str("  No processes");
            return out;
        }

        out.push_str(&format!(
            "  {:>8}  {:>10}  {:>10}  {:<16}  COMMAND\n",
            "PID", "MEMORY", "SHARED", "ENGINES"
        ));
        for p in &self.processes {
            out.push_str(&format!(
                "  {:>8}  {:>10}  {:>10}  {:<16}  {}\n",
                p.pid,
                format_bytes(p.mem_size),
                format_bytes(p.shared_size),
                p.engines.to_string(),
                p.command_line
            ));
        }
        out.trim_end().to_string()
    }

    fn to_compact(&self) -> String {
        self.processes
            .iter()
            .map(|p| format!("{}:{}", p.pid, p.mem_size))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
