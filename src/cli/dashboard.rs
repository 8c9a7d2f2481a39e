//! Live dashboard rendering
//!
//! Renderers consume `DeviceSnapshot`s only. `TextRenderer` writes frames to
//! any `Write`; `TerminalDashboard` owns the terminal in raw mode on the
//! alternate screen. `KeyboardInput` reads the quit keys while it is active.

use crate::device::snapshot::DeviceSnapshot;
use crate::domain::memory::format_bytes;
use crate::services::monitor::InputSource;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute, queue,
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

/// Width used when the terminal size is unknown
pub const DEFAULT_WIDTH: usize = 100;

/// Consumes snapshots and produces output
pub trait Renderer {
    fn render(&mut self, snapshot: &DeviceSnapshot) -> io::Result<()>;
}

/// What the dashboard shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardOptions {
    pub show_processes: bool,
    pub max_processes: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            show_processes: true,
            max_processes: 32,
        }
    }
}

/// Which part of a label survives truncation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justify {
    /// Keep the start
    Left,
    /// Keep both ends
    Middle,
    /// Keep the end
    Right,
}

/// Shorten `label` to at most `width` characters using `...`
pub fn fit_label(label: &str, width: usize, justify: Justify) -> String {
    let chars: Vec<char> = label.chars().collect();
    if chars.len() <= width {
        return label.to_string();
    }
    if width <= 3 {
        return ".".repeat(width);
    }

    let keep = width - 3;
    match justify {
        Justify::Left => format!("{}...", chars[..keep].iter().collect::<String>()),
        Justify::Right => format!(
            "...{}",
            chars[chars.len() - keep..].iter().collect::<String>()
        ),
        Justify::Middle => {
            let tail = keep / 2;
            let head = keep - tail;
            format!(
                "{}...{}",
                chars[..head].iter().collect::<String>(),
                chars[chars.len() - tail..].iter().collect::<String>()
            )
        }
    }
}

/// `label [ 42% ######      ]` filling `width` columns
///
/// The percentage is clamped to 0..=100 for display.
pub fn utilization_bar(width: usize, utilization: f64, label: &str) -> String {
    let label_width = (width / 4).saturating_sub(1);
    let bar_width = (width * 3 / 4).saturating_sub(2);
    let shown = utilization.clamp(0.0, 100.0);

    let mut bar: Vec<char> = (0..bar_width)
        .map(|i| {
            if (i as f64) < bar_width as f64 * shown / 100.0 {
                '#'
            } else {
                ' '
            }
        })
        .collect();

    let percent = format!(" {:3.0}% ", shown);
    if bar_width > percent.len() + 1 {
        for (slot, c) in bar.iter_mut().skip(1).zip(percent.chars()) {
            *slot = c;
        }
    }

    format!(
        "{:<label_width$} [{}]",
        fit_label(label, label_width, Justify::Right),
        bar.into_iter().collect::<String>(),
        label_width = label_width
    )
}

/// Lay out one dashboard frame
pub fn render_frame(snapshot: &DeviceSnapshot, width: usize, options: &DashboardOptions) -> Vec<String> {
    let p = &snapshot.properties;
    let mut lines = Vec::new();

    lines.push(fit_label(
        &format!(
            "Device {}: {} ({})  BDF {}",
            snapshot.index,
            p.pci_id(),
            p.display_name(),
            snapshot.pci.address
        ),
        width,
        Justify::Left,
    ));

    let temperature = match snapshot.max_temperature() {
        Some(t) if t.is_critical() => format!("{} (critical)", t),
        Some(t) if t.is_high() => format!("{} (high)", t),
        Some(t) => t.to_string(),
        None => "N/A".into(),
    };
    let memory = snapshot
        .memory
        .map(|m| {
            format!(
                "{} / {} used ({:.0}%)",
                format_bytes(m.used()),
                format_bytes(m.total),
                m.used_percent()
            )
        })
        .unwrap_or_else(|| "N/A".into());
    lines.push(format!(
        "Temperature: {}   Power: {}   Memory: {}",
        temperature,
        snapshot.total_power(),
        memory
    ));
    lines.push(String::new());

    lines.push("Engines".to_string());
    for engine in &snapshot.engines {
        let label = if engine.on_subdevice {
            format!("{}.{}", engine.group.name(), engine.subdevice_id)
        } else {
            engine.group.name().to_string()
        };
        lines.push(utilization_bar(width, engine.utilization, &label));
    }

    if !snapshot.power_domains.is_empty() {
        lines.push(String::new());
        lines.push("Power".to_string());
        for (i, domain) in snapshot.power_domains.iter().enumerate() {
            lines.push(format!("  {}: {}", i, domain.power));
        }
    }

    if !snapshot.psus.is_empty() {
        lines.push(String::new());
        for (i, psu) in snapshot.psus.iter().enumerate() {
            lines.push(format!(
                "PSU {}: voltage {}{}",
                i,
                psu.state.voltage_status,
                if psu.state.fan_failed { ", fan failed" } else { "" }
            ));
        }
    }

    if options.show_processes {
        let processes = snapshot.processes.sorted_by_memory();
        lines.push(String::new());
        lines.push(format!("Processes ({})", processes.len()));
        lines.push(format!(
            "{:>8}  {:>10}  {:>10}  {:<16}  COMMAND",
            "PID", "MEMORY", "SHARED", "ENGINES"
        ));
        let command_width = width.saturating_sub(8 + 2 + 10 + 2 + 10 + 2 + 16 + 2);
        for process in processes.into_iter().take(options.max_processes) {
            lines.push(format!(
                "{:>8}  {:>10}  {:>10}  {:<16}  {}",
                process.pid,
                format_bytes(process.mem_size),
                format_bytes(process.shared_size),
                fit_label(&process.engines.to_string(), 16, Justify::Left),
                fit_label(&process.command_line, command_width, Justify::Middle)
            ));
        }
    }

    lines
}

/// Writes frames as plain text, separated by a blank line
pub struct TextRenderer<W: Write> {
    out: W,
    width: usize,
    options: DashboardOptions,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W, width: usize, options: DashboardOptions) -> Self {
        Self {
            out,
            width,
            options,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, snapshot: &DeviceSnapshot) -> io::Result<()> {
        for line in render_frame(snapshot, self.width, &self.options) {
            writeln!(self.out, "{}", line)?;
        }
        writeln!(self.out)?;
        self.out.flush()
    }
}

/// Writes one JSON object per frame
pub struct JsonRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn render(&mut self, snapshot: &DeviceSnapshot) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, snapshot).map_err(io::Error::other)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

/// Full-screen dashboard on the alternate screen
///
/// The terminal is restored when this value is dropped.
pub struct TerminalDashboard {
    stdout: Stdout,
    options: DashboardOptions,
}

impl TerminalDashboard {
    pub fn enter(options: DashboardOptions) -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        Ok(Self { stdout, options })
    }
}

impl Renderer for TerminalDashboard {
    fn render(&mut self, snapshot: &DeviceSnapshot) -> io::Result<()> {
        let (columns, rows) = terminal::size().unwrap_or((DEFAULT_WIDTH as u16, 50));
        let mut lines = render_frame(snapshot, columns as usize, &self.options);
        lines.truncate((rows as usize).saturating_sub(1));
        lines.push("q: quit".to_string());

        queue!(
            self.stdout,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0)
        )?;
        for line in lines {
            // Raw mode needs explicit carriage returns
            write!(self.stdout, "{}\r\n", line)?;
        }
        self.stdout.flush()
    }
}

/// Quit keys from the terminal: `q`, `Esc` or Ctrl-C
///
/// Needs raw mode, so it is only useful alongside a `TerminalDashboard`.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyboardInput;

impl KeyboardInput {
    fn is_quit(event: &Event) -> bool {
        let Event::Key(key) = event else {
            return false;
        };
        if key.kind != KeyEventKind::Press {
            return false;
        }
        matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
    }
}

impl InputSource for KeyboardInput {
    fn wait_for_quit(&mut self, timeout: Duration) -> io::Result<bool> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !event::poll(remaining)? {
                return Ok(false);
            }
            if Self::is_quit(&event::read()?) {
                return Ok(true);
            }
            if remaining.is_zero() {
                return Ok(false);
            }
        }
    }
}

impl Drop for TerminalDashboard {
    fn drop(&mut self) {
        let _ = execute!(self.stdout, cursor::Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}
