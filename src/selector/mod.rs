//! Device selection
//!
//! Classifies a free-form `--device` argument into a typed selector.
//! Patterns are tried in a fixed order so ambiguous strings resolve the
//! same way every time:
//!
//! 1. decimal digits: 1-based index
//! 2. `XXXX:XXXX:XXXX:XXXX`: PCI domain:bus:device:function
//! 3. `XXXX:XXXX`: PCI vendor:device
//! 4. `8-4-4-4-12` hex: device UUID
//! 5. anything else: a render node path resolved through sysfs

pub mod render_node;

use crate::domain::{DeviceUuid, PciAddress, PciId};
use std::fmt;
use std::path::{Path, PathBuf};

/// What a selector identifies
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorTarget {
    /// 1-based position in discovery order
    Index(u32),
    PciId(PciId),
    Bdf(PciAddress),
    Uuid(DeviceUuid),
    /// Render node resolved to the PCI id of its parent device
    RenderNode { path: PathBuf, pci_id: PciId },
    Invalid,
}

/// Parsed `--device` argument, keeping the text it was parsed from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSelector {
    target: SelectorTarget,
    input: String,
}

impl DeviceSelector {
    /// Parse against the system DRM class directory
    pub fn parse(input: &str) -> Self {
        Self::parse_with(input, Path::new(render_node::DRM_CLASS_DIR))
    }

    /// Parse, resolving render node paths under `drm_dir`
    pub fn parse_with(input: &str, drm_dir: &Path) -> Self {
        Self {
            target: classify(input, drm_dir),
            input: input.to_string(),
        }
    }

    pub fn target(&self) -> &SelectorTarget {
        &self.target
    }

    /// The text this selector was parsed from
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_valid(&self) -> bool {
        self.target != SelectorTarget::Invalid
    }
}

impl fmt::Display for DeviceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.input)
    }
}

fn classify(input: &str, drm_dir: &Path) -> SelectorTarget {
    if !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit()) {
        // Digits never fall through to the hex forms
        return match input.parse::<u32>() {
            Ok(index) => SelectorTarget::Index(index),
            Err(_) => SelectorTarget::Invalid,
        };
    }

    if let Some([domain, bus, device, function]) = hex_groups::<4>(input) {
        return SelectorTarget::Bdf(PciAddress::new(domain, bus, device, function));
    }

    if let Some([vendor, device]) = hex_groups::<2>(input) {
        return SelectorTarget::PciId(PciId::new(vendor, device));
    }

    if let Ok(uuid) = input.parse::<DeviceUuid>() {
        return SelectorTarget::Uuid(uuid);
    }

    if !input.is_empty() {
        if let Some(pci_id) = render_node::pci_id_for_render_node(Path::new(input), drm_dir) {
            return SelectorTarget::RenderNode {
                path: PathBuf::from(input),
                pci_id,
            };
        }
    }

    SelectorTarget::Invalid
}

/// Split `input` into exactly `N` colon-separated groups of four hex digits
fn hex_groups<const N: usize>(input: &str) -> Option<[u32; N]> {
    let mut values = [0u32; N];
    let mut parts = input.split(':');

    for value in values.iter_mut() {
        let part = parts.next()?;
        if part.len() != 4 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        *value = u32::from_str_radix(part, 16).ok()?;
    }

    match parts.next() {
        Some(_) => None,
        None => Some(values),
    }
}
