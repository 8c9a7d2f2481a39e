//! Render node to PCI id resolution
//!
//! A render node such as `/dev/dri/renderD128` is matched by minor number
//! against the `renderD<N>` entries of the DRM class directory. The matching
//! entry is resolved to its real sysfs path and walked upward until a
//! directory carries both `vendor` and `device` attribute files.

use crate::domain::PciId;
use crate::error::DomainError;
use std::fs;
use std::path::Path;

/// Where the kernel lists DRM devices
pub const DRM_CLASS_DIR: &str = "/sys/class/drm";

const RENDER_PREFIX: &str = "renderD";

/// Resolve a render node path to its PCI vendor:device pair
///
/// Returns `None` when the path cannot be stat'ed, no DRM entry has the
/// same minor number, or no PCI ancestor is found.
pub fn pci_id_for_render_node(path: &Path, drm_dir: &Path) -> Option<PciId> {
    let minor = device_minor(path)?;
    pci_id_for_minor(minor, drm_dir)
}

#[cfg(unix)]
fn device_minor(path: &Path) -> Option<u32> {
    use std::os::unix::fs::MetadataExt;

    let metadata = fs::metadata(path)
        .map_err(|e| log::debug!("Cannot stat {}: {}", path.display(), e))
        .ok()?;

    #[allow(unused_unsafe)]
    let minor = unsafe { libc::minor(metadata.rdev() as libc::dev_t) };
    Some(minor as u32)
}

#[cfg(not(unix))]
fn device_minor(_path: &Path) -> Option<u32> {
    None
}

/// Find the `renderD<minor>` entry under `drm_dir` and walk to its PCI device
pub fn pci_id_for_minor(minor: u32, drm_dir: &Path) -> Option<PciId> {
    let entries = fs::read_dir(drm_dir).ok()?;

    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(entry_minor) = name
            .to_str()
            .and_then(|n| n.strip_prefix(RENDER_PREFIX))
            .and_then(|n| n.parse::<u32>().ok())
        else {
            continue;
        };
        if entry_minor != minor {
            continue;
        }

        let real_path = fs::canonicalize(entry.path()).ok()?;
        return real_path.ancestors().find_map(read_pci_id);
    }

    None
}

/// Read `vendor` and `device` from a sysfs directory, if both exist
fn read_pci_id(dir: &Path) -> Option<PciId> {
    let vendor_path = dir.join("vendor");
    let device_path = dir.join("device");
    if !vendor_path.is_file() || !device_path.is_file() {
        return None;
    }

    let vendor = parse_sysfs_hex(&fs::read_to_string(vendor_path).ok()?).ok()?;
    let device = parse_sysfs_hex(&fs::read_to_string(device_path).ok()?).ok()?;

    if vendor == 0 || device == 0 {
        return None;
    }
    Some(PciId::new(vendor, device))
}

/// Parse a sysfs hex attribute such as `0x8086\n`
pub fn parse_sysfs_hex(text: &str) -> Result<u32, DomainError> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    u32::from_str_radix(digits, 16).map_err(|_| DomainError::InvalidHex(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Build a minimal sysfs tree:
    /// devices/pci0000:00/0000:03:00.0/{vendor,device,drm/renderD<minor>}
    /// class/drm/renderD<minor> -> the drm entry
    fn sysfs_fixture(minor: u32, vendor: &str, device: &str) -> (TempDir, PathBuf) {
        let root = TempDir::new().unwrap();
        let pci = root.path().join("devices/pci0000:00/0000:03:00.0");
        let node = pci.join(format!("drm/renderD{}", minor));
        fs::create_dir_all(&node).unwrap();
        fs::write(pci.join("vendor"), vendor).unwrap();
        fs::write(pci.join("device"), device).unwrap();

        let class = root.path().join("class/drm");
        fs::create_dir_all(&class).unwrap();
        #[cfg(unix)]
        std::os::unix::fs::symlink(&node, class.join(format!("renderD{}", minor))).unwrap();

        (root, class)
    }

    #[test]
    fn test_parse_sysfs_hex() {
        assert_eq!(parse_sysfs_hex("0x8086\n").unwrap(), 0x8086);
        assert_eq!(parse_sysfs_hex("56c0").unwrap(), 0x56c0);
        assert!(parse_sysfs_hex("0xzz").is_err());
    }

    #[test]
    #[cfg(unix)]
    fn test_minor_resolves_to_parent_pci_device() {
        let (_root, class) = sysfs_fixture(128, "0x8086\n", "0x56c0\n");
        assert_eq!(
            pci_id_for_minor(128, &class),
            Some(PciId::new(0x8086, 0x56c0))
        );
    }

    #[test]
    #[cfg(unix)]
    fn test_unmatched_minor_is_none() {
        let (_root, class) = sysfs_fixture(128, "0x8086\n", "0x56c0\n");
        assert_eq!(pci_id_for_minor(129, &class), None);
    }

    #[test]
    #[cfg(unix)]
    fn test_zero_ids_are_not_a_match() {
        let (_root, class) = sysfs_fixture(128, "0x0000\n", "0x56c0\n");
        assert_eq!(pci_id_for_minor(128, &class), None);
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn test_render_node_path_uses_stat_minor() {
        // /dev/null is char device 1:3 on Linux
        let (_root, class) = sysfs_fixture(3, "0x8086\n", "0x56c1\n");
        assert_eq!(
            pci_id_for_render_node(Path::new("/dev/null"), &class),
            Some(PciId::new(0x8086, 0x56c1))
        );
    }

    #[test]
    fn test_missing_path_is_none() {
        let drm = TempDir::new().unwrap();
        assert_eq!(
            pci_id_for_render_node(Path::new("/nonexistent/renderD128"), drm.path()),
            None
        );
    }
}
