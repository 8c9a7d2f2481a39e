//! Engine group types
//!
//! Engine groups classify hardware execution units whose utilization is
//! tracked independently.

use serde::{Serialize, Serializer};
use std::fmt;

/// Engine group type (`zes_engine_group_t`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineGroup {
    All,
    ComputeAll,
    MediaAll,
    CopyAll,
    ComputeSingle,
    RenderSingle,
    MediaDecodeSingle,
    MediaEncodeSingle,
    CopySingle,
    MediaEnhancementSingle,
    ThreeDSingle,
    ThreeDRenderComputeAll,
    RenderAll,
    ThreeDAll,
    MediaCodecSingle,
    Unknown(u32),
}

impl EngineGroup {
    /// Convert from the raw enum value
    pub fn from_raw(value: u32) -> Self {
        match value {
            0 => Self::All,
            1 => Self::ComputeAll,
            2 => Self::MediaAll,
            3 => Self::CopyAll,
            4 => Self::ComputeSingle,
            5 => Self::RenderSingle,
            6 => Self::MediaDecodeSingle,
            7 => Self::MediaEncodeSingle,
            8 => Self::CopySingle,
            9 => Self::MediaEnhancementSingle,
            10 => Self::ThreeDSingle,
            11 => Self::ThreeDRenderComputeAll,
            12 => Self::RenderAll,
            13 => Self::ThreeDAll,
            14 => Self::MediaCodecSingle,
            other => Self::Unknown(other),
        }
    }

    /// Short label used in tables
    pub fn name(&self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::ComputeAll => "COMPUTE_ALL",
            Self::MediaAll => "MEDIA_ALL",
            Self::CopyAll => "COPY_ALL",
            Self::ComputeSingle => "COMPUTE_SINGLE",
            Self::RenderSingle => "RENDER_SINGLE",
            Self::MediaDecodeSingle => "MEDIA_DECODE_SINGLE",
            Self::MediaEncodeSingle => "MEDIA_ENCODE_SINGLE",
            Self::CopySingle => "COPY_SINGLE",
            Self::MediaEnhancementSingle => "MEDIA_ENHANCEMENT_SINGLE",
            Self::ThreeDSingle => "3D_SINGLE",
            Self::ThreeDRenderComputeAll => "3D_RENDER_COMPUTE_ALL",
            Self::RenderAll => "RENDER_ALL",
            Self::ThreeDAll => "3D_ALL",
            Self::MediaCodecSingle => "MEDIA_CODEC_SINGLE",
            Self::Unknown(_) => "UNKNOWN",
        }
    }

    /// Whether this group aggregates several engines
    pub fn is_aggregate(&self) -> bool {
        matches!(
            self,
            Self::All
                | Self::ComputeAll
                | Self::MediaAll
                | Self::CopyAll
                | Self::ThreeDRenderComputeAll
                | Self::RenderAll
                | Self::ThreeDAll
        )
    }
}

impl fmt::Display for EngineGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(v) => write!(f, "UNKNOWN({})", v),
            other => f.write_str(other.name()),
        }
    }
}

impl Serialize for EngineGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Static engine properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EngineProperties {
    pub group: EngineGroup,
    pub on_subdevice: bool,
    pub subdevice_id: u32,
}

/// Engine classes a process is using (`zes_engine_type_flags_t`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EngineTypeFlags(u32);

impl EngineTypeFlags {
    pub const OTHER: Self = Self(1 << 0);
    pub const COMPUTE: Self = Self(1 << 1);
    pub const THREE_D: Self = Self(1 << 2);
    pub const MEDIA: Self = Self(1 << 3);
    pub const DMA: Self = Self(1 << 4);
    pub const RENDER: Self = Self(1 << 5);

    const NAMES: [(Self, &'static str); 6] = [
        (Self::OTHER, "OTHER"),
        (Self::COMPUTE, "COMPUTE"),
        (Self::THREE_D, "3D"),
        (Self::MEDIA, "MEDIA"),
        (Self::DMA, "DMA"),
        (Self::RENDER, "RENDER"),
    ];

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Names of the set flags, in bit order
    pub fn names(&self) -> Vec<&'static str> {
        Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl fmt::Display for EngineTypeFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names().join(" "))
    }
}

impl Serialize for EngineTypeFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_group_from_raw() {
        assert_eq!(EngineGroup::from_raw(0), EngineGroup::All);
        assert_eq!(EngineGroup::from_raw(10), EngineGroup::ThreeDSingle);
        assert_eq!(EngineGroup::from_raw(14).to_string(), "MEDIA_CODEC_SINGLE");
        assert_eq!(EngineGroup::from_raw(42).to_string(), "UNKNOWN(42)");
    }

    #[test]
    fn test_engine_group_aggregate() {
        assert!(EngineGroup::All.is_aggregate());
        assert!(!EngineGroup::ComputeSingle.is_aggregate());
    }

    #[test]
    fn test_engine_flags_names() {
        let flags = EngineTypeFlags::COMPUTE.union(EngineTypeFlags::RENDER);
        assert_eq!(flags.to_string(), "COMPUTE RENDER");
        assert!(flags.contains(EngineTypeFlags::COMPUTE));
        assert!(!flags.contains(EngineTypeFlags::DMA));
        assert_eq!(EngineTypeFlags::default().to_string(), "");
    }
}
