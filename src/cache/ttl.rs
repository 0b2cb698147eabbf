//! TTL Presets
//!
//! Named durations used by call sites. The cache accepts any duration;
//! these are conventions, not limits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// 30 seconds.
pub const SHORT_TTL: Duration = Duration::from_secs(30);
/// 5 minutes. The default when no duration is given.
pub const MEDIUM_TTL: Duration = Duration::from_secs(5 * 60);
/// 30 minutes.
pub const LONG_TTL: Duration = Duration::from_secs(30 * 60);
/// 60 minutes.
pub const VERY_LONG_TTL: Duration = Duration::from_secs(60 * 60);

// == TTL Preset ==
/// Named cache durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TtlPreset {
    Short,
    #[default]
    Medium,
    Long,
    VeryLong,
}

impl TtlPreset {
    /// Returns the duration this preset stands for.
    pub const fn duration(self) -> Duration {
        match self {
            TtlPreset::Short => SHORT_TTL,
            TtlPreset::Medium => MEDIUM_TTL,
            TtlPreset::Long => LONG_TTL,
            TtlPreset::VeryLong => VERY_LONG_TTL,
        }
    }
}

impl From<TtlPreset> for Duration {
    fn from(preset: TtlPreset) -> Self {
        preset.duration()
    }
}
