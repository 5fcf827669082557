use serde::{Deserialize, Serialize};

use crate::lod::QualityLevel;

/// Level-of-detail policy overrides exposed to the settings surface.
///
/// The LOD manager reads these; persistence belongs to the host app.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LodOptions {
    /// Pin the quality level, bypassing automatic selection.
    pub override_level: Option<QualityLevel>,
    /// Explicit atom cap, replacing the selected level's cap.
    /// `Some(0)` is treated as unlimited.
    pub atom_cap: Option<usize>,
    /// Additional uniform sampling ratio in (0, 1] applied on top of the
    /// atom cap. 1.0 keeps everything the cap allows.
    pub sampling_ratio: f32,
}

impl Default for LodOptions {
    fn default() -> Self {
        Self {
            override_level: None,
            atom_cap: None,
            sampling_ratio: 1.0,
        }
    }
}

impl LodOptions {
    /// Sampling ratio clamped to a usable range.
    #[must_use]
    pub fn effective_sampling_ratio(&self) -> f32 {
        if self.sampling_ratio > 0.0 && self.sampling_ratio <= 1.0 {
            self.sampling_ratio
        } else {
            1.0
        }
    }
}
