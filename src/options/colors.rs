use serde::{Deserialize, Serialize};

/// Color palettes and highlight policy constants.
///
/// The blend/boost/dim defaults are tuned policy values; presets may
/// override them but the renderer never re-derives them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ColorOptions {
    /// Weight of the secondary-structure color when blending with the
    /// chain color on the ribbon path.
    pub blend_alpha: f32,
    /// Per-channel multiplier for highlighted chains (clamped to 1.0).
    pub highlight_boost: f32,
    /// Per-channel multiplier for non-highlighted chains when the
    /// highlight set is non-empty.
    pub dim_factor: f32,
    /// Flat color used by the uniform color mode.
    pub uniform_color: [f32; 3],
    /// Per-chain palette, indexed by chain appearance order (wraps).
    pub chain_palette: Vec<[f32; 3]>,
}

impl Default for ColorOptions {
    fn default() -> Self {
        Self {
            blend_alpha: 0.6,
            highlight_boost: 1.4,
            dim_factor: 0.15,
            uniform_color: [0.55, 0.7, 0.9],
            chain_palette: vec![
                [0.4, 0.65, 0.95],
                [0.95, 0.55, 0.35],
                [0.45, 0.85, 0.5],
                [0.9, 0.45, 0.75],
                [0.95, 0.8, 0.35],
                [0.55, 0.5, 0.9],
                [0.4, 0.8, 0.8],
                [0.75, 0.6, 0.45],
            ],
        }
    }
}

impl ColorOptions {
    /// Palette color for the chain at `index` (first-appearance order).
    /// Wraps when there are more chains than palette entries.
    #[must_use]
    pub fn chain_color(&self, index: usize) -> [f32; 3] {
        if self.chain_palette.is_empty() {
            return [0.6, 0.6, 0.6];
        }
        self.chain_palette[index % self.chain_palette.len()]
    }
}
