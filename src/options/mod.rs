//! Centralized rendering options with TOML preset support.
//!
//! All tweakable settings (camera control, geometry detail, LOD policy,
//! color policy) are consolidated here. Options serialize to/from TOML;
//! all sub-structs use `#[serde(default)]` so partial files (e.g. only
//! overriding `[lod]`) work correctly.

mod camera;
mod colors;
mod display;
mod geometry;
mod lod;

use std::path::Path;

pub use camera::CameraOptions;
pub use colors::ColorOptions;
pub use display::{ColorMode, RenderStyle};
pub use geometry::GeometryOptions;
pub use lod::LodOptions;
use serde::{Deserialize, Serialize};

use crate::error::MolvizError;

/// Top-level options container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Camera projection and control parameters.
    pub camera: CameraOptions,
    /// Spline/tube/sphere geometry detail.
    pub geometry: GeometryOptions,
    /// Level-of-detail policy overrides from the settings surface.
    pub lod: LodOptions,
    /// Color palettes and highlight policy constants.
    pub colors: ColorOptions,
}

impl Options {
    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`MolvizError::Io`] if the file cannot be read, or
    /// [`MolvizError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, MolvizError> {
        let content = std::fs::read_to_string(path).map_err(MolvizError::Io)?;
        toml::from_str(&content)
            .map_err(|e| MolvizError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`MolvizError::OptionsParse`] if serialization fails, or
    /// [`MolvizError::Io`] if the file or its parent directory cannot
    /// be written.
    pub fn save(&self, path: &Path) -> Result<(), MolvizError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MolvizError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(MolvizError::Io)?;
        }
        std::fs::write(path, content).map_err(MolvizError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[geometry]
tube_radius = 0.5
";
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.geometry.tube_radius, 0.5);
        // Everything else should be default.
        assert_eq!(opts.geometry.tube_radial_segments, 8);
        assert_eq!(opts.colors.highlight_boost, 1.4);
    }

    #[test]
    fn lod_override_parses_from_toml() {
        let toml_str = r#"
[lod]
override_level = "low"
atom_cap = 5000
"#;
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(
            opts.lod.override_level,
            Some(crate::lod::QualityLevel::Low)
        );
        assert_eq!(opts.lod.atom_cap, Some(5000));
    }
}
