use serde::{Deserialize, Serialize};

/// Geometry detail options for the procedural builders.
///
/// Segment counts here are base values; the LOD manager scales them per
/// quality level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeometryOptions {
    /// Backbone tube radius in angstroms.
    pub tube_radius: f32,
    /// Number of radial segments around tubes.
    pub tube_radial_segments: u32,
    /// Spline sub-samples per backbone span.
    pub segments_per_span: u32,
    /// Catmull-Rom tension coefficient.
    pub spline_tension: f32,
    /// Base radius for atom spheres in angstroms.
    pub sphere_radius: f32,
}

impl Default for GeometryOptions {
    fn default() -> Self {
        Self {
            tube_radius: 0.3,
            tube_radial_segments: 8,
            segments_per_span: 10,
            spline_tension: 0.5,
            sphere_radius: 0.4,
        }
    }
}
