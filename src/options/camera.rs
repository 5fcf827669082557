use serde::{Deserialize, Serialize};

/// Camera projection and gesture-control parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
    /// Radians of rotation per pixel of orbit drag.
    pub orbit_sensitivity: f32,
    /// Target translation per pixel of pan drag, as a fraction of the
    /// current orbit distance (resolution-independent pan speed).
    pub pan_speed: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 45.0,
            znear: 0.5,
            zfar: 2000.0,
            orbit_sensitivity: 0.01,
            pan_speed: 0.002,
        }
    }
}
