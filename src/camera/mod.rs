//! Orbit camera state and projection.

mod core;
mod orbit;

pub use core::{CameraUniform, Projection};
pub use orbit::OrbitCamera;
