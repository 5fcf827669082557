//! Arcball/orbit camera: target point, distance, azimuth, elevation.
//!
//! The camera always faces its target. Elevation is clamped short of the
//! poles to avoid gimbal flip. All mutation happens through gesture
//! methods on the render thread; [`OrbitCamera::view_matrix`] is a pure
//! function of current state and can be called every frame without
//! synchronization concerns.

use glam::{Mat4, Vec3};

use crate::input::CameraCommand;
use crate::options::CameraOptions;

/// Elevation clamp in radians (±89°).
const MAX_ELEVATION: f32 = 89.0 * std::f32::consts::PI / 180.0;

/// Padding factor applied when fitting the camera to a bounding sphere.
const FIT_PADDING: f32 = 1.5;

/// Orbiting camera centered on a target point.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    target: Vec3,
    distance: f32,
    azimuth: f32,
    elevation: f32,
    min_distance: f32,
    max_distance: f32,
    orbit_sensitivity: f32,
    pan_speed: f32,
    fovy: f32,
}

impl OrbitCamera {
    /// Create a camera from control options, looking at the origin.
    #[must_use]
    pub fn new(options: &CameraOptions) -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 100.0,
            azimuth: 0.0,
            elevation: 0.0,
            min_distance: 1.0,
            max_distance: 1000.0,
            orbit_sensitivity: options.orbit_sensitivity,
            pan_speed: options.pan_speed,
            fovy: options.fovy,
        }
    }

    /// Adjust azimuth/elevation by screen-space pixel deltas.
    ///
    /// Elevation is clamped to ±89° so the view never flips over the pole.
    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.azimuth += delta_yaw * self.orbit_sensitivity;
        self.elevation = (self.elevation
            + delta_pitch * self.orbit_sensitivity)
            .clamp(-MAX_ELEVATION, MAX_ELEVATION);
    }

    /// Zoom by dividing the distance by `factor`, clamped to the configured
    /// range. Degenerate factors (zero, NaN, infinite, negative) are ignored
    /// rather than propagated into the view matrix.
    pub fn zoom(&mut self, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            log::warn!("ignoring degenerate zoom factor {factor}");
            return;
        }
        self.distance =
            (self.distance / factor).clamp(self.min_distance, self.max_distance);
    }

    /// Translate the target by screen-space deltas, reprojected into the
    /// camera's right/up vectors and scaled by current distance so pan
    /// speed is resolution-independent.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let (right, up) = self.basis();
        let scale = self.distance * self.pan_speed;
        self.target += right * (-dx * scale) + up * (dy * scale);
    }

    /// Set the orbit distance and its clamp range. Called once per
    /// structure load.
    pub fn configure(&mut self, distance: f32, min: f32, max: f32) {
        self.min_distance = min.max(1e-3);
        self.max_distance = max.max(self.min_distance);
        self.distance = distance.clamp(self.min_distance, self.max_distance);
    }

    /// Recenter on a new structure's bounding sphere and fit the distance
    /// so the whole sphere is visible with comfortable padding.
    pub fn fit_to_bounding_sphere(&mut self, center: Vec3, radius: f32) {
        self.target = center;
        let fit = if radius > 0.0 {
            radius / (self.fovy.to_radians() * 0.5).tan() * FIT_PADDING
        } else {
            10.0
        };
        self.configure(fit, (radius * 0.05).max(0.5), fit * 10.0);
    }

    /// Update gesture sensitivities and field of view from freshly
    /// loaded options. Orbit state (target, distance, angles) is kept.
    pub fn set_control_options(&mut self, options: &CameraOptions) {
        self.orbit_sensitivity = options.orbit_sensitivity;
        self.pan_speed = options.pan_speed;
        self.fovy = options.fovy;
    }

    /// Apply a queued gesture command.
    pub fn apply(&mut self, command: CameraCommand) {
        match command {
            CameraCommand::Orbit { delta } => self.orbit(delta.x, delta.y),
            CameraCommand::Pan { delta } => self.pan(delta.x, delta.y),
            CameraCommand::Zoom { factor } => self.zoom(factor),
        }
    }

    /// Current eye position in world space.
    #[must_use]
    pub fn eye_position(&self) -> Vec3 {
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        let (sin_el, cos_el) = self.elevation.sin_cos();
        let dir = Vec3::new(cos_el * sin_az, sin_el, cos_el * cos_az);
        self.target + dir * self.distance
    }

    /// View matrix for the current state. Pure; no side effects.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), self.target, Vec3::Y)
    }

    /// Look-at target point.
    #[must_use]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Current orbit distance.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Camera-relative right and up vectors derived from yaw/pitch.
    fn basis(&self) -> (Vec3, Vec3) {
        let forward = (self.target - self.eye_position()).normalize_or_zero();
        let mut right = forward.cross(Vec3::Y);
        if right.length_squared() < 1e-8 {
            // Looking straight down the pole; elevation clamp should
            // prevent this, but fall back rather than emit NaNs.
            right = Vec3::X;
        }
        let right = right.normalize();
        let up = right.cross(forward).normalize();
        (right, up)
    }
}
