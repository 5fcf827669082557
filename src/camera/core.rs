use glam::{Mat4, Vec3};

/// Perspective projection parameters derived from the viewport.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

impl Projection {
    /// Build the projection matrix.
    ///
    /// `perspective_rh` already uses the [0,1] depth range (wgpu/Vulkan
    /// convention).
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        )
    }

    /// Update the aspect ratio from a viewport size.
    pub fn resize(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            aspect: 1.6,
            fovy: 45.0,
            znear: 0.5,
            zfar: 2000.0,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform buffer holding the view-projection matrix and camera metadata.
pub struct CameraUniform {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Camera world-space position.
    pub position: [f32; 3],
    /// Viewport aspect ratio.
    pub aspect: f32,
    /// Camera forward direction for lighting.
    pub forward: [f32; 3],
    /// Vertical field of view in degrees.
    pub fovy: f32,
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    /// Create a new camera uniform with identity view-projection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 3],
            aspect: 1.6,
            forward: [0.0, 0.0, -1.0],
            fovy: 45.0,
        }
    }

    /// Update uniform fields from the given view matrix and projection.
    pub fn update(
        &mut self,
        view: Mat4,
        eye: Vec3,
        target: Vec3,
        projection: &Projection,
    ) {
        self.view_proj = (projection.matrix() * view).to_cols_array_2d();
        self.position = eye.to_array();
        self.aspect = projection.aspect;
        self.forward = (target - eye).normalize_or_zero().to_array();
        self.fovy = projection.fovy;
    }
}
