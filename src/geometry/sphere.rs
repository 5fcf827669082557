//! Instanced sphere representation: one shared unit mesh plus a
//! per-atom instance stream.
//!
//! The sphere path trades per-atom triangle count for a single canonical
//! mesh and one [`InstanceRecord`] per rendered atom. It is the required
//! fallback whenever atom counts make per-atom unique meshes prohibitive.

use glam::Vec3;

use super::MeshData;
use crate::structure::Atom;

/// Per-atom instance attributes: position, color, radius scale.
///
/// Layout must match the instance vertex buffer in `sphere.wgsl`:
/// `center.xyz` = world position, `center.w` = radius scale,
/// `color.xyz` = RGB, `color.w` unused.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRecord {
    /// xyz = world position, w = radius scale.
    pub center: [f32; 4],
    /// xyz = RGB color, w = padding.
    pub color: [f32; 4],
}

impl InstanceRecord {
    /// Build a record from position, color, and scalar radius scale.
    #[must_use]
    pub fn new(position: Vec3, color: [f32; 3], scale: f32) -> Self {
        Self {
            center: [position.x, position.y, position.z, scale],
            color: [color[0], color[1], color[2], 0.0],
        }
    }

    /// World position.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.center[0], self.center[1], self.center[2])
    }

    /// Radius scale.
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.center[3]
    }
}

/// Builds the canonical unit sphere mesh and per-atom instance streams.
#[derive(Debug, Clone, Copy)]
pub struct InstancedSphereBuilder {
    /// Latitude subdivisions.
    pub rings: usize,
    /// Longitude subdivisions.
    pub sectors: usize,
}

impl Default for InstancedSphereBuilder {
    fn default() -> Self {
        Self {
            rings: 12,
            sectors: 16,
        }
    }
}

impl InstancedSphereBuilder {
    /// Builder with explicit subdivision counts.
    #[must_use]
    pub fn new(rings: usize, sectors: usize) -> Self {
        Self {
            rings: rings.max(3),
            sectors: sectors.max(3),
        }
    }

    /// Build the canonical unit sphere as a rings × sectors lat/long
    /// grid. Shared across all atoms; colors are white and multiplied by
    /// the per-instance color in the shader.
    #[must_use]
    pub fn unit_sphere(&self) -> MeshData {
        let vert_count = (self.rings + 1) * (self.sectors + 1);
        let index_count = self.rings * self.sectors * 6;
        let mut mesh = MeshData::with_capacity(vert_count, index_count);

        for r in 0..=self.rings {
            // Latitude from +Y pole to -Y pole.
            let phi = std::f32::consts::PI * r as f32 / self.rings as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();
            for s in 0..=self.sectors {
                let theta =
                    std::f32::consts::TAU * s as f32 / self.sectors as f32;
                let (sin_theta, cos_theta) = theta.sin_cos();
                let p = Vec3::new(
                    sin_phi * cos_theta,
                    cos_phi,
                    sin_phi * sin_theta,
                );
                mesh.positions.push(p.into());
                mesh.normals.push(p.into());
                mesh.colors.push([1.0, 1.0, 1.0]);
            }
        }

        let row = (self.sectors + 1) as u32;
        for r in 0..self.rings as u32 {
            for s in 0..self.sectors as u32 {
                let a = r * row + s;
                let b = a + row;
                mesh.indices.extend_from_slice(&[a, b, a + 1]);
                mesh.indices.extend_from_slice(&[a + 1, b, b + 1]);
            }
        }

        debug_assert!(mesh.is_valid());
        mesh
    }

    /// Build the instance stream for a set of atoms (already LOD
    /// filtered), with per-atom colors supplied by the color assigner.
    /// Per-element radius scales approximate relative atomic radii.
    #[must_use]
    pub fn build_instances(
        atoms: &[&Atom],
        colors: &[[f32; 3]],
        base_radius: f32,
    ) -> Vec<InstanceRecord> {
        debug_assert_eq!(atoms.len(), colors.len());
        atoms
            .iter()
            .zip(colors.iter())
            .map(|(atom, &color)| {
                InstanceRecord::new(
                    atom.position,
                    color,
                    base_radius * atom.element.radius_scale(),
                )
            })
            .collect()
    }
}
