//! Procedural geometry generation: spline curves, tube meshes, and
//! instanced spheres.
//!
//! Everything in this module is pure CPU-side math over [`glam::Vec3`];
//! GPU upload lives in [`crate::gpu`]. Builders assume single-threaded,
//! synchronous execution on the render thread and perform no locking.

mod sphere;
mod spline;
mod tube;

pub use sphere::{InstanceRecord, InstancedSphereBuilder};
pub use spline::{CurveSample, SplineCurveBuilder};
pub use tube::TubeMeshBuilder;

/// CPU-side triangle mesh: positions, normals, per-vertex colors, indices.
///
/// Invariants: `indices` only reference valid vertex offsets, and
/// `colors.len() == positions.len() == normals.len()`.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Vertex positions.
    pub positions: Vec<[f32; 3]>,
    /// Per-vertex outward normals.
    pub normals: Vec<[f32; 3]>,
    /// Per-vertex RGB colors (0-1 range).
    pub colors: Vec<[f32; 3]>,
    /// Triangle indices into the vertex arrays.
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Pre-sized mesh with the given vertex and index capacity.
    ///
    /// Tube and sphere builders know their counts analytically, so the
    /// hot build path never reallocates.
    #[must_use]
    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            colors: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(indices),
        }
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether the mesh has no geometry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Append another mesh, rebasing its indices.
    ///
    /// Used to concatenate per-chain tube meshes into one draw; chains
    /// are never connected by triangles, only stored contiguously.
    pub fn append(&mut self, other: Self) {
        let base = self.positions.len() as u32;
        self.positions.extend(other.positions);
        self.normals.extend(other.normals);
        self.colors.extend(other.colors);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Check structural invariants: index bounds and parallel array
    /// lengths. Intended for debug assertions and tests.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let n = self.positions.len();
        self.normals.len() == n
            && self.colors.len() == n
            && self.indices.len() % 3 == 0
            && self.indices.iter().all(|&i| (i as usize) < n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_rebases_indices() {
        let mut a = MeshData {
            positions: vec![[0.0; 3]; 3],
            normals: vec![[0.0, 1.0, 0.0]; 3],
            colors: vec![[1.0; 3]; 3],
            indices: vec![0, 1, 2],
        };
        let b = a.clone();
        a.append(b);
        assert_eq!(a.vertex_count(), 6);
        assert_eq!(a.indices, vec![0, 1, 2, 3, 4, 5]);
        assert!(a.is_valid());
    }

    #[test]
    fn out_of_range_index_is_invalid() {
        let mesh = MeshData {
            positions: vec![[0.0; 3]; 2],
            normals: vec![[0.0; 3]; 2],
            colors: vec![[0.0; 3]; 2],
            indices: vec![0, 1, 2],
        };
        assert!(!mesh.is_valid());
    }
}
