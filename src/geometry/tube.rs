//! Tube mesh extrusion along a sampled curve.
//!
//! Sweeps a circular cross-section along the spline samples of one chain,
//! emitting a ring of `segments + 1` vertices per sample (the seam vertex
//! is duplicated for correct wrapping) and two triangles per segment
//! wedge between consecutive rings. Vertex and index arrays are sized
//! analytically before the loop; the hot path never reallocates.

use glam::Vec3;

use super::{CurveSample, MeshData};

/// World-up reference used to derive stable cross-section frames.
const WORLD_UP: Vec3 = Vec3::Y;

/// Extrudes a circular cross-section along a curve.
#[derive(Debug, Clone, Copy)]
pub struct TubeMeshBuilder {
    /// Tube radius in angstroms.
    pub radius: f32,
    /// Radial segments per ring; each ring emits `segments + 1` vertices.
    pub segments: usize,
}

impl Default for TubeMeshBuilder {
    fn default() -> Self {
        Self {
            radius: 0.3,
            segments: 8,
        }
    }
}

impl TubeMeshBuilder {
    /// Builder with explicit radius and radial segment count.
    #[must_use]
    pub fn new(radius: f32, segments: usize) -> Self {
        Self {
            radius,
            segments: segments.max(3),
        }
    }

    /// Build the tube mesh for one chain's curve samples.
    ///
    /// `ring_colors` is parallel to `samples` (one color per ring, from
    /// the color assigner). Fewer than two samples yields an empty mesh.
    /// For `n` samples the mesh holds `n * (segments + 1)` vertices and
    /// `(n - 1) * segments * 2` triangles.
    #[must_use]
    pub fn build(
        &self,
        samples: &[CurveSample],
        ring_colors: &[[f32; 3]],
    ) -> MeshData {
        let n = samples.len();
        if n < 2 || ring_colors.len() != n {
            return MeshData::default();
        }

        let ring = self.segments + 1;
        let mut mesh =
            MeshData::with_capacity(n * ring, (n - 1) * self.segments * 6);

        let mut prev_tangent = Vec3::ZERO;
        for i in 0..n {
            let tangent = tangent_at(samples, i, prev_tangent);
            prev_tangent = tangent;

            let (right, normal) = cross_section_frame(tangent);
            let center = samples[i].position;
            let color = ring_colors[i];

            for k in 0..ring {
                let theta = k as f32 / self.segments as f32
                    * std::f32::consts::TAU;
                let offset = right * theta.cos() + normal * theta.sin();
                mesh.positions.push((center + offset * self.radius).into());
                mesh.normals.push(offset.into());
                mesh.colors.push(color);
            }
        }

        for i in 0..n - 1 {
            let a = (i * ring) as u32;
            let b = ((i + 1) * ring) as u32;
            for k in 0..self.segments as u32 {
                mesh.indices.extend_from_slice(&[a + k, b + k, a + k + 1]);
                mesh.indices
                    .extend_from_slice(&[a + k + 1, b + k, b + k + 1]);
            }
        }

        debug_assert!(mesh.is_valid());
        mesh
    }

}

/// Local tangent at sample `i`: normalized sample-to-sample difference,
/// with fallbacks for degenerate (near-zero) spans so NaNs never
/// propagate into vertex data.
fn tangent_at(samples: &[CurveSample], i: usize, prev: Vec3) -> Vec3 {
    let n = samples.len();
    let diff = if i + 1 < n {
        samples[i + 1].position - samples[i].position
    } else {
        samples[i].position - samples[i - 1].position
    };
    let tangent = diff.normalize_or_zero();
    if tangent.length_squared() > 0.5 {
        tangent
    } else if prev.length_squared() > 0.5 {
        prev
    } else {
        WORLD_UP
    }
}

/// Derive a stable right/normal frame for a ring from its tangent via
/// cross products against the fixed world-up reference. Falls back to the
/// X axis when the tangent is parallel to up.
fn cross_section_frame(tangent: Vec3) -> (Vec3, Vec3) {
    let mut right = tangent.cross(WORLD_UP);
    if right.length_squared() < 1e-8 {
        right = tangent.cross(Vec3::X);
    }
    let right = right.normalize();
    let normal = right.cross(tangent).normalize();
    (right, normal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::SecondaryStructure;

    fn line_samples(n: usize) -> Vec<CurveSample> {
        (0..n)
            .map(|i| CurveSample {
                position: Vec3::new(i as f32 * 0.1, 0.0, 0.0),
                structure: SecondaryStructure::Helix,
            })
            .collect()
    }

    fn colors(n: usize) -> Vec<[f32; 3]> {
        vec![[0.5, 0.5, 0.5]; n]
    }

    #[test]
    fn vertex_and_triangle_counts_are_analytic() {
        let samples = line_samples(31);
        let mesh =
            TubeMeshBuilder::new(0.4, 8).build(&samples, &colors(31));
        assert_eq!(mesh.vertex_count(), 31 * 9);
        assert_eq!(mesh.triangle_count(), 30 * 8 * 2);
        assert!(mesh.is_valid());
    }

    #[test]
    fn indices_stay_in_bounds() {
        let samples = line_samples(5);
        let mesh = TubeMeshBuilder::new(0.3, 6).build(&samples, &colors(5));
        let max = mesh.vertex_count() as u32;
        assert!(mesh.indices.iter().all(|&i| i < max));
    }

    #[test]
    fn rings_are_planar_and_centered() {
        let samples = line_samples(4);
        let builder = TubeMeshBuilder::new(0.4, 8);
        let mesh = builder.build(&samples, &colors(4));
        let ring = builder.segments + 1;
        for (i, sample) in samples.iter().enumerate() {
            let verts = &mesh.positions[i * ring..(i + 1) * ring];
            for v in verts {
                let p = Vec3::from(*v);
                // Tangent is +X, so each ring lies in its sample's YZ
                // plane and sits exactly radius away from the center.
                assert!((p.x - sample.position.x).abs() < 1e-5);
                assert!(
                    ((p - sample.position).length() - builder.radius).abs()
                        < 1e-5
                );
            }
        }
    }

    #[test]
    fn seam_vertex_is_duplicated() {
        let samples = line_samples(2);
        let builder = TubeMeshBuilder::new(0.3, 8);
        let mesh = builder.build(&samples, &colors(2));
        let first = Vec3::from(mesh.positions[0]);
        let seam = Vec3::from(mesh.positions[builder.segments]);
        assert!(first.distance(seam) < 1e-5);
    }

    #[test]
    fn duplicate_positions_do_not_produce_nans() {
        let mut samples = line_samples(3);
        samples[1].position = samples[0].position;
        let mesh = TubeMeshBuilder::new(0.3, 8).build(&samples, &colors(3));
        assert!(mesh
            .positions
            .iter()
            .flatten()
            .all(|c| c.is_finite()));
    }

    #[test]
    fn vertical_tangent_falls_back_cleanly() {
        let samples: Vec<CurveSample> = (0..3)
            .map(|i| CurveSample {
                position: Vec3::new(0.0, i as f32, 0.0),
                structure: SecondaryStructure::Coil,
            })
            .collect();
        let mesh = TubeMeshBuilder::new(0.3, 8).build(&samples, &colors(3));
        assert!(mesh
            .positions
            .iter()
            .flatten()
            .all(|c| c.is_finite()));
        assert_eq!(mesh.vertex_count(), 3 * 9);
    }

    #[test]
    fn short_input_yields_empty_mesh() {
        let builder = TubeMeshBuilder::default();
        assert!(builder.build(&[], &[]).is_empty());
        assert!(builder
            .build(&line_samples(1), &colors(1))
            .is_empty());
    }
}
