//! Uploaded geometry handles.
//!
//! Converts CPU-side [`MeshData`] and instance streams into GPU buffers
//! and bundles them into the opaque [`GpuGeometry`] handle the buffer
//! cache manages.

use wgpu::util::DeviceExt;

use crate::cache::BufferRelease;
use crate::geometry::{InstanceRecord, MeshData};

/// Interleaved mesh vertex: position, normal, color.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// World-space position.
    pub position: [f32; 3],
    /// Outward normal.
    pub normal: [f32; 3],
    /// RGB color.
    pub color: [f32; 3],
}

impl MeshVertex {
    /// Vertex buffer layout matching `mesh.wgsl` / `sphere.wgsl` slot 0.
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
            0 => Float32x3,
            1 => Float32x3,
            2 => Float32x3,
        ];
        wgpu::VertexBufferLayout {
            array_stride: size_of::<MeshVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

impl InstanceRecord {
    /// Instance buffer layout matching `sphere.wgsl` slot 1.
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
            3 => Float32x4,
            4 => Float32x4,
        ];
        wgpu::VertexBufferLayout {
            array_stride: size_of::<InstanceRecord>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Opaque handle to GPU-resident vertex/index/instance buffers plus
/// their counts. Owned by the buffer cache; destroyed on eviction.
pub struct GpuGeometry {
    /// Interleaved vertex buffer.
    pub vertex_buffer: wgpu::Buffer,
    /// Triangle index buffer (u32).
    pub index_buffer: wgpu::Buffer,
    /// Per-instance attribute buffer (sphere path only).
    pub instance_buffer: Option<wgpu::Buffer>,
    /// Number of vertices.
    pub vertex_count: u32,
    /// Number of indices.
    pub index_count: u32,
    /// Number of instances (1 for plain meshes).
    pub instance_count: u32,
}

impl GpuGeometry {
    /// Upload a plain mesh (ribbon path).
    #[must_use]
    pub fn upload_mesh(
        device: &wgpu::Device,
        label: &str,
        mesh: &MeshData,
    ) -> Self {
        let vertices = interleave(mesh);
        let vertex_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Vertices")),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Indices")),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        Self {
            vertex_buffer,
            index_buffer,
            instance_buffer: None,
            vertex_count: vertices.len() as u32,
            index_count: mesh.indices.len() as u32,
            instance_count: 1,
        }
    }

    /// Upload a shared mesh plus per-instance stream (sphere path).
    #[must_use]
    pub fn upload_instanced(
        device: &wgpu::Device,
        label: &str,
        mesh: &MeshData,
        instances: &[InstanceRecord],
    ) -> Self {
        let mut geometry = Self::upload_mesh(device, label, mesh);
        let instance_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Instances")),
                contents: bytemuck::cast_slice(instances),
                usage: wgpu::BufferUsages::VERTEX,
            });
        geometry.instance_buffer = Some(instance_buffer);
        geometry.instance_count = instances.len() as u32;
        geometry
    }
}

impl BufferRelease for GpuGeometry {
    fn release(&mut self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
        if let Some(instances) = &self.instance_buffer {
            instances.destroy();
        }
    }
}

/// Interleave parallel mesh arrays into the vertex layout.
fn interleave(mesh: &MeshData) -> Vec<MeshVertex> {
    mesh.positions
        .iter()
        .zip(mesh.normals.iter())
        .zip(mesh.colors.iter())
        .map(|((&position, &normal), &color)| MeshVertex {
            position,
            normal,
            color,
        })
        .collect()
}
