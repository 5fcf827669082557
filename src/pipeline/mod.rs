//! Per-frame orchestration: gestures, LOD selection, geometry cache,
//! and the actual draw calls.
//!
//! The geometry construction itself lives in free functions
//! ([`build_ribbon_mesh`], [`build_sphere_instances`]) so the whole
//! CPU side of a frame can be exercised without a GPU.

use std::collections::HashSet;

use rustc_hash::FxHashMap;
use wgpu::util::DeviceExt;

use crate::cache::{BufferCache, GeometryKey};
use crate::camera::{CameraUniform, OrbitCamera, Projection};
use crate::color::ColorAssigner;
use crate::geometry::{
    InstanceRecord, InstancedSphereBuilder, MeshData, SplineCurveBuilder,
    TubeMeshBuilder,
};
use crate::gpu::{GpuGeometry, MeshVertex, RenderContext};
use crate::input::{gesture_queue, GestureReceiver, GestureSender};
use crate::lod::{filter_atoms_for_lod, LodManager, LodSettings};
use crate::options::{ColorMode, ColorOptions, GeometryOptions, Options, RenderStyle};
use crate::structure::StructureSnapshot;
use crate::util::FrameTiming;

/// Build the combined ribbon mesh for every chain in the snapshot.
///
/// Each chain's backbone is splined, extruded into a tube, and appended
/// into one mesh. Chains with fewer than two backbone atoms contribute
/// nothing. Spline and radial detail come from the LOD settings, capped
/// by the configured geometry detail.
#[must_use]
pub fn build_ribbon_mesh(
    snapshot: &StructureSnapshot,
    geometry: &GeometryOptions,
    colors: &ColorOptions,
    highlight: &HashSet<char>,
    settings: &LodSettings,
) -> MeshData {
    let spr = settings
        .segments_per_span
        .min(geometry.segments_per_span as usize);
    let tube_segments = settings
        .tube_segments
        .min(geometry.tube_radial_segments as usize);
    let spline = SplineCurveBuilder::new(spr, geometry.spline_tension);
    let tube = TubeMeshBuilder::new(geometry.tube_radius, tube_segments);
    let assigner = ColorAssigner::new(colors, highlight);

    let mut mesh = MeshData::default();
    for (chain_index, chain) in snapshot.chains().into_iter().enumerate() {
        let backbone = snapshot.backbone_of_chain(chain);
        let positions: Vec<_> =
            backbone.iter().map(|a| a.position).collect();
        let structures: Vec<_> =
            backbone.iter().map(|a| a.secondary_structure).collect();

        let samples = spline.build(&positions, &structures);
        let ring_colors: Vec<_> = samples
            .iter()
            .map(|s| assigner.ribbon_color(chain_index, chain, s.structure))
            .collect();
        mesh.append(tube.build(&samples, &ring_colors));
    }
    mesh
}

/// Build the per-atom instance stream for the sphere path.
///
/// Atoms are stride-sampled down to the LOD atom cap first, so the
/// result is deterministic for a given snapshot and settings.
#[must_use]
pub fn build_sphere_instances(
    snapshot: &StructureSnapshot,
    geometry: &GeometryOptions,
    colors: &ColorOptions,
    highlight: &HashSet<char>,
    settings: &LodSettings,
    mode: ColorMode,
) -> Vec<InstanceRecord> {
    let chain_indices: FxHashMap<char, usize> = snapshot
        .chains()
        .into_iter()
        .enumerate()
        .map(|(i, c)| (c, i))
        .collect();

    let atoms: Vec<_> = snapshot.atoms().iter().collect();
    let atoms =
        filter_atoms_for_lod(&atoms, settings.atom_cap.unwrap_or(0));

    let assigner = ColorAssigner::new(colors, highlight);
    let atom_colors: Vec<_> = atoms
        .iter()
        .map(|atom| {
            let chain_index =
                chain_indices.get(&atom.chain).copied().unwrap_or(0);
            assigner.atom_color(atom, chain_index, mode)
        })
        .collect();

    InstancedSphereBuilder::build_instances(
        &atoms,
        &atom_colors,
        geometry.sphere_radius,
    )
}

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.03,
    g: 0.03,
    b: 0.05,
    a: 1.0,
};

/// Top-level renderer: owns the camera, the gesture queue's receiving
/// end, the LOD manager, the geometry cache, and the two render
/// pipelines (ribbon mesh and instanced spheres).
pub struct RenderPipeline {
    camera: OrbitCamera,
    projection: Projection,
    uniform: CameraUniform,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,

    mesh_pipeline: wgpu::RenderPipeline,
    sphere_pipeline: wgpu::RenderPipeline,
    depth_view: wgpu::TextureView,

    cache: BufferCache<GpuGeometry>,
    lod: LodManager,
    timing: FrameTiming,
    gesture_sender: GestureSender,
    gestures: GestureReceiver,

    snapshot: Option<StructureSnapshot>,
    options: Options,
    style: RenderStyle,
    color_mode: ColorMode,
    highlight: HashSet<char>,
    current_key: Option<GeometryKey>,
}

impl RenderPipeline {
    /// Build the renderer against an initialized GPU context.
    #[must_use]
    pub fn new(context: &RenderContext, options: Options) -> Self {
        let camera = OrbitCamera::new(&options.camera);
        let mut projection = Projection {
            fovy: options.camera.fovy,
            znear: options.camera.znear,
            zfar: options.camera.zfar,
            ..Projection::default()
        };
        projection.resize(context.config.width, context.config.height);

        let mut uniform = CameraUniform::new();
        uniform.update(
            camera.view_matrix(),
            camera.eye_position(),
            camera.target(),
            &projection,
        );

        let camera_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            },
        );

        let camera_layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX
                        | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            },
        );

        let camera_bind_group = context.device.create_bind_group(
            &wgpu::BindGroupDescriptor {
                layout: &camera_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                }],
                label: Some("Camera Bind Group"),
            },
        );

        let mesh_pipeline = create_pipeline(
            &context.device,
            &camera_layout,
            context.config.format,
            "Ribbon Mesh",
            include_str!("../gpu/shaders/mesh.wgsl"),
            &[MeshVertex::layout()],
        );
        let sphere_pipeline = create_pipeline(
            &context.device,
            &camera_layout,
            context.config.format,
            "Instanced Sphere",
            include_str!("../gpu/shaders/sphere.wgsl"),
            &[MeshVertex::layout(), InstanceRecord::layout()],
        );

        let depth_view = create_depth_view(
            &context.device,
            context.config.width,
            context.config.height,
        );

        let lod = LodManager::new(options.lod.clone());
        let (gesture_sender, gestures) = gesture_queue();

        Self {
            camera,
            projection,
            uniform,
            camera_buffer,
            camera_bind_group,
            mesh_pipeline,
            sphere_pipeline,
            depth_view,
            cache: BufferCache::default(),
            lod,
            timing: FrameTiming::new(),
            gesture_sender,
            gestures,
            snapshot: None,
            options,
            style: RenderStyle::default(),
            color_mode: ColorMode::default(),
            highlight: HashSet::new(),
            current_key: None,
        }
    }

    /// Handle for the input thread to enqueue camera gestures.
    #[must_use]
    pub fn gesture_sender(&self) -> GestureSender {
        self.gesture_sender.clone()
    }

    /// Swap in a newly loaded structure.
    ///
    /// The camera is re-fit to the structure's bounding sphere and all
    /// cached geometry for the previous structure is released.
    pub fn load_structure(&mut self, snapshot: StructureSnapshot) {
        if let Some((center, radius)) = snapshot.bounding_sphere() {
            self.camera.fit_to_bounding_sphere(center, radius);
        }
        self.cache.clear_all();
        self.current_key = None;
        log::info!(
            "loaded structure: {} atoms, {} chains",
            snapshot.atom_count(),
            snapshot.chain_count()
        );
        self.snapshot = Some(snapshot);
    }

    /// Switch the rendering style. Cached geometry for other styles is
    /// kept until it ages out.
    pub fn set_style(&mut self, style: RenderStyle) {
        self.style = style;
    }

    /// Switch the color mode.
    pub fn set_color_mode(&mut self, mode: ColorMode) {
        self.color_mode = mode;
    }

    /// Replace the highlighted chain set. Passing an empty set restores
    /// the original colors exactly.
    ///
    /// Colors are baked into vertex and instance data, so this drops
    /// all cached geometry.
    pub fn set_highlight(&mut self, chains: HashSet<char>) {
        if chains != self.highlight {
            self.highlight = chains;
            self.cache.clear_all();
            self.current_key = None;
        }
    }

    /// Replace the full options set (e.g. after a preset load).
    ///
    /// Camera projection and gesture sensitivities take effect
    /// immediately; the current orbit pose is preserved.
    pub fn set_options(&mut self, options: Options) {
        self.lod.set_policy(options.lod.clone());
        self.camera.set_control_options(&options.camera);
        self.projection.fovy = options.camera.fovy;
        self.projection.znear = options.camera.znear;
        self.projection.zfar = options.camera.zfar;
        self.options = options;
        self.cache.clear_all();
        self.current_key = None;
    }

    /// Current orbit camera, for direct (non-queued) manipulation.
    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    /// Handle a viewport resize.
    pub fn resize(&mut self, context: &RenderContext, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.projection.resize(width, height);
        self.depth_view =
            create_depth_view(&context.device, width, height);
    }

    /// CPU side of a frame: drain queued gestures into the camera,
    /// upload the camera uniform, pick a LOD level, and make sure the
    /// current (style, mode, level) geometry is resident.
    pub fn prepare(&mut self, context: &RenderContext) {
        for command in self.gestures.drain() {
            self.camera.apply(command);
        }
        self.uniform.update(
            self.camera.view_matrix(),
            self.camera.eye_position(),
            self.camera.target(),
            &self.projection,
        );
        context.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.uniform]),
        );

        let Some(snapshot) = &self.snapshot else {
            self.current_key = None;
            return;
        };

        let level = self.lod.determine_level(
            snapshot.atom_count(),
            snapshot.chain_count(),
            snapshot.residue_count(),
            self.style,
        );
        let key = GeometryKey::for_snapshot(
            snapshot,
            self.style,
            self.color_mode,
            level,
        );
        if self.cache.get(&key).is_none() {
            let settings = self.lod.settings_for(level);
            let geometry = upload_geometry(
                &context.device,
                snapshot,
                &self.options,
                &self.highlight,
                &settings,
                self.style,
                self.color_mode,
            );
            self.cache.put(key, geometry);
        }
        self.current_key = Some(key);

        self.cache.cleanup();
    }

    /// Draw the prepared frame to the surface.
    ///
    /// A headless context (no surface) is a no-op. Surface errors are
    /// returned to the caller, which decides whether to reconfigure or
    /// bail.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the next surface texture
    /// cannot be acquired (lost, outdated, or out of memory).
    pub fn render(
        &mut self,
        context: &RenderContext,
    ) -> Result<(), wgpu::SurfaceError> {
        let Some(surface) = &context.surface else {
            self.end_frame();
            return Ok(());
        };
        let frame = surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = context.device.create_command_encoder(
            &wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            },
        );

        {
            let mut pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Main Pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        },
                    )],
                    depth_stencil_attachment: Some(
                        wgpu::RenderPassDepthStencilAttachment {
                            view: &self.depth_view,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        },
                    ),
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });

            let geometry = match &self.current_key {
                Some(key) => self.cache.get(key),
                None => None,
            };
            if let Some(geometry) = geometry {
                draw_geometry(
                    &mut pass,
                    geometry,
                    &self.camera_bind_group,
                    if matches!(self.style, RenderStyle::Ribbon) {
                        &self.mesh_pipeline
                    } else {
                        &self.sphere_pipeline
                    },
                );
            }
        }

        context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        self.end_frame();
        Ok(())
    }

    fn end_frame(&mut self) {
        self.timing.end_frame();
        if let Some(duration) = self.timing.last_frame_duration() {
            self.lod.note_frame_time(duration);
        }
    }
}

fn draw_geometry(
    pass: &mut wgpu::RenderPass<'_>,
    geometry: &GpuGeometry,
    camera_bind_group: &wgpu::BindGroup,
    pipeline: &wgpu::RenderPipeline,
) {
    if geometry.index_count == 0 || geometry.instance_count == 0 {
        return;
    }
    pass.set_pipeline(pipeline);
    pass.set_bind_group(0, camera_bind_group, &[]);
    pass.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
    if let Some(instances) = &geometry.instance_buffer {
        pass.set_vertex_buffer(1, instances.slice(..));
    }
    pass.set_index_buffer(
        geometry.index_buffer.slice(..),
        wgpu::IndexFormat::Uint32,
    );
    pass.draw_indexed(
        0..geometry.index_count,
        0,
        0..geometry.instance_count,
    );
}

/// Build and upload the geometry for one (style, mode, level) key.
/// Sticks and Surface fall back to the sphere path at their adjusted
/// LOD level.
fn upload_geometry(
    device: &wgpu::Device,
    snapshot: &StructureSnapshot,
    options: &Options,
    highlight: &HashSet<char>,
    settings: &LodSettings,
    style: RenderStyle,
    mode: ColorMode,
) -> GpuGeometry {
    match style {
        RenderStyle::Ribbon => {
            let mesh = build_ribbon_mesh(
                snapshot,
                &options.geometry,
                &options.colors,
                highlight,
                settings,
            );
            GpuGeometry::upload_mesh(device, "Ribbon", &mesh)
        }
        RenderStyle::Spheres
        | RenderStyle::Sticks
        | RenderStyle::Surface => {
            let builder = InstancedSphereBuilder::new(
                settings.sphere_rings,
                settings.sphere_sectors,
            );
            let unit = builder.unit_sphere();
            let instances = build_sphere_instances(
                snapshot,
                &options.geometry,
                &options.colors,
                highlight,
                settings,
                mode,
            );
            GpuGeometry::upload_instanced(
                device, "Spheres", &unit, &instances,
            )
        }
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    camera_layout: &wgpu::BindGroupLayout,
    format: wgpu::TextureFormat,
    label: &str,
    shader_source: &str,
    buffers: &[wgpu::VertexBufferLayout<'_>],
) -> wgpu::RenderPipeline {
    let shader =
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{label} Shader")),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

    let layout =
        device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{label} Pipeline Layout")),
            bind_group_layouts: &[camera_layout],
            push_constant_ranges: &[],
        });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{label} Pipeline")),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn create_depth_view(
    device: &wgpu::Device,
    width: u32,
    height: u32,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lod::QualityLevel;
    use crate::structure::{Atom, Element, SecondaryStructure};
    use glam::Vec3;

    fn atom(serial: u32, chain: char, residue: i32, pos: Vec3) -> Atom {
        Atom {
            serial,
            element: Element::C,
            name: "CA".into(),
            chain,
            residue_name: "ALA".into(),
            residue_number: residue,
            position: pos,
            secondary_structure: SecondaryStructure::Helix,
            is_backbone: true,
            is_ligand: false,
            is_pocket: false,
        }
    }

    #[test]
    fn ribbon_mesh_counts_for_single_chain() {
        // 4 backbone atoms, 10 sub-samples per span, 8 radial segments:
        // 31 rings of 9 vertices and 30 * 8 * 2 triangles.
        let snapshot = StructureSnapshot::new(
            vec![
                atom(1, 'A', 1, Vec3::new(0.0, 0.0, 0.0)),
                atom(2, 'A', 2, Vec3::new(3.8, 0.5, 0.0)),
                atom(3, 'A', 3, Vec3::new(7.6, 0.0, 0.5)),
                atom(4, 'A', 4, Vec3::new(11.4, -0.5, 0.0)),
            ],
            Vec::new(),
        );
        let mesh = build_ribbon_mesh(
            &snapshot,
            &GeometryOptions::default(),
            &ColorOptions::default(),
            &HashSet::new(),
            &QualityLevel::Ultra.settings(),
        );
        assert_eq!(mesh.vertex_count(), 31 * 9);
        assert_eq!(mesh.triangle_count(), 30 * 8 * 2);
        assert!(mesh.is_valid());
    }

    #[test]
    fn ribbon_mesh_skips_chains_without_backbone() {
        let mut lone = atom(1, 'A', 1, Vec3::ZERO);
        lone.is_backbone = false;
        let snapshot = StructureSnapshot::new(vec![lone], Vec::new());
        let mesh = build_ribbon_mesh(
            &snapshot,
            &GeometryOptions::default(),
            &ColorOptions::default(),
            &HashSet::new(),
            &QualityLevel::Ultra.settings(),
        );
        assert!(mesh.is_empty());
    }

    #[test]
    fn ribbon_mesh_combines_multiple_chains() {
        let snapshot = StructureSnapshot::new(
            vec![
                atom(1, 'A', 1, Vec3::ZERO),
                atom(2, 'A', 2, Vec3::X * 3.8),
                atom(3, 'B', 1, Vec3::Y * 20.0),
                atom(4, 'B', 2, Vec3::Y * 20.0 + Vec3::X * 3.8),
            ],
            Vec::new(),
        );
        let settings = QualityLevel::Ultra.settings();
        let mesh = build_ribbon_mesh(
            &snapshot,
            &GeometryOptions::default(),
            &ColorOptions::default(),
            &HashSet::new(),
            &settings,
        );
        // Two 2-atom chains: each 11 rings of 9 vertices.
        assert_eq!(mesh.vertex_count(), 2 * 11 * 9);
        assert!(mesh.is_valid());
    }

    #[test]
    fn sphere_instances_respect_atom_cap() {
        let atoms: Vec<Atom> = (0..20_000)
            .map(|i| {
                atom(i as u32 + 1, 'A', i, Vec3::X * i as f32)
            })
            .collect();
        let snapshot = StructureSnapshot::new(atoms, Vec::new());

        let mut settings = QualityLevel::Ultra.settings();
        settings.atom_cap = Some(5_000);
        let instances = build_sphere_instances(
            &snapshot,
            &GeometryOptions::default(),
            &ColorOptions::default(),
            &HashSet::new(),
            &settings,
            ColorMode::Element,
        );
        assert_eq!(instances.len(), 5_000);
        // Stride sampling keeps every 4th atom, starting at index 0.
        assert_eq!(instances[0].position(), Vec3::ZERO);
        assert_eq!(instances[1].position(), Vec3::X * 4.0);
    }

    #[test]
    fn sphere_instances_scale_by_element() {
        let mut hydrogen = atom(1, 'A', 1, Vec3::ZERO);
        hydrogen.element = Element::H;
        let carbon = atom(2, 'A', 2, Vec3::X);
        let snapshot =
            StructureSnapshot::new(vec![hydrogen, carbon], Vec::new());

        let geometry = GeometryOptions::default();
        let instances = build_sphere_instances(
            &snapshot,
            &geometry,
            &ColorOptions::default(),
            &HashSet::new(),
            &QualityLevel::Ultra.settings(),
            ColorMode::Element,
        );
        assert_eq!(instances.len(), 2);
        assert!(instances[0].scale() < instances[1].scale());
        assert!(
            (instances[1].scale()
                - geometry.sphere_radius
                    * Element::C.radius_scale())
            .abs()
                < 1e-6
        );
    }

    #[test]
    fn highlight_changes_instance_colors_reversibly() {
        let snapshot = StructureSnapshot::new(
            vec![atom(1, 'A', 1, Vec3::ZERO), atom(2, 'B', 1, Vec3::X)],
            Vec::new(),
        );
        let geometry = GeometryOptions::default();
        let colors = ColorOptions::default();
        let settings = QualityLevel::Ultra.settings();

        let plain = build_sphere_instances(
            &snapshot,
            &geometry,
            &colors,
            &HashSet::new(),
            &settings,
            ColorMode::Chain,
        );
        let highlighted = build_sphere_instances(
            &snapshot,
            &geometry,
            &colors,
            &HashSet::from(['A']),
            &settings,
            ColorMode::Chain,
        );
        assert_ne!(plain[1].color, highlighted[1].color);

        let restored = build_sphere_instances(
            &snapshot,
            &geometry,
            &colors,
            &HashSet::new(),
            &settings,
            ColorMode::Chain,
        );
        assert_eq!(plain[0].color, restored[0].color);
        assert_eq!(plain[1].color, restored[1].color);
    }
}
