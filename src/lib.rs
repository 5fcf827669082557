//! Procedural molecular structure rendering engine built on wgpu.
//!
//! Molviz turns a parsed molecular structure into GPU-ready geometry and
//! draws it: backbone ribbons via Catmull-Rom splines extruded into
//! tubes, and atom spheres via a single instanced unit mesh. Rendering
//! quality degrades gracefully under load through a deterministic
//! level-of-detail policy, and uploaded geometry is cached and aged out
//! by a release-before-evict buffer cache.
//!
//! # Key entry points
//!
//! - [`pipeline::RenderPipeline`] - per-frame orchestration (gestures,
//!   LOD, cache, draw calls)
//! - [`structure::StructureSnapshot`] - the immutable loaded molecule
//! - [`options::Options`] - runtime configuration (camera, geometry,
//!   LOD, colors) with TOML presets
//! - [`input::gesture_queue`] - the channel feeding camera gestures from
//!   the input thread to the render thread
//!
//! # Architecture
//!
//! Input events never touch renderer state directly: gestures are
//! enqueued as [`input::CameraCommand`] values and drained once per
//! frame by the render thread. All geometry construction is pure CPU
//! code ([`pipeline::build_ribbon_mesh`],
//! [`pipeline::build_sphere_instances`]), so the full frame-preparation
//! path is testable without a GPU.

pub mod cache;
pub mod camera;
pub mod color;
pub mod error;
pub mod geometry;
pub mod gpu;
pub mod input;
pub mod lod;
pub mod options;
pub mod pipeline;
pub mod structure;
pub mod util;
