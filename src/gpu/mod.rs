//! GPU resource ownership: device/queue context and uploaded geometry
//! handles.
//!
//! All resource creation and destruction happens on the thread owning
//! the graphics context; nothing here locks.

pub mod geometry_buffers;
pub mod render_context;

pub use geometry_buffers::{GpuGeometry, MeshVertex};
pub use render_context::{RenderContext, RenderContextError};
