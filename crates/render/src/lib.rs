//! Rendering: the camera view transform and the render system around it.
//!
//! # Invariants
//! - The view matrix is only rebuilt on request; the render system requests
//!   it once per frame, before drawing.
//! - The render system holds at most one graphics context, released on drop.

mod backend;
mod config;
mod mesh;
mod system;
mod uniform;
mod view;

pub use backend::{ContextError, DrawCall, Frame, GlVersion, GraphicsBackend, HeadlessBackend};
pub use config::{ConfigError, RenderConfig};
pub use mesh::{Vertex, mesh_vertices};
pub use system::{FrameStats, RenderSystem, System, SystemError};
pub use uniform::ViewUniform;
pub use view::{DEFAULT_ORIENTATION, View, delta_quaternion};

pub fn crate_info() -> &'static str {
    "tessera-render v0.1.0"
}
