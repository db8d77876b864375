use crate::mesh::{Vertex, mesh_vertices};
use crate::uniform::ViewUniform;
use glam::Mat4;
use serde::{Deserialize, Serialize};
use tessera_common::EntityId;
use tessera_ecs::{ComponentKind, MeshHandle};

/// An OpenGL context version, ordered by (major, minor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GlVersion {
    pub major: u8,
    pub minor: u8,
}

impl GlVersion {
    /// What a plain pixel-format context gives before any extension is used.
    pub const LEGACY: GlVersion = GlVersion::new(2, 1);

    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// Whether this version needs the attribute-based creation path.
    pub fn is_core(self) -> bool {
        self.major >= 3
    }
}

impl std::fmt::Display for GlVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Errors from the graphics context.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    #[error("context version {requested} unavailable (driver supports up to {available})")]
    VersionUnavailable {
        requested: GlVersion,
        available: GlVersion,
    },
    #[error("context version {granted} is below the required {required}")]
    Unsupported {
        granted: GlVersion,
        required: GlVersion,
    },
    #[error("no current context")]
    NoContext,
}

/// One draw of a built-in mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub entity: EntityId,
    pub mesh: MeshHandle,
    pub vertex_count: u32,
    pub color: [f32; 4],
    /// projection * view * model
    pub mvp: Mat4,
}

/// Everything a backend needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub index: u64,
    pub uniform: ViewUniform,
    pub draws: Vec<DrawCall>,
}

/// The platform side of a render system: context lifetime and draw
/// submission.
///
/// A backend holds at most one context. Creating a new one replaces the
/// previous context.
pub trait GraphicsBackend {
    /// Create a context of exactly `version`.
    fn create_context(&mut self, version: GlVersion) -> Result<GlVersion, ContextError>;

    fn set_viewport(&mut self, width: u32, height: u32);

    fn submit(&mut self, frame: &Frame) -> Result<(), ContextError>;

    /// Release the current context, if any.
    fn release(&mut self);
}

impl<B: GraphicsBackend + ?Sized> GraphicsBackend for &mut B {
    fn create_context(&mut self, version: GlVersion) -> Result<GlVersion, ContextError> {
        (**self).create_context(version)
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        (**self).set_viewport(width, height);
    }

    fn submit(&mut self, frame: &Frame) -> Result<(), ContextError> {
        (**self).submit(frame)
    }

    fn release(&mut self) {
        (**self).release();
    }
}

/// In-memory backend: no window, no driver. Keeps the last submitted frame
/// and counters for inspection.
#[derive(Debug, Clone)]
pub struct HeadlessBackend {
    max_version: GlVersion,
    current: Option<GlVersion>,
    viewport: (u32, u32),
    uploaded_bytes: usize,
    frames_submitted: u64,
    draws_submitted: u64,
    last_frame: Option<Frame>,
    releases: u32,
}

impl HeadlessBackend {
    /// A backend whose pretend driver supports versions up to `max_version`.
    pub fn new(max_version: GlVersion) -> Self {
        Self {
            max_version,
            current: None,
            viewport: (0, 0),
            uploaded_bytes: 0,
            frames_submitted: 0,
            draws_submitted: 0,
            last_frame: None,
            releases: 0,
        }
    }

    pub fn current_version(&self) -> Option<GlVersion> {
        self.current
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Bytes of vertex data uploaded for the current context.
    pub fn uploaded_bytes(&self) -> usize {
        self.uploaded_bytes
    }

    pub fn frames_submitted(&self) -> u64 {
        self.frames_submitted
    }

    pub fn draws_submitted(&self) -> u64 {
        self.draws_submitted
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }

    /// How many times a live context was released.
    pub fn releases(&self) -> u32 {
        self.releases
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new(GlVersion::new(4, 6))
    }
}

impl GraphicsBackend for HeadlessBackend {
    fn create_context(&mut self, version: GlVersion) -> Result<GlVersion, ContextError> {
        if version > self.max_version {
            return Err(ContextError::VersionUnavailable {
                requested: version,
                available: self.max_version,
            });
        }
        self.current = Some(version);
        self.uploaded_bytes = ComponentKind::ALL
            .into_iter()
            .map(|kind| bytemuck::cast_slice::<Vertex, u8>(mesh_vertices(kind).as_slice()).len())
            .sum();
        tracing::debug!(%version, bytes = self.uploaded_bytes, "headless context created");
        Ok(version)
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    fn submit(&mut self, frame: &Frame) -> Result<(), ContextError> {
        if self.current.is_none() {
            return Err(ContextError::NoContext);
        }
        self.frames_submitted += 1;
        self.draws_submitted += frame.draws.len() as u64;
        self.last_frame = Some(frame.clone());
        Ok(())
    }

    fn release(&mut self) {
        if self.current.take().is_some() {
            self.releases += 1;
            self.uploaded_bytes = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_frame() -> Frame {
        Frame {
            index: 0,
            uniform: ViewUniform::default(),
            draws: Vec::new(),
        }
    }

    #[test]
    fn versions_order_by_major_then_minor() {
        assert!(GlVersion::new(3, 3) > GlVersion::new(3, 0));
        assert!(GlVersion::new(4, 0) > GlVersion::new(3, 3));
        assert!(GlVersion::LEGACY < GlVersion::new(3, 0));
        assert!(!GlVersion::LEGACY.is_core());
        assert_eq!(GlVersion::new(3, 3).to_string(), "3.3");
    }

    #[test]
    fn create_context_within_driver_limit() {
        let mut backend = HeadlessBackend::new(GlVersion::new(3, 3));
        assert_eq!(
            backend.create_context(GlVersion::new(3, 3)),
            Ok(GlVersion::new(3, 3))
        );
        assert_eq!(backend.current_version(), Some(GlVersion::new(3, 3)));
        assert!(backend.uploaded_bytes() > 0);
    }

    #[test]
    fn create_context_above_driver_limit_fails() {
        let mut backend = HeadlessBackend::new(GlVersion::LEGACY);
        let err = backend.create_context(GlVersion::new(3, 0)).unwrap_err();
        assert_eq!(
            err,
            ContextError::VersionUnavailable {
                requested: GlVersion::new(3, 0),
                available: GlVersion::LEGACY,
            }
        );
        assert_eq!(backend.current_version(), None);
    }

    #[test]
    fn submit_requires_context() {
        let mut backend = HeadlessBackend::default();
        assert_eq!(backend.submit(&empty_frame()), Err(ContextError::NoContext));

        backend.create_context(GlVersion::LEGACY).unwrap();
        backend.submit(&empty_frame()).unwrap();
        assert_eq!(backend.frames_submitted(), 1);
        assert!(backend.last_frame().is_some());
    }

    #[test]
    fn release_is_counted_once() {
        let mut backend = HeadlessBackend::default();
        backend.create_context(GlVersion::LEGACY).unwrap();
        backend.release();
        backend.release();
        assert_eq!(backend.releases(), 1);
        assert_eq!(backend.current_version(), None);
    }
}
