use crate::backend::{ContextError, DrawCall, Frame, GlVersion, GraphicsBackend};
use crate::config::RenderConfig;
use crate::uniform::ViewUniform;
use crate::view::View;
use glam::Mat4;
use tessera_common::EntityId;
use tessera_ecs::{ComponentError, ComponentKind, ComponentStore, Renderable};
use tessera_input::Action;
use tessera_kernel::{EntityData, Scene};

/// Errors from engine systems.
#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    #[error("system has not been started")]
    NotStarted,
    #[error("system already started")]
    AlreadyStarted,
    #[error("entity {0} does not exist in the scene")]
    UnknownEntity(EntityId),
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error(transparent)]
    Component(#[from] ComponentError),
}

/// The capability every engine system offers to the engine loop: build
/// components by type name, advance by a time step, look components up.
pub trait System {
    type Component;
    type Stats;

    fn name(&self) -> &'static str;

    /// Create a component of the named type for `entity` and attach it.
    fn factory(&mut self, kind: &str, entity: EntityId)
    -> Result<&Self::Component, SystemError>;

    /// Advance the system by `delta` seconds.
    fn update(&mut self, delta: f64) -> Result<Self::Stats, SystemError>;

    fn get_component(&self, entity: EntityId) -> Option<&Self::Component>;
}

/// Per-frame numbers from [`RenderSystem::update`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub frame: u64,
    pub draw_calls: usize,
    /// Renderables whose entity has left the scene.
    pub skipped: usize,
    /// Component events drained this frame.
    pub component_events: usize,
    pub accumulated_time: f64,
}

/// Render system: owns the camera, the scene, the renderable components and
/// the graphics backend.
///
/// The backend context is acquired by [`RenderSystem::start`] and released
/// when the system is dropped.
pub struct RenderSystem<B: GraphicsBackend> {
    config: RenderConfig,
    backend: B,
    version: Option<GlVersion>,
    scene: Scene,
    components: ComponentStore,
    camera: View,
    projection: Mat4,
    delta_accumulator: f64,
}

impl<B: GraphicsBackend> RenderSystem<B> {
    pub fn new(config: RenderConfig, backend: B) -> Self {
        let projection = projection_for(&config);
        Self {
            config,
            backend,
            version: None,
            scene: Scene::new(),
            components: ComponentStore::new(),
            camera: View::new(),
            projection,
            delta_accumulator: 0.0,
        }
    }

    /// Bring up the graphics context and return the version granted.
    ///
    /// A base context comes first. If the configured version is 3.0 or newer
    /// the system then asks for it and keeps the base context when that
    /// fails. A granted version below `min_version` is an error.
    pub fn start(&mut self) -> Result<GlVersion, SystemError> {
        if self.version.is_some() {
            return Err(SystemError::AlreadyStarted);
        }
        let _span = tracing::info_span!("render_start").entered();

        let mut granted = self.backend.create_context(GlVersion::LEGACY)?;
        let requested = self.config.requested_version;
        if requested.is_core() && requested > granted {
            match self.backend.create_context(requested) {
                Ok(v) => granted = v,
                Err(e) => {
                    tracing::warn!(error = %e, %requested, "falling back to base context");
                    granted = self.backend.create_context(GlVersion::LEGACY)?;
                }
            }
        }

        let required = self.config.min_version;
        if granted < required {
            self.backend.release();
            return Err(ContextError::Unsupported { granted, required }.into());
        }

        self.backend
            .set_viewport(self.config.width, self.config.height);
        self.version = Some(granted);
        tracing::info!(version = %granted, "render context ready");
        Ok(granted)
    }

    /// Context version in use, once started.
    pub fn version(&self) -> Option<GlVersion> {
        self.version
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn components(&self) -> &ComponentStore {
        &self.components
    }

    pub fn camera(&self) -> &View {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut View {
        &mut self.camera
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// Projection times the cached view matrix.
    pub fn vp_matrix(&self) -> Mat4 {
        self.projection * self.camera.view_matrix()
    }

    /// Total time passed to [`System::update`] so far.
    pub fn accumulated_time(&self) -> f64 {
        self.delta_accumulator
    }

    /// Change the window size; rebuilds the projection and viewport.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            tracing::debug!(width, height, "ignoring degenerate resize");
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.projection = projection_for(&self.config);
        if self.version.is_some() {
            self.backend.set_viewport(width, height);
        }
    }

    /// Apply an input action to the camera.
    pub fn handle_action(&mut self, action: &Action) {
        self.camera.apply(action);
    }

    /// Detach the component for `entity`.
    pub fn remove_component(&mut self, entity: EntityId) -> Option<Renderable> {
        self.components.remove(entity)
    }

    /// Remove an entity from the scene along with its components.
    pub fn despawn(&mut self, entity: EntityId) -> Option<EntityData> {
        self.components.remove_entity(entity);
        self.scene.despawn(entity)
    }

    fn build_frame(&mut self) -> (Frame, usize) {
        self.camera.update_view_matrix();
        let view = self.camera.view_matrix();
        let view_inverse = self.camera.view_inverse();
        let vp = self.projection * view;

        let mut skipped = 0;
        let mut draws = Vec::with_capacity(self.components.len());
        for (&entity, renderable) in self.components.renderables() {
            let Some(data) = self.scene.get(entity) else {
                skipped += 1;
                continue;
            };
            draws.push(DrawCall {
                entity,
                mesh: renderable.mesh,
                vertex_count: renderable.kind.vertex_count(),
                color: renderable.color,
                mvp: vp * data.transform.model_matrix(),
            });
        }

        let frame = Frame {
            index: self.scene.frame() + 1,
            uniform: ViewUniform::new(view, view_inverse, self.projection),
            draws,
        };
        (frame, skipped)
    }
}

impl<B: GraphicsBackend> System for RenderSystem<B> {
    type Component = Renderable;
    type Stats = FrameStats;

    fn name(&self) -> &'static str {
        "render"
    }

    fn factory(&mut self, kind: &str, entity: EntityId) -> Result<&Renderable, SystemError> {
        let kind: ComponentKind = kind.parse()?;
        if !self.scene.contains(entity) {
            return Err(SystemError::UnknownEntity(entity));
        }
        Ok(self.components.create(kind, entity))
    }

    /// Refresh the camera, draw every renderable entity and advance the
    /// scene clock.
    ///
    /// The clock only moves once the backend has accepted the frame.
    fn update(&mut self, delta: f64) -> Result<FrameStats, SystemError> {
        if self.version.is_none() {
            return Err(SystemError::NotStarted);
        }

        let (frame, skipped) = self.build_frame();
        self.backend.submit(&frame)?;

        self.delta_accumulator += delta;
        self.scene.advance(delta);

        let events = self.components.drain_events();
        if !events.is_empty() {
            tracing::debug!(count = events.len(), "component changes this frame");
        }

        let stats = FrameStats {
            frame: frame.index,
            draw_calls: frame.draws.len(),
            skipped,
            component_events: events.len(),
            accumulated_time: self.delta_accumulator,
        };
        tracing::trace!(
            frame = stats.frame,
            draws = stats.draw_calls,
            skipped,
            "frame submitted"
        );
        Ok(stats)
    }

    fn get_component(&self, entity: EntityId) -> Option<&Renderable> {
        self.components.get(entity)
    }
}

impl<B: GraphicsBackend> Drop for RenderSystem<B> {
    fn drop(&mut self) {
        if self.version.take().is_some() {
            self.backend.release();
            tracing::debug!("render context released");
        }
    }
}

fn projection_for(config: &RenderConfig) -> Mat4 {
    Mat4::perspective_rh_gl(
        config.fov_degrees.to_radians(),
        config.aspect(),
        config.near,
        config.far,
    )
}
