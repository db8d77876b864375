//! Component model for render systems.
//!
//! Components are stored in BTreeMap keyed by entity for deterministic
//! iteration order. Systems create components from a type name through
//! [`ComponentKind`], which is the only place type strings are interpreted.
//!
//! # Invariants
//! - All component mutations produce events.
//! - At most one renderable per entity.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use tessera_common::EntityId;

/// A handle referencing a mesh owned by the graphics backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeshHandle(pub u32);

/// Errors from component creation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComponentError {
    #[error("unknown component type: {0:?}")]
    UnknownType(String),
}

/// The component types a render system can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    Triangle,
    Quad,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 2] = [ComponentKind::Triangle, ComponentKind::Quad];

    pub fn name(self) -> &'static str {
        match self {
            Self::Triangle => "triangle",
            Self::Quad => "quad",
        }
    }

    /// Built-in mesh for this kind. Each kind owns one vertex array.
    pub fn mesh(self) -> MeshHandle {
        match self {
            Self::Triangle => MeshHandle(0),
            Self::Quad => MeshHandle(1),
        }
    }

    /// Vertex count of the built-in mesh.
    pub fn vertex_count(self) -> u32 {
        match self {
            Self::Triangle => 3,
            Self::Quad => 6,
        }
    }

    fn default_color(self) -> [f32; 4] {
        match self {
            Self::Triangle => [1.0, 0.0, 0.0, 1.0],
            Self::Quad => [0.0, 0.0, 1.0, 1.0],
        }
    }
}

impl FromStr for ComponentKind {
    type Err = ComponentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ComponentError::UnknownType(s.to_string()))
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Renderable component: what to draw for an entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Renderable {
    pub kind: ComponentKind,
    pub mesh: MeshHandle,
    pub color: [f32; 4],
}

impl Renderable {
    pub fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            mesh: kind.mesh(),
            color: kind.default_color(),
        }
    }
}

/// Events produced by component mutations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ComponentEvent {
    Added { entity: EntityId, renderable: Renderable },
    Replaced { entity: EntityId, old: Renderable, new: Renderable },
    Removed { entity: EntityId, renderable: Renderable },
}

/// Component storage for a render system.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentStore {
    renderables: BTreeMap<EntityId, Renderable>,
    #[serde(skip)]
    events: Vec<ComponentEvent>,
}

impl ComponentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain and return all pending component events.
    pub fn drain_events(&mut self) -> Vec<ComponentEvent> {
        std::mem::take(&mut self.events)
    }

    /// Read-only access to pending events.
    pub fn events(&self) -> &[ComponentEvent] {
        &self.events
    }

    /// Build a component of `kind` for `entity`, replacing any existing one.
    pub fn create(&mut self, kind: ComponentKind, entity: EntityId) -> &Renderable {
        self.insert(entity, Renderable::new(kind));
        tracing::debug!(%entity, %kind, "component created");
        &self.renderables[&entity]
    }

    pub fn insert(&mut self, entity: EntityId, renderable: Renderable) {
        if let Some(old) = self.renderables.insert(entity, renderable) {
            self.events.push(ComponentEvent::Replaced {
                entity,
                old,
                new: renderable,
            });
        } else {
            self.events.push(ComponentEvent::Added { entity, renderable });
        }
    }

    pub fn remove(&mut self, entity: EntityId) -> Option<Renderable> {
        let removed = self.renderables.remove(&entity);
        if let Some(renderable) = removed {
            self.events.push(ComponentEvent::Removed { entity, renderable });
        }
        removed
    }

    /// Remove all components for an entity.
    pub fn remove_entity(&mut self, entity: EntityId) {
        self.remove(entity);
    }

    pub fn get(&self, entity: EntityId) -> Option<&Renderable> {
        self.renderables.get(&entity)
    }

    pub fn renderables(&self) -> &BTreeMap<EntityId, Renderable> {
        &self.renderables
    }

    pub fn len(&self) -> usize {
        self.renderables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderables.is_empty()
    }
}
