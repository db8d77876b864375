use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tessera_common::{EntityId, Transform};

/// Errors from scene mutations.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("entity {0} already exists")]
    DuplicateEntity(EntityId),
    #[error("entity {0} not found")]
    EntityNotFound(EntityId),
    #[error("entity ids exhausted")]
    IdsExhausted,
}

/// Per-entity data stored in the scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityData {
    pub transform: Transform,
}

/// The scene owned by a system: every entity and its transform.
///
/// Systems attach components to entities by id; the scene itself knows
/// nothing about components.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    entities: BTreeMap<EntityId, EntityData>,
    /// Next id [`Scene::spawn`] hands out; `None` once `u32::MAX` is taken.
    next_id: Option<EntityId>,
    frame: u64,
    elapsed: f64,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            entities: BTreeMap::new(),
            next_id: Some(EntityId(1)),
            frame: 0,
            elapsed: 0.0,
        }
    }
}

impl Scene {
    /// Create an empty scene. The first spawned entity gets id 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames the scene has been advanced.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Total simulated time in seconds.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Number of entities in the scene.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Read-only access to all entities, ordered by id.
    pub fn entities(&self) -> &BTreeMap<EntityId, EntityData> {
        &self.entities
    }

    /// Spawn a new entity with the given transform. Returns its id.
    ///
    /// Ids only grow; once `u32::MAX` has been handed out this fails with
    /// [`SceneError::IdsExhausted`].
    pub fn spawn(&mut self, transform: Transform) -> Result<EntityId, SceneError> {
        let id = self.next_id.ok_or(SceneError::IdsExhausted)?;
        if self.entities.contains_key(&id) {
            return Err(SceneError::DuplicateEntity(id));
        }
        self.entities.insert(id, EntityData { transform });
        self.next_id = id.next();
        tracing::debug!(%id, "spawned entity");
        Ok(id)
    }

    /// Spawn an entity with a caller-chosen id.
    ///
    /// Later calls to [`Scene::spawn`] skip past it.
    pub fn spawn_with_id(&mut self, id: EntityId, transform: Transform) -> Result<(), SceneError> {
        if self.entities.contains_key(&id) {
            return Err(SceneError::DuplicateEntity(id));
        }
        self.entities.insert(id, EntityData { transform });
        if self.next_id.is_some_and(|next| id >= next) {
            self.next_id = id.next();
        }
        tracing::debug!(%id, "spawned entity with explicit id");
        Ok(())
    }

    /// Remove an entity. Returns the data if it existed.
    pub fn despawn(&mut self, id: EntityId) -> Option<EntityData> {
        let data = self.entities.remove(&id);
        if data.is_some() {
            tracing::debug!(%id, "despawned entity");
        }
        data
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&EntityData> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut EntityData> {
        self.entities.get_mut(&id)
    }

    /// Replace an entity's transform.
    pub fn set_transform(&mut self, id: EntityId, transform: Transform) -> Result<(), SceneError> {
        let data = self
            .entities
            .get_mut(&id)
            .ok_or(SceneError::EntityNotFound(id))?;
        data.transform = transform;
        Ok(())
    }

    /// Advance the scene clock by `delta` seconds.
    pub fn advance(&mut self, delta: f64) {
        self.frame += 1;
        self.elapsed += delta;
        tracing::trace!(frame = self.frame, elapsed = self.elapsed, "scene advanced");
    }
}
