//! Scene kernel: entity ownership and the simulation clock.
//!
//! # Invariants
//! - Entity ids are never reused within a scene.
//! - Iteration order is deterministic (BTreeMap keyed by id).

pub mod scene;

pub use scene::{EntityData, Scene, SceneError};
