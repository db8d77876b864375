//! Shared types for the tessera engine crates.

mod types;

pub use types::{EntityId, Transform};
