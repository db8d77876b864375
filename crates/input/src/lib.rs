//! Input actions: the events a render system's camera responds to.
//!
//! # Invariants
//! - Systems consume actions, never raw input events.

pub mod action;
pub mod script;

pub use action::Action;
pub use script::{ScriptError, parse_script};
