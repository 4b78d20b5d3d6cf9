//! User intents: the UI surface reduced to discrete, front-end-agnostic actions.
//!
//! # Invariants
//! - The placement button is disabled until the reticle becomes visible.
//! - Intents never touch the scene directly; they produce commands.

pub mod controls;
pub mod intent;

pub use controls::{Command, PlacementControls};
pub use intent::Intent;

pub fn crate_info() -> &'static str {
    "standee-input v0.1.0"
}
