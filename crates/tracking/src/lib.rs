//! Surface tracking: per-frame provider samples reduced to a debounced reticle.
//!
//! # Invariants
//! - The tracker performs no I/O; it is a reducer plus one listener call.
//! - Visibility flips are the only observable events; pose updates are silent.
//! - The pose is never cleared on loss of tracking.
//! - A provider fault is a lost frame, never a failed tick.

mod reticle;
mod sample;

pub use reticle::{ReticleSnapshot, ReticleState, ReticleTracker, TrackerStats, VisibilityListener};
pub use sample::{ScriptedProvider, TrackingError, TrackingProvider, TrackingSample};

pub fn crate_info() -> &'static str {
    "standee-tracking v0.1.0"
}
