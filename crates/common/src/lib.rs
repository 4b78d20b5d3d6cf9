//! Shared types used across the standee crates.
//!
//! # Invariants
//! - A `Pose` is a world-space rigid transform; only its translation column is
//!   consumed by placement.
//! - Billboard scale is two-dimensional; depth scale is always 1.

mod types;

pub use types::{BillboardTransform, EntityId, Pose};
