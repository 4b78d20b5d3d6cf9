//! Placement: turns a user's placement request into a committed billboard.
//!
//! # Invariants
//! - Requests are validated before the tracker is consulted.
//! - No asset is loaded while the surface is untracked.
//! - The commit uses the tracker state observed after the asset load, never
//!   the state at request time.
//! - Rejections are returned as values; `place` never fails the caller.

mod controller;
mod request;

pub use controller::{PlacementController, PlacementOutcome, RejectReason};
pub use request::{AssetPathConvention, InvalidRequest, PlacementRequest};

pub fn crate_info() -> &'static str {
    "standee-placement v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("placement"));
    }
}
