//! AR session: the top-level object that owns the tracking provider and the
//! scene, and drives both from an explicit per-frame `tick()`.
//!
//! # Invariants
//! - Within a frame the tracker is fed before the scene is synced.
//! - Placements run on a single-threaded cooperative executor owned by the
//!   session; a tick never blocks on an asset load.
//! - A provider fault never fails a tick.
//! - `NoSurface` rejections produce no user notice.

mod config;
mod session;

pub use config::{CameraConfig, ConfigError, SessionConfig};
pub use session::{ArSession, UserNotice};

pub fn crate_info() -> &'static str {
    "standee-session v0.1.0"
}
