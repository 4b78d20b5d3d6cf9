//! Scene graph for placed billboards, plus camera/viewport and render adapters.
//!
//! # Invariants
//! - The entity list and render child list stay in 1:1 correspondence.
//! - Mutations have no business-logic preconditions and never suspend.
//! - Renderers read the scene; they never mutate it.

mod camera;
mod graph;
mod renderer;

pub use camera::{PerspectiveCamera, Viewport};
pub use graph::{PlacedEntity, RenderNode, RenderScene, SceneGraph};
pub use renderer::{DebugTextRenderer, Renderer};

pub fn crate_info() -> &'static str {
    "standee-scene v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("scene"));
    }
}
