use crate::graph::SceneGraph;

/// Backend-agnostic renderer interface.
///
/// A renderer reads the scene graph and produces output. It never mutates the
/// scene; placement state is owned by the graph.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame of the given scene.
    fn render(&self, scene: &SceneGraph) -> Self::Output;
}

/// Debug text renderer.
///
/// Produces a human-readable dump of camera, reticle and placed billboards.
/// Used by the CLI and for testing the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &SceneGraph) -> String {
        let mut out = String::new();
        let cam = scene.camera();
        let vp = scene.viewport();
        out.push_str(&format!("=== Scene (frame={}) ===\n", scene.frame()));
        out.push_str(&format!("Entities: {}\n", scene.len()));
        out.push_str(&format!(
            "Camera: eye=({:.1}, {:.1}, {:.1}) fov={:.0} viewport={}x{} aspect={:.3}\n",
            cam.position.x,
            cam.position.y,
            cam.position.z,
            cam.fov_degrees,
            vp.width,
            vp.height,
            cam.aspect()
        ));
        match scene.reticle() {
            Some(pose) => {
                let p = pose.translation();
                out.push_str(&format!(
                    "Reticle: pos=({:.2}, {:.2}, {:.2})\n",
                    p.x, p.y, p.z
                ));
            }
            None => out.push_str("Reticle: hidden\n"),
        }

        for entity in scene.entities() {
            let p = entity.world_position();
            let s = entity.scale();
            out.push_str(&format!(
                "  [{}] asset={} pos=({:.2}, {:.2}, {:.2}) yaw={:.1}deg scale=({:.2}, {:.2})\n",
                entity.id().short(),
                entity.asset().path(),
                p.x,
                p.y,
                p.z,
                entity.y_rotation_radians().to_degrees(),
                s.x,
                s.y
            ));
        }

        out
    }
}
