use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Render target size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height; `None` for a degenerate (minimized) viewport.
    pub fn aspect(&self) -> Option<f32> {
        (self.width > 0 && self.height > 0).then(|| self.width as f32 / self.height as f32)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

/// Perspective camera looking at the AR scene.
///
/// In AR the camera pose follows the device; here only the projection is
/// owned state, recomputed whenever the aspect ratio changes.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    aspect: f32,
    projection: Mat4,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 5.0), 75.0, 0.1, 1000.0, 16.0 / 9.0)
    }
}

impl PerspectiveCamera {
    pub fn new(position: Vec3, fov_degrees: f32, near: f32, far: f32, aspect: f32) -> Self {
        let mut camera = Self {
            position,
            target: Vec3::ZERO,
            fov_degrees,
            near,
            far,
            aspect,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection();
        camera
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_projection();
    }

    pub fn update_projection(&mut self) {
        self.projection =
            Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far);
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).try_normalize().unwrap_or(Vec3::NEG_Z)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera() {
        let cam = PerspectiveCamera::default();
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(cam.forward(), Vec3::NEG_Z);
        // Should produce a valid matrix (no NaN)
        assert!(cam.view_projection().is_finite());
    }

    #[test]
    fn set_aspect_recomputes_projection() {
        let mut cam = PerspectiveCamera::default();
        let before = cam.projection_matrix();
        cam.set_aspect(0.5);
        assert_ne!(cam.projection_matrix(), before);
        assert_eq!(cam.aspect(), 0.5);

        let once = cam.projection_matrix();
        cam.set_aspect(0.5);
        assert_eq!(cam.projection_matrix(), once);
    }

    #[test]
    fn viewport_aspect() {
        assert_eq!(Viewport::new(200, 100).aspect(), Some(2.0));
        assert_eq!(Viewport::new(0, 100).aspect(), None);
        assert_eq!(Viewport::default().aspect(), Some(1280.0 / 720.0));
    }
}
