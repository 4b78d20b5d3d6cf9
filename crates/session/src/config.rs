use glam::Vec3;
use serde::{Deserialize, Serialize};
use standee_input::PlacementControls;
use standee_placement::AssetPathConvention;
use standee_scene::{PerspectiveCamera, Viewport};
use std::path::Path;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Camera parameters. The aspect ratio comes from the viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            position: Vec3::new(0.0, 0.0, 5.0),
        }
    }
}

impl CameraConfig {
    pub fn build(&self, viewport: Viewport) -> PerspectiveCamera {
        PerspectiveCamera::new(
            self.position,
            self.fov_degrees,
            self.near,
            self.far,
            viewport.aspect().unwrap_or(16.0 / 9.0),
        )
    }
}

/// Session settings, loadable from YAML. Every field is optional.
///
/// ```yaml
/// assets:
///   directory: assets/characters
///   extension: png
/// default_character: character2
/// viewport: { width: 1920, height: 1080 }
/// camera:
///   fov_degrees: 60
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub assets: AssetPathConvention,
    pub default_character: String,
    pub default_rotation_degrees: f32,
    pub default_scale: f32,
    pub viewport: Viewport,
    pub camera: CameraConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            assets: AssetPathConvention::default(),
            default_character: "character1".into(),
            default_rotation_degrees: 0.0,
            default_scale: 1.0,
            viewport: Viewport::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl SessionConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&contents)?;
        tracing::debug!(path = %path.display(), "session config loaded");
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject camera settings that would produce a degenerate projection.
    /// Placement defaults are validated per request, not here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cam = &self.camera;
        if !(cam.fov_degrees > 0.0 && cam.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "camera.fov_degrees must be in (0, 180), got {}",
                cam.fov_degrees
            )));
        }
        if !(cam.near > 0.0 && cam.far > cam.near) {
            return Err(ConfigError::Invalid(format!(
                "camera clip planes must satisfy 0 < near < far, got near={} far={}",
                cam.near, cam.far
            )));
        }
        if !cam.position.is_finite() {
            return Err(ConfigError::Invalid("camera.position is not finite".into()));
        }
        Ok(())
    }

    /// Initial state of the placement UI.
    pub fn controls(&self) -> PlacementControls {
        PlacementControls::new(
            self.default_character.clone(),
            self.default_rotation_degrees,
            self.default_scale,
        )
    }
}
