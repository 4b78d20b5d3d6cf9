use serde::{Deserialize, Serialize};

/// A user's request to place a character billboard on the tracked surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementRequest {
    /// Logical character identifier, resolved through an [`AssetPathConvention`].
    pub asset_path: String,
    pub y_rotation_degrees: f32,
    pub uniform_scale: f32,
}

/// Reasons a placement request is malformed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidRequest {
    #[error("asset path is empty")]
    EmptyAssetPath,
    #[error("rotation is not finite: {0}")]
    NonFiniteRotation(f32),
    #[error("scale is not finite: {0}")]
    NonFiniteScale(f32),
    #[error("scale must be positive, got {0}")]
    NonPositiveScale(f32),
}

impl PlacementRequest {
    pub fn new(asset_path: impl Into<String>, y_rotation_degrees: f32, uniform_scale: f32) -> Self {
        Self {
            asset_path: asset_path.into(),
            y_rotation_degrees,
            uniform_scale,
        }
    }

    pub fn validate(&self) -> Result<(), InvalidRequest> {
        if self.asset_path.trim().is_empty() {
            return Err(InvalidRequest::EmptyAssetPath);
        }
        if !self.y_rotation_degrees.is_finite() {
            return Err(InvalidRequest::NonFiniteRotation(self.y_rotation_degrees));
        }
        if !self.uniform_scale.is_finite() {
            return Err(InvalidRequest::NonFiniteScale(self.uniform_scale));
        }
        if self.uniform_scale <= 0.0 {
            return Err(InvalidRequest::NonPositiveScale(self.uniform_scale));
        }
        Ok(())
    }
}

/// Maps a character identifier to its asset location: `{directory}/{id}.{extension}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPathConvention {
    pub directory: String,
    pub extension: String,
}

impl Default for AssetPathConvention {
    fn default() -> Self {
        Self {
            directory: "assets/characters".into(),
            extension: "png".into(),
        }
    }
}

impl AssetPathConvention {
    pub fn new(directory: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            extension: extension.into(),
        }
    }

    pub fn resolve(&self, character: &str) -> String {
        let dir = self.directory.trim_end_matches('/');
        let ext = self.extension.trim_start_matches('.');
        let file = if ext.is_empty() {
            character.to_string()
        } else {
            format!("{character}.{ext}")
        };
        if dir.is_empty() {
            file
        } else {
            format!("{dir}/{file}")
        }
    }
}
