use glam::{Mat4, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a placed entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for log lines.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// World-space pose of a tracked surface, as reported by the tracking provider.
///
/// Column-major 4x4 matrix; the translation lives in the fourth column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pose(pub Mat4);

impl Pose {
    pub const IDENTITY: Self = Self(Mat4::IDENTITY);

    pub fn from_translation(translation: Vec3) -> Self {
        Self(Mat4::from_translation(translation))
    }

    pub fn matrix(&self) -> Mat4 {
        self.0
    }

    /// Translation column of the pose.
    pub fn translation(&self) -> Vec3 {
        self.0.w_axis.truncate()
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<Mat4> for Pose {
    fn from(m: Mat4) -> Self {
        Self(m)
    }
}

/// Placement transform of a billboard: position, yaw about +Y, and 2D scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BillboardTransform {
    pub position: Vec3,
    pub yaw_radians: f32,
    pub scale: Vec2,
}

impl BillboardTransform {
    /// World matrix: translate * rotate_y * scale(x, y, 1).
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale.extend(1.0),
            Quat::from_rotation_y(self.yaw_radians),
            self.position,
        )
    }
}

impl Default for BillboardTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw_radians: 0.0,
            scale: Vec2::ONE,
        }
    }
}
