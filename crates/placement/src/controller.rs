use glam::Vec2;
use standee_assets::{AssetCache, AssetLoadError, DecodeError, ImageDecoder};
use standee_scene::{PlacedEntity, SceneGraph};
use standee_tracking::{ReticleSnapshot, ReticleTracker};
use std::cell::RefCell;
use std::rc::Rc;

use crate::request::{AssetPathConvention, InvalidRequest, PlacementRequest};

/// Why a placement did not commit.
#[derive(Debug, thiserror::Error)]
pub enum RejectReason {
    #[error("invalid placement request: {0}")]
    InvalidRequest(#[from] InvalidRequest),
    /// No surface tracked at request time or at commit time. Retryable.
    #[error("no tracked surface")]
    NoSurface,
    #[error("asset unavailable: {0}")]
    AssetUnavailable(#[source] AssetLoadError),
    /// The decoder backend failed for reasons unrelated to the asset.
    #[error("placement failed: {0}")]
    Fault(#[source] AssetLoadError),
}

impl RejectReason {
    /// Whether the user should be told. `NoSurface` is conveyed by the
    /// placement control being disabled instead.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, Self::NoSurface)
    }
}

/// Result of a placement attempt. Never an `Err`: rejections are values.
#[derive(Debug)]
pub enum PlacementOutcome {
    Committed(PlacedEntity),
    Rejected(RejectReason),
}

impl PlacementOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }

    pub fn entity(&self) -> Option<&PlacedEntity> {
        match self {
            Self::Committed(entity) => Some(entity),
            Self::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&RejectReason> {
        match self {
            Self::Committed(_) => None,
            Self::Rejected(reason) => Some(reason),
        }
    }
}

/// Orchestrates placement: tracker precondition, asset resolution, commit.
///
/// Holds shared handles to the session-owned tracker, cache and scene. The
/// only suspension point is the asset load; the tracker is read as a value
/// snapshot before and after it, and the commit uses the later snapshot.
pub struct PlacementController<D> {
    tracker: Rc<RefCell<ReticleTracker>>,
    assets: Rc<AssetCache<D>>,
    scene: Rc<RefCell<SceneGraph>>,
    paths: AssetPathConvention,
}

impl<D> Clone for PlacementController<D> {
    fn clone(&self) -> Self {
        Self {
            tracker: Rc::clone(&self.tracker),
            assets: Rc::clone(&self.assets),
            scene: Rc::clone(&self.scene),
            paths: self.paths.clone(),
        }
    }
}

impl<D: ImageDecoder> PlacementController<D> {
    pub fn new(
        tracker: Rc<RefCell<ReticleTracker>>,
        assets: Rc<AssetCache<D>>,
        scene: Rc<RefCell<SceneGraph>>,
        paths: AssetPathConvention,
    ) -> Self {
        Self {
            tracker,
            assets,
            scene,
            paths,
        }
    }

    pub fn paths(&self) -> &AssetPathConvention {
        &self.paths
    }

    /// Attempt to place a billboard on the currently tracked surface.
    ///
    /// May suspend while the asset decodes; callers must not block a render
    /// tick on it. Once started it runs to completion.
    pub async fn place(&self, request: PlacementRequest) -> PlacementOutcome {
        if let Err(invalid) = request.validate() {
            tracing::warn!(?request, error = %invalid, "placement request rejected");
            return PlacementOutcome::Rejected(invalid.into());
        }

        if !self.snapshot().visible {
            tracing::debug!(asset = %request.asset_path, "no surface, placement skipped");
            return PlacementOutcome::Rejected(RejectReason::NoSurface);
        }

        let path = self.paths.resolve(&request.asset_path);
        let entry = match self.assets.load(&path).await {
            Ok(entry) => entry,
            Err(e) if matches!(e.cause, DecodeError::Backend(_)) => {
                tracing::error!(path = %path, error = %e, "decoder fault during placement");
                return PlacementOutcome::Rejected(RejectReason::Fault(e));
            }
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "placement asset unavailable");
                return PlacementOutcome::Rejected(RejectReason::AssetUnavailable(e));
            }
        };

        // The surface may have moved or vanished while the asset loaded.
        let at_commit = self.snapshot();
        if !at_commit.visible {
            tracing::info!(path = %path, "surface lost during asset load, placement dropped");
            return PlacementOutcome::Rejected(RejectReason::NoSurface);
        }

        let scale = Vec2::new(request.uniform_scale * entry.aspect(), request.uniform_scale);
        let entity = PlacedEntity::new(
            entry,
            at_commit.pose.translation(),
            request.y_rotation_degrees.to_radians(),
            scale,
        );
        let id = self.scene.borrow_mut().add(entity.clone());

        let p = entity.world_position();
        tracing::info!(
            entity = %id.short(),
            path = %path,
            "placed at ({:.2}, {:.2}, {:.2})",
            p.x,
            p.y,
            p.z
        );
        PlacementOutcome::Committed(entity)
    }

    /// Remove every placed entity. The asset cache is left untouched.
    pub fn clear_all(&self) -> usize {
        let removed = self.scene.borrow_mut().clear();
        tracing::info!(removed, "all placements cleared");
        removed
    }

    fn snapshot(&self) -> ReticleSnapshot {
        self.tracker.borrow().current_pose()
    }
}
