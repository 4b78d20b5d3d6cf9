use glam::{Mat4, Vec2, Vec3};
use standee_assets::{AssetEntry, TextureHandle};
use standee_common::{BillboardTransform, EntityId, Pose};
use std::rc::Rc;

use crate::camera::{PerspectiveCamera, Viewport};

/// A billboard committed to the scene.
///
/// The asset is shared with the cache, not owned. Scale is fixed at creation.
#[derive(Debug, Clone)]
pub struct PlacedEntity {
    id: EntityId,
    asset: Rc<AssetEntry>,
    transform: BillboardTransform,
}

impl PlacedEntity {
    pub fn new(
        asset: Rc<AssetEntry>,
        world_position: Vec3,
        y_rotation_radians: f32,
        scale: Vec2,
    ) -> Self {
        Self {
            id: EntityId::new(),
            asset,
            transform: BillboardTransform {
                position: world_position,
                yaw_radians: y_rotation_radians,
                scale,
            },
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn asset(&self) -> &Rc<AssetEntry> {
        &self.asset
    }

    pub fn world_position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn y_rotation_radians(&self) -> f32 {
        self.transform.yaw_radians
    }

    pub fn scale(&self) -> Vec2 {
        self.transform.scale
    }

    pub fn transform(&self) -> &BillboardTransform {
        &self.transform
    }
}

/// Render-side child of the scene: what the backend draws for one entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderNode {
    pub entity: EntityId,
    pub texture: TextureHandle,
    pub world: Mat4,
}

impl RenderNode {
    fn for_entity(entity: &PlacedEntity) -> Self {
        Self {
            entity: entity.id,
            texture: entity.asset.texture(),
            world: entity.transform.to_matrix(),
        }
    }
}

/// Child list consumed by the render backend.
#[derive(Debug, Clone, Default)]
pub struct RenderScene {
    children: Vec<RenderNode>,
}

impl RenderScene {
    pub fn children(&self) -> &[RenderNode] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// Owner of placed entities plus camera, viewport and reticle state.
///
/// The entity list and the render child list are index-aligned; every mutation
/// updates both before returning and none of them suspends.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    entities: Vec<PlacedEntity>,
    render: RenderScene,
    camera: PerspectiveCamera,
    viewport: Viewport,
    reticle: Option<Pose>,
    frame: u64,
}

impl SceneGraph {
    pub fn new(camera: PerspectiveCamera, viewport: Viewport) -> Self {
        let mut scene = Self {
            camera,
            viewport,
            ..Default::default()
        };
        if let Some(aspect) = viewport.aspect() {
            scene.camera.set_aspect(aspect);
        }
        scene
    }

    /// Append an entity. Returns its id.
    pub fn add(&mut self, entity: PlacedEntity) -> EntityId {
        let id = entity.id;
        self.render.children.push(RenderNode::for_entity(&entity));
        self.entities.push(entity);
        tracing::debug!(entity = %id.short(), count = self.entities.len(), "entity added");
        id
    }

    /// Remove an entity by id. Absent ids are a no-op.
    pub fn remove(&mut self, id: EntityId) -> Option<PlacedEntity> {
        let index = self.entities.iter().position(|e| e.id == id)?;
        let node = self.render.children.remove(index);
        debug_assert_eq!(node.entity, id);
        let entity = self.entities.remove(index);
        tracing::debug!(entity = %id.short(), count = self.entities.len(), "entity removed");
        Some(entity)
    }

    /// Remove every entity. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.entities.len();
        self.entities.clear();
        self.render.children.clear();
        tracing::debug!(removed, "scene cleared");
        removed
    }

    /// Placed entities in insertion order.
    pub fn entities(&self) -> &[PlacedEntity] {
        &self.entities
    }

    pub fn get(&self, id: EntityId) -> Option<&PlacedEntity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn render_scene(&self) -> &RenderScene {
        &self.render
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Recompute projection for a new viewport size.
    ///
    /// Cheap and idempotent; zero-sized viewports are ignored.
    pub fn on_viewport_resize(&mut self, width: u32, height: u32) {
        let viewport = Viewport::new(width, height);
        let Some(aspect) = viewport.aspect() else {
            tracing::trace!(width, height, "ignoring degenerate viewport");
            return;
        };
        self.viewport = viewport;
        self.camera.set_aspect(aspect);
    }

    /// Reticle pose shown this frame, if the surface is tracked.
    pub fn reticle(&self) -> Option<Pose> {
        self.reticle
    }

    /// Render-sync step of a tick: publish the reticle and advance the frame.
    pub fn sync_frame(&mut self, reticle: Option<Pose>) -> u64 {
        self.reticle = reticle;
        self.frame += 1;
        self.frame
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}
