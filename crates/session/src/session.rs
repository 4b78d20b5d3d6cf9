use futures::executor::{LocalPool, LocalSpawner};
use futures::task::LocalSpawnExt;
use standee_assets::{AssetCache, CacheStats, ImageDecoder};
use standee_input::{Command, Intent, PlacementControls};
use standee_placement::{PlacementController, PlacementOutcome, PlacementRequest, RejectReason};
use standee_scene::{Renderer, SceneGraph};
use standee_tracking::{ReticleSnapshot, ReticleTracker, TrackerStats, TrackingProvider, TrackingSample};
use std::cell::{Cell, Ref, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::config::SessionConfig;

/// One-shot notice for the user-facing layer.
#[derive(Debug, Clone, PartialEq)]
pub enum UserNotice {
    /// The placement control became enabled (`true`) or disabled (`false`).
    PlacementAvailable(bool),
    /// A placement the user asked for was refused.
    PlacementFailed(String),
    /// A placement could not complete because of an internal fault.
    PlacementFault(String),
}

/// Top-level AR session.
///
/// Owns the tracking provider and hands shared handles of the tracker, asset
/// cache and scene graph to the placement controller. Everything runs on the
/// caller's thread: [`ArSession::tick`] feeds the tracker, polls in-flight
/// placements, then syncs the scene for rendering.
pub struct ArSession<P, D> {
    provider: P,
    tracker: Rc<RefCell<ReticleTracker>>,
    assets: Rc<AssetCache<D>>,
    scene: Rc<RefCell<SceneGraph>>,
    controller: PlacementController<D>,
    controls: Rc<RefCell<PlacementControls>>,
    notices: Rc<RefCell<VecDeque<UserNotice>>>,
    outcomes: Rc<RefCell<VecDeque<PlacementOutcome>>>,
    in_flight: Rc<Cell<usize>>,
    pool: LocalPool,
    spawner: LocalSpawner,
}

impl<P: TrackingProvider, D: ImageDecoder + 'static> ArSession<P, D> {
    pub fn new(config: &SessionConfig, provider: P, decoder: D) -> Self {
        let controls = Rc::new(RefCell::new(config.controls()));
        let notices: Rc<RefCell<VecDeque<UserNotice>>> = Rc::default();

        let tracker = {
            let controls = Rc::clone(&controls);
            let notices = Rc::clone(&notices);
            Rc::new(RefCell::new(ReticleTracker::new(move |visible: bool| {
                controls.borrow_mut().set_place_enabled(visible);
                notices
                    .borrow_mut()
                    .push_back(UserNotice::PlacementAvailable(visible));
            })))
        };

        let camera = config.camera.build(config.viewport);
        let scene = Rc::new(RefCell::new(SceneGraph::new(camera, config.viewport)));
        let assets = Rc::new(AssetCache::new(decoder));
        let controller = PlacementController::new(
            Rc::clone(&tracker),
            Rc::clone(&assets),
            Rc::clone(&scene),
            config.assets.clone(),
        );

        let pool = LocalPool::new();
        let spawner = pool.spawner();
        tracing::info!(
            character = %config.default_character,
            viewport = ?config.viewport,
            "session started"
        );

        Self {
            provider,
            tracker,
            assets,
            scene,
            controller,
            controls,
            notices,
            outcomes: Rc::default(),
            in_flight: Rc::default(),
            pool,
            spawner,
        }
    }

    /// Advance one frame. Returns the frame number just rendered.
    ///
    /// Order within a frame: provider sample, tracker update, pending
    /// placements, scene sync. A provider fault counts as a lost frame.
    pub fn tick(&mut self) -> u64 {
        let span = tracing::info_span!("session_tick", frame = self.scene.borrow().frame() + 1);
        let _enter = span.enter();

        let sample = TrackingSample::from_provider_result(self.provider.next_sample());
        tracing::trace!(found = sample.is_found(), "tracking sample");
        self.tracker.borrow_mut().feed(sample);

        self.pool.run_until_stalled();

        let snapshot = self.tracker.borrow().current_pose();
        let reticle = snapshot.visible.then_some(snapshot.pose);
        self.scene.borrow_mut().sync_frame(reticle)
    }

    /// Route a UI intent. Placements are started immediately and run until
    /// they first suspend; the rest completes on later ticks.
    pub fn handle_intent(&mut self, intent: Intent) {
        let command = self.controls.borrow_mut().apply(intent);
        match command {
            Some(Command::Place(request)) => self.start_placement(request),
            Some(Command::ClearAll) => {
                self.controller.clear_all();
            }
            None => {}
        }
    }

    fn start_placement(&mut self, request: PlacementRequest) {
        let controller = self.controller.clone();
        let notices = Rc::clone(&self.notices);
        let outcomes = Rc::clone(&self.outcomes);
        let in_flight = Rc::clone(&self.in_flight);

        in_flight.set(in_flight.get() + 1);
        let task = async move {
            let outcome = controller.place(request).await;
            let notice = outcome.rejection().and_then(|reason| match reason {
                RejectReason::Fault(_) => Some(UserNotice::PlacementFault(reason.to_string())),
                _ if reason.is_user_visible() => {
                    Some(UserNotice::PlacementFailed(reason.to_string()))
                }
                _ => None,
            });
            if let Some(notice) = notice {
                notices.borrow_mut().push_back(notice);
            }
            outcomes.borrow_mut().push_back(outcome);
            in_flight.set(in_flight.get() - 1);
        };

        if let Err(e) = self.spawner.spawn_local(task) {
            self.in_flight.set(self.in_flight.get() - 1);
            tracing::warn!(error = %e, "placement could not be scheduled");
            return;
        }
        self.pool.run_until_stalled();
    }

    /// Placements started but not yet resolved.
    pub fn pending_placements(&self) -> usize {
        self.in_flight.get()
    }

    /// Resolved placement outcomes, oldest first.
    pub fn drain_outcomes(&mut self) -> Vec<PlacementOutcome> {
        self.outcomes.borrow_mut().drain(..).collect()
    }

    /// Notices for the user, oldest first.
    pub fn drain_notices(&mut self) -> Vec<UserNotice> {
        self.notices.borrow_mut().drain(..).collect()
    }

    pub fn on_viewport_resize(&mut self, width: u32, height: u32) {
        self.scene.borrow_mut().on_viewport_resize(width, height);
    }

    pub fn render<R: Renderer>(&self, renderer: &R) -> R::Output {
        renderer.render(&self.scene.borrow())
    }

    pub fn scene(&self) -> Ref<'_, SceneGraph> {
        self.scene.borrow()
    }

    pub fn controls(&self) -> PlacementControls {
        self.controls.borrow().clone()
    }

    pub fn reticle(&self) -> ReticleSnapshot {
        self.tracker.borrow().current_pose()
    }

    pub fn tracker_stats(&self) -> TrackerStats {
        self.tracker.borrow().stats()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.assets.stats()
    }

    pub fn assets(&self) -> &AssetCache<D> {
        &self.assets
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }
}

impl<P, D> std::fmt::Debug for ArSession<P, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArSession")
            .field("tracker", &self.tracker.borrow())
            .field("entities", &self.scene.borrow().len())
            .field("pending_placements", &self.in_flight.get())
            .finish_non_exhaustive()
    }
}
