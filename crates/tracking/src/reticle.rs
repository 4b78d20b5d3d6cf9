use standee_common::Pose;

use crate::sample::TrackingSample;

/// Receiver of reticle visibility flips.
///
/// Registered once, at tracker construction. Called at most once per actual
/// state change, never for a frame that reconfirms the current state.
pub trait VisibilityListener {
    fn on_visibility_changed(&mut self, visible: bool);
}

impl<F: FnMut(bool)> VisibilityListener for F {
    fn on_visibility_changed(&mut self, visible: bool) {
        self(visible)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReticleState {
    #[default]
    Hidden,
    Visible,
}

/// Value snapshot of the tracker, safe to hold across suspension points.
///
/// `pose` is the last pose seen while found; it is meaningful only when
/// `visible` is true.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReticleSnapshot {
    pub visible: bool,
    pub pose: Pose,
}

/// Per-tracker counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackerStats {
    pub frames: u64,
    pub found_frames: u64,
    pub transitions: u64,
}

/// Two-state reducer over the sample stream.
///
/// A found sample makes the reticle visible and overwrites the pose, every
/// frame. A lost sample hides it and leaves the pose untouched. The listener
/// fires only on `Hidden <-> Visible` flips.
pub struct ReticleTracker {
    state: ReticleState,
    pose: Pose,
    listener: Box<dyn VisibilityListener>,
    stats: TrackerStats,
}

impl ReticleTracker {
    /// Create a hidden tracker with an identity pose.
    pub fn new(listener: impl VisibilityListener + 'static) -> Self {
        Self {
            state: ReticleState::Hidden,
            pose: Pose::IDENTITY,
            listener: Box::new(listener),
            stats: TrackerStats::default(),
        }
    }

    /// Consume one frame's sample. Returns the new visibility if it flipped.
    pub fn feed(&mut self, sample: TrackingSample) -> Option<bool> {
        self.stats.frames += 1;
        let next = match sample {
            TrackingSample::Found { pose } => {
                self.stats.found_frames += 1;
                self.pose = pose;
                ReticleState::Visible
            }
            TrackingSample::Lost => ReticleState::Hidden,
        };

        if next == self.state {
            return None;
        }

        self.state = next;
        self.stats.transitions += 1;
        let visible = next == ReticleState::Visible;
        tracing::info!(visible, frame = self.stats.frames, "reticle visibility changed");
        self.listener.on_visibility_changed(visible);
        Some(visible)
    }

    pub fn current_pose(&self) -> ReticleSnapshot {
        ReticleSnapshot {
            visible: self.is_visible(),
            pose: self.pose,
        }
    }

    pub fn state(&self) -> ReticleState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state == ReticleState::Visible
    }

    pub fn stats(&self) -> TrackerStats {
        self.stats
    }
}

impl std::fmt::Debug for ReticleTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReticleTracker")
            .field("state", &self.state)
            .field("pose", &self.pose)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_tracker() -> (ReticleTracker, Rc<RefCell<Vec<bool>>>) {
        let calls: Rc<RefCell<Vec<bool>>> = Rc::default();
        let sink = Rc::clone(&calls);
        let tracker = ReticleTracker::new(move |visible: bool| sink.borrow_mut().push(visible));
        (tracker, calls)
    }

    fn found_at(x: f32) -> TrackingSample {
        TrackingSample::found(Pose::from_translation(Vec3::new(x, 0.0, -1.0)))
    }

    /// Splitmix64 step, for reproducible sample streams.
    fn splitmix64(mut state: u64) -> u64 {
        state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    #[test]
    fn starts_hidden_with_identity_pose() {
        let (tracker, calls) = recording_tracker();
        let snap = tracker.current_pose();
        assert!(!snap.visible);
        assert_eq!(snap.pose, Pose::IDENTITY);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn first_found_fires_once() {
        let (mut tracker, calls) = recording_tracker();
        assert_eq!(tracker.feed(found_at(1.0)), Some(true));
        assert_eq!(tracker.feed(found_at(2.0)), None);
        assert_eq!(tracker.feed(found_at(3.0)), None);
        assert_eq!(*calls.borrow(), vec![true]);
        assert_eq!(tracker.state(), ReticleState::Visible);
    }

    #[test]
    fn pose_tracks_every_found_frame() {
        let (mut tracker, _calls) = recording_tracker();
        tracker.feed(found_at(1.0));
        tracker.feed(found_at(4.0));
        assert_eq!(tracker.current_pose().pose.translation().x, 4.0);
    }

    #[test]
    fn lost_keeps_last_pose_silently() {
        let (mut tracker, calls) = recording_tracker();
        tracker.feed(found_at(7.0));
        assert_eq!(tracker.feed(TrackingSample::Lost), Some(false));
        assert_eq!(tracker.feed(TrackingSample::Lost), None);

        let snap = tracker.current_pose();
        assert!(!snap.visible);
        assert_eq!(snap.pose.translation(), Vec3::new(7.0, 0.0, -1.0));
        assert_eq!(*calls.borrow(), vec![true, false]);
    }

    #[test]
    fn lost_while_hidden_does_not_notify() {
        let (mut tracker, calls) = recording_tracker();
        for _ in 0..10 {
            assert_eq!(tracker.feed(TrackingSample::Lost), None);
        }
        assert!(calls.borrow().is_empty());
        assert_eq!(tracker.current_pose().pose, Pose::IDENTITY);
    }

    #[test]
    fn one_notification_per_run_boundary() {
        let (mut tracker, calls) = recording_tracker();
        let mut rng = 42u64;
        let mut expected = Vec::new();
        let mut visible = false;
        let mut last_found = Pose::IDENTITY;

        for i in 0..2_000 {
            rng = splitmix64(rng);
            // Runs of varying length: flip with probability ~1/4.
            let found = if rng % 4 == 0 { !visible } else { visible };
            let sample = if found {
                let s = found_at(i as f32);
                last_found = s.pose().unwrap();
                s
            } else {
                TrackingSample::Lost
            };
            if found != visible {
                expected.push(found);
                visible = found;
            }
            tracker.feed(sample);
            assert_eq!(tracker.current_pose().pose, last_found);
            assert_eq!(tracker.is_visible(), visible);
        }

        assert_eq!(*calls.borrow(), expected);
        assert_eq!(tracker.stats().transitions, expected.len() as u64);
        assert_eq!(tracker.stats().frames, 2_000);
    }
}
