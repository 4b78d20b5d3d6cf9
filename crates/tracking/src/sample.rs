use serde::{Deserialize, Serialize};
use standee_common::Pose;
use std::collections::VecDeque;

/// One frame's hit-test result from the tracking provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingSample {
    /// No surface ahead of the viewer this frame.
    Lost,
    /// Best surface hit directly ahead of the viewer.
    Found { pose: Pose },
}

impl TrackingSample {
    pub fn found(pose: impl Into<Pose>) -> Self {
        Self::Found { pose: pose.into() }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    pub fn pose(&self) -> Option<Pose> {
        match self {
            Self::Found { pose } => Some(*pose),
            Self::Lost => None,
        }
    }

    /// Collapse a provider result into a sample the tracker can always consume.
    ///
    /// Provider faults and non-finite poses become `Lost`; the frame never fails.
    pub fn from_provider_result(result: Result<Self, TrackingError>) -> Self {
        match result {
            Ok(Self::Found { pose }) if !pose.is_finite() => {
                tracing::warn!("tracking provider returned a non-finite pose, treating as lost");
                Self::Lost
            }
            Ok(sample) => sample,
            Err(e) => {
                tracing::warn!(error = %e, "tracking provider fault, treating as lost");
                Self::Lost
            }
        }
    }
}

/// Errors a tracking provider can report for a frame.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackingError {
    #[error("tracking session unavailable: {0}")]
    SessionUnavailable(String),
    #[error("hit test failed: {0}")]
    HitTest(String),
}

/// Source of per-frame tracking samples. Polled once per render tick.
pub trait TrackingProvider {
    fn next_sample(&mut self) -> Result<TrackingSample, TrackingError>;
}

impl<P: TrackingProvider + ?Sized> TrackingProvider for Box<P> {
    fn next_sample(&mut self) -> Result<TrackingSample, TrackingError> {
        (**self).next_sample()
    }
}

/// Plays back a fixed list of frame results, then reports `Lost` forever.
#[derive(Debug, Clone, Default)]
pub struct ScriptedProvider {
    frames: VecDeque<Result<TrackingSample, TrackingError>>,
    served: u64,
}

impl ScriptedProvider {
    pub fn new(frames: impl IntoIterator<Item = Result<TrackingSample, TrackingError>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            served: 0,
        }
    }

    pub fn from_samples(samples: impl IntoIterator<Item = TrackingSample>) -> Self {
        Self::new(samples.into_iter().map(Ok))
    }

    /// Append a frame result to the end of the script.
    pub fn push(&mut self, frame: Result<TrackingSample, TrackingError>) {
        self.frames.push_back(frame);
    }

    /// Frames still queued.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    /// Frames served so far, including those past the end of the script.
    pub fn served(&self) -> u64 {
        self.served
    }
}

impl TrackingProvider for ScriptedProvider {
    fn next_sample(&mut self) -> Result<TrackingSample, TrackingError> {
        self.served += 1;
        self.frames.pop_front().unwrap_or(Ok(TrackingSample::Lost))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec3};

    #[test]
    fn found_sample_exposes_pose() {
        let pose = Pose::from_translation(Vec3::new(0.0, -1.0, -2.0));
        let s = TrackingSample::found(pose);
        assert!(s.is_found());
        assert_eq!(s.pose(), Some(pose));
        assert_eq!(TrackingSample::Lost.pose(), None);
    }

    #[test]
    fn provider_fault_becomes_lost() {
        let s = TrackingSample::from_provider_result(Err(TrackingError::HitTest("boom".into())));
        assert_eq!(s, TrackingSample::Lost);
    }

    #[test]
    fn non_finite_pose_becomes_lost() {
        let mut m = Mat4::IDENTITY;
        m.w_axis.x = f32::NAN;
        let s = TrackingSample::from_provider_result(Ok(TrackingSample::found(m)));
        assert_eq!(s, TrackingSample::Lost);
    }

    #[test]
    fn scripted_provider_plays_back_then_reports_lost() {
        let pose = Pose::from_translation(Vec3::X);
        let mut p = ScriptedProvider::new([
            Ok(TrackingSample::found(pose)),
            Err(TrackingError::SessionUnavailable("paused".into())),
        ]);
        assert_eq!(p.next_sample(), Ok(TrackingSample::found(pose)));
        assert!(p.next_sample().is_err());
        assert_eq!(p.next_sample(), Ok(TrackingSample::Lost));
        assert_eq!(p.served(), 3);
        assert_eq!(p.remaining(), 0);
    }

    #[test]
    fn sample_json_shape() {
        let lost: TrackingSample = serde_json::from_str("\"lost\"").unwrap();
        assert_eq!(lost, TrackingSample::Lost);

        let json = r#"{"found":{"pose":[1.0,0.0,0.0,0.0, 0.0,1.0,0.0,0.0, 0.0,0.0,1.0,0.0, 2.0,0.0,-3.0,1.0]}}"#;
        let found: TrackingSample = serde_json::from_str(json).unwrap();
        assert_eq!(
            found.pose().unwrap().translation(),
            Vec3::new(2.0, 0.0, -3.0)
        );
    }
}
