use glam::Vec3;
use serde::Deserialize;
use standee_common::Pose;
use standee_input::Intent;
use standee_tracking::{ScriptedProvider, TrackingError, TrackingSample};

/// A replayable session: one entry per frame.
///
/// ```json
/// { "frames": [
///     {},
///     { "surface": [0.0, -1.0, -2.0] },
///     { "surface": [0.0, -1.0, -2.0], "intents": [{ "intent": "place" }] },
///     { "fault": "hit test unavailable" },
///     { "resize": [800, 600] }
/// ] }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Script {
    pub frames: Vec<Frame>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Frame {
    /// Tracked surface position. Absent means no surface this frame.
    pub surface: Option<Vec3>,
    /// Provider fault for this frame. Overrides `surface`.
    pub fault: Option<String>,
    /// Intents issued after this frame's tick.
    pub intents: Vec<Intent>,
    /// Viewport resize applied before this frame's tick.
    pub resize: Option<(u32, u32)>,
}

impl Frame {
    pub fn lost() -> Self {
        Self::default()
    }

    pub fn at(surface: Vec3) -> Self {
        Self {
            surface: Some(surface),
            ..Self::default()
        }
    }

    pub fn with(mut self, intent: Intent) -> Self {
        self.intents.push(intent);
        self
    }

    pub fn provider_result(&self) -> Result<TrackingSample, TrackingError> {
        if let Some(fault) = &self.fault {
            return Err(TrackingError::HitTest(fault.clone()));
        }
        Ok(match self.surface {
            Some(p) => TrackingSample::found(Pose::from_translation(p)),
            None => TrackingSample::Lost,
        })
    }
}

impl Script {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn provider(&self) -> ScriptedProvider {
        ScriptedProvider::new(self.frames.iter().map(Frame::provider_result))
    }

    /// Built-in walkthrough: surface search, two placements, a lost
    /// surface, a missing character, then a clear.
    pub fn demo() -> Self {
        let floor = Vec3::new(0.0, -1.2, -2.0);
        let table = Vec3::new(0.6, -0.7, -1.1);
        Self {
            frames: vec![
                Frame::lost(),
                Frame::lost(),
                Frame::at(floor),
                Frame::at(floor).with(Intent::Place),
                Frame::at(floor)
                    .with(Intent::SelectCharacter {
                        character: "character2".into(),
                    })
                    .with(Intent::SetRotation { degrees: 90.0 }),
                Frame::at(table)
                    .with(Intent::SetScale { scale: 0.5 })
                    .with(Intent::Place),
                Frame::lost().with(Intent::Place),
                Frame {
                    fault: Some("tracking interrupted".into()),
                    ..Frame::default()
                },
                Frame::at(table)
                    .with(Intent::SelectCharacter {
                        character: "character9".into(),
                    })
                    .with(Intent::Place),
                Frame::at(table).with(Intent::ClearAll),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_frames_with_defaults() {
        let script = Script::from_json(
            r#"{ "frames": [
                {},
                { "surface": [1.0, 2.0, 3.0], "intents": [{ "intent": "place" }] },
                { "fault": "boom", "surface": [0.0, 0.0, 0.0] },
                { "resize": [640, 480] }
            ] }"#,
        )
        .unwrap();

        assert_eq!(script.frames.len(), 4);
        assert_eq!(script.frames[0].provider_result(), Ok(TrackingSample::Lost));
        assert_eq!(script.frames[1].intents, vec![Intent::Place]);
        assert!(script.frames[1].provider_result().unwrap().is_found());
        assert_eq!(
            script.frames[2].provider_result(),
            Err(TrackingError::HitTest("boom".into()))
        );
        assert_eq!(script.frames[3].resize, Some((640, 480)));
    }

    #[test]
    fn provider_replays_every_frame() {
        let script = Script::demo();
        let provider = script.provider();
        assert_eq!(provider.remaining(), script.frames.len());
    }
}
