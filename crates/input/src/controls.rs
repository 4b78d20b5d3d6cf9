use standee_placement::PlacementRequest;

use crate::intent::Intent;

/// What the session should do in response to an intent.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Place(PlacementRequest),
    ClearAll,
}

/// State behind the placement UI: selected character, rotation and scale
/// sliders, and the single placement button.
///
/// The button starts disabled and follows reticle visibility. Slider values
/// are stored as given; validation belongs to the placement controller.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementControls {
    selected_character: String,
    rotation_degrees: f32,
    scale: f32,
    place_enabled: bool,
}

impl Default for PlacementControls {
    fn default() -> Self {
        Self::new("character1", 0.0, 1.0)
    }
}

impl PlacementControls {
    pub fn new(character: impl Into<String>, rotation_degrees: f32, scale: f32) -> Self {
        Self {
            selected_character: character.into(),
            rotation_degrees,
            scale,
            place_enabled: false,
        }
    }

    /// Apply an intent. Returns a command when the session has work to do.
    pub fn apply(&mut self, intent: Intent) -> Option<Command> {
        match intent {
            Intent::Place if self.place_enabled => Some(Command::Place(self.request())),
            Intent::Place => {
                tracing::debug!("place ignored, placement control disabled");
                None
            }
            Intent::ClearAll => Some(Command::ClearAll),
            Intent::SelectCharacter { character } => {
                tracing::debug!(%character, "character selected");
                self.selected_character = character;
                None
            }
            Intent::SetRotation { degrees } => {
                self.rotation_degrees = degrees;
                None
            }
            Intent::SetScale { scale } => {
                self.scale = scale;
                None
            }
        }
    }

    /// Follow a reticle visibility flip.
    pub fn set_place_enabled(&mut self, enabled: bool) {
        self.place_enabled = enabled;
    }

    pub fn place_enabled(&self) -> bool {
        self.place_enabled
    }

    pub fn selected_character(&self) -> &str {
        &self.selected_character
    }

    pub fn rotation_degrees(&self) -> f32 {
        self.rotation_degrees
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// The request the placement button would issue right now.
    pub fn request(&self) -> PlacementRequest {
        PlacementRequest::new(
            self.selected_character.clone(),
            self.rotation_degrees,
            self.scale,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_initial_ui() {
        let c = PlacementControls::default();
        assert_eq!(c.selected_character(), "character1");
        assert_eq!(c.rotation_degrees(), 0.0);
        assert_eq!(c.scale(), 1.0);
        assert!(!c.place_enabled());
    }

    #[test]
    fn place_requires_enabled_button() {
        let mut c = PlacementControls::default();
        assert_eq!(c.apply(Intent::Place), None);

        c.set_place_enabled(true);
        assert_eq!(
            c.apply(Intent::Place),
            Some(Command::Place(PlacementRequest::new("character1", 0.0, 1.0)))
        );

        c.set_place_enabled(false);
        assert_eq!(c.apply(Intent::Place), None);
    }

    #[test]
    fn sliders_and_selection_shape_the_request() {
        let mut c = PlacementControls::default();
        c.set_place_enabled(true);
        assert_eq!(
            c.apply(Intent::SelectCharacter {
                character: "character2".into()
            }),
            None
        );
        c.apply(Intent::SetRotation { degrees: 180.0 });
        c.apply(Intent::SetScale { scale: 2.5 });

        assert_eq!(
            c.apply(Intent::Place),
            Some(Command::Place(PlacementRequest::new("character2", 180.0, 2.5)))
        );
    }

    #[test]
    fn clear_is_always_available() {
        let mut c = PlacementControls::default();
        assert_eq!(c.apply(Intent::ClearAll), Some(Command::ClearAll));
    }
}
