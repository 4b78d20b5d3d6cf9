use serde::{Deserialize, Serialize};

/// A discrete user intent from the UI surface.
///
/// The placement core consumes intents, never raw widget events, so any
/// front end (buttons, touch, scripted replay) drives the same logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    /// Place the selected character on the tracked surface.
    Place,
    /// Remove every placed character.
    ClearAll,
    /// Choose which character the next placement uses.
    SelectCharacter { character: String },
    /// Set the yaw applied to the next placement, in degrees.
    SetRotation { degrees: f32 },
    /// Set the uniform scale applied to the next placement.
    SetScale { scale: f32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_select_is_constructible() {
        let i = Intent::SelectCharacter {
            character: "character2".into(),
        };
        assert!(matches!(i, Intent::SelectCharacter { .. }));
    }

    #[test]
    fn intents_deserialize_from_tagged_json() {
        let place: Intent = serde_json::from_str(r#"{"intent":"place"}"#).unwrap();
        assert_eq!(place, Intent::Place);

        let rot: Intent = serde_json::from_str(r#"{"intent":"set_rotation","degrees":45.0}"#).unwrap();
        assert_eq!(rot, Intent::SetRotation { degrees: 45.0 });

        let sel: Intent =
            serde_json::from_str(r#"{"intent":"select_character","character":"character3"}"#)
                .unwrap();
        assert_eq!(
            sel,
            Intent::SelectCharacter {
                character: "character3".into()
            }
        );
    }
}
