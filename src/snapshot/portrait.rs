//! Portrait snapshots: where a character is shown and how
//!
//! A [`PortraitSaveState`] is a plain value. It copies the fields it needs
//! out of a [`Character`] and keeps no reference to it, so a test can
//! capture, mutate the scene, and compare against the earlier capture.

use serde::{Deserialize, Serialize};

use crate::save::{SaveDataItem, SaveDataSerializer, SaveError, check_version, decode_payload, encode_payload};
use crate::scene::{Character, FacingDirection, PortraitState, Scene, kinds};

/// Current portrait payload version
///
/// Version 1 payloads predate dimming and use short field names.
pub const PORTRAIT_SAVE_VERSION: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortraitSaveState {
    pub character_name: String,
    /// Empty when the character is not on any stage
    pub stage_name: String,
    pub position_name: String,
    pub facing_direction: FacingDirection,
    pub dimmed: bool,
}

/// Version 1 payload layout
#[derive(Debug, Deserialize)]
struct PortraitSaveStateV1 {
    character: String,
    stage: String,
    position: String,
    facing: FacingDirection,
}

impl From<PortraitSaveStateV1> for PortraitSaveState {
    fn from(old: PortraitSaveStateV1) -> Self {
        PortraitSaveState {
            character_name: old.character,
            stage_name: old.stage,
            position_name: old.position,
            facing_direction: old.facing,
            dimmed: false,
        }
    }
}

impl PortraitSaveState {
    /// Captures a character's current portrait state
    ///
    /// Reads the target dim state, not the fade progress, so an in-flight
    /// fade does not change what is captured.
    pub fn from_character(character: &Character) -> Self {
        match &character.portrait {
            Some(portrait) => PortraitSaveState {
                character_name: character.name.clone(),
                stage_name: portrait.stage.clone(),
                position_name: portrait.position.clone(),
                facing_direction: portrait.facing,
                dimmed: portrait.dimmed,
            },
            None => PortraitSaveState {
                character_name: character.name.clone(),
                stage_name: String::new(),
                position_name: String::new(),
                facing_direction: FacingDirection::default(),
                dimmed: false,
            },
        }
    }

    pub fn is_on_stage(&self) -> bool {
        !self.stage_name.is_empty()
    }

    /// Puts the live character back into the captured state
    ///
    /// An off-stage snapshot hides the character. Fades are applied already
    /// settled.
    pub fn apply(&self, scene: &mut Scene) -> Result<(), SaveError> {
        if self.is_on_stage() {
            let stage = scene
                .stage(&self.stage_name)
                .ok_or_else(|| SaveError::StageNotFound(self.stage_name.clone()))?;
            if !stage.has_position(&self.position_name) {
                return Err(SaveError::PositionNotFound {
                    stage: self.stage_name.clone(),
                    position: self.position_name.clone(),
                });
            }
        }

        let character = scene
            .character_mut(&self.character_name)
            .ok_or_else(|| SaveError::CharacterNotFound(self.character_name.clone()))?;

        character.portrait = self.is_on_stage().then(|| PortraitState {
            stage: self.stage_name.clone(),
            position: self.position_name.clone(),
            facing: self.facing_direction,
            dimmed: self.dimmed,
            dim_fade: 1.0,
        });
        Ok(())
    }
}

/// Captures every character in the scene, in scene order
pub fn capture_portraits(scene: &Scene) -> Vec<PortraitSaveState> {
    scene
        .characters()
        .iter()
        .map(PortraitSaveState::from_character)
        .collect()
}

/// Serializer for the "portrait" kind
pub struct PortraitSerializer;

impl SaveDataSerializer for PortraitSerializer {
    fn kind_id(&self) -> &str {
        kinds::PORTRAIT
    }

    fn version(&self) -> u32 {
        PORTRAIT_SAVE_VERSION
    }

    fn encode(&self, scene: &Scene, name: &str) -> Result<SaveDataItem, SaveError> {
        let character = scene
            .character(name)
            .ok_or_else(|| SaveError::CharacterNotFound(name.to_string()))?;
        encode_payload(
            kinds::PORTRAIT,
            PORTRAIT_SAVE_VERSION,
            &PortraitSaveState::from_character(character),
        )
    }

    fn decode(&self, item: &SaveDataItem, scene: &mut Scene) -> Result<(), SaveError> {
        check_version(item, PORTRAIT_SAVE_VERSION)?;

        let state: PortraitSaveState = if item.version == 1 {
            let old: PortraitSaveStateV1 = decode_payload(item)?;
            log::debug!("Upgrading v1 portrait payload for '{}'", old.character);
            old.into()
        } else {
            decode_payload(item)?
        };

        state.apply(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Character, Stage};
    use crate::snapshot::snapshot_lists_match;

    const SHERLOCK: &str = "Sherlock Holmes";
    const WATSON: &str = "John Watson";

    /// Two characters on one stage, Watson dimmed
    fn baker_street() -> Scene {
        let mut scene = Scene::new("StageSavingTests");
        scene.add_stage(Stage::new("TestStage", ["TestLeft", "TestRight"]));
        scene.add_character(Character::new(SHERLOCK));
        scene.add_character(Character::new(WATSON));
        scene.show(SHERLOCK, "TestStage", "TestRight", FacingDirection::Left).unwrap();
        scene.show(WATSON, "TestStage", "TestLeft", FacingDirection::Right).unwrap();
        scene.set_dimmed(WATSON, true).unwrap();
        scene
    }

    fn state_for<'a>(states: &'a [PortraitSaveState], name: &str) -> Option<&'a PortraitSaveState> {
        states.iter().find(|s| s.character_name == name)
    }

    #[test]
    fn test_portraits_have_correct_characters() {
        let states = capture_portraits(&baker_street());

        assert_eq!(states.len(), 2);
        assert!(state_for(&states, SHERLOCK).is_some());
        assert!(state_for(&states, WATSON).is_some());
    }

    #[test]
    fn test_portrait_positions_saved() {
        let states = capture_portraits(&baker_street());

        assert_eq!(state_for(&states, SHERLOCK).unwrap().position_name, "TestRight");
        assert_eq!(state_for(&states, WATSON).unwrap().position_name, "TestLeft");
    }

    #[test]
    fn test_portrait_stage_names_saved() {
        let states = capture_portraits(&baker_street());

        assert!(states.iter().all(|s| s.stage_name == "TestStage"));
    }

    #[test]
    fn test_portrait_dim_states_saved() {
        let states = capture_portraits(&baker_street());

        assert!(!state_for(&states, SHERLOCK).unwrap().dimmed);
        assert!(state_for(&states, WATSON).unwrap().dimmed);
    }

    #[test]
    fn test_facing_directions_saved() {
        let states = capture_portraits(&baker_street());

        assert_eq!(state_for(&states, SHERLOCK).unwrap().facing_direction, FacingDirection::Left);
        assert_eq!(state_for(&states, WATSON).unwrap().facing_direction, FacingDirection::Right);
    }

    #[test]
    fn test_capture_does_not_hold_on_to_character() {
        let mut scene = baker_street();
        let before = capture_portraits(&scene);

        scene.set_facing(SHERLOCK, FacingDirection::Right).unwrap();
        scene.set_dimmed(WATSON, false).unwrap();

        assert_eq!(state_for(&before, SHERLOCK).unwrap().facing_direction, FacingDirection::Left);
        assert!(state_for(&before, WATSON).unwrap().dimmed);
        assert!(!snapshot_lists_match(&before, &capture_portraits(&scene)));
    }

    #[test]
    fn test_capture_then_apply_restores_state() {
        let mut scene = baker_street();
        let before = capture_portraits(&scene);

        scene.show(SHERLOCK, "TestStage", "TestLeft", FacingDirection::Right).unwrap();
        scene.hide(WATSON).unwrap();
        for state in &before {
            state.apply(&mut scene).unwrap();
        }

        assert!(snapshot_lists_match(&before, &capture_portraits(&scene)));
        assert!(scene.is_settled());
    }

    #[test]
    fn test_capture_ignores_fade_progress() {
        let mut scene = baker_street();
        let mid_fade = capture_portraits(&scene);
        scene.advance(10.0);

        assert!(snapshot_lists_match(&mid_fade, &capture_portraits(&scene)));
    }

    #[test]
    fn test_off_stage_character_round_trips() {
        let mut scene = baker_street();
        scene.hide(SHERLOCK).unwrap();
        let state = PortraitSaveState::from_character(scene.character(SHERLOCK).unwrap());
        assert!(!state.is_on_stage());

        scene.show(SHERLOCK, "TestStage", "TestRight", FacingDirection::Left).unwrap();
        state.apply(&mut scene).unwrap();
        assert!(!scene.character(SHERLOCK).unwrap().is_on_stage());
    }

    #[test]
    fn test_apply_missing_stage() {
        let states = capture_portraits(&baker_street());
        let mut bare = Scene::new("Empty");
        bare.add_character(Character::new(SHERLOCK));

        assert!(matches!(
            state_for(&states, SHERLOCK).unwrap().apply(&mut bare),
            Err(SaveError::StageNotFound(ref s)) if s == "TestStage"
        ));
    }

    #[test]
    fn test_apply_missing_character() {
        let states = capture_portraits(&baker_street());
        let mut scene = Scene::new("NoCast");
        scene.add_stage(Stage::new("TestStage", ["TestLeft", "TestRight"]));

        assert!(matches!(
            state_for(&states, WATSON).unwrap().apply(&mut scene),
            Err(SaveError::CharacterNotFound(_))
        ));
    }

    #[test]
    fn test_decode_upgrades_v1_payload() {
        let mut scene = baker_street();
        let item = SaveDataItem::new(
            kinds::PORTRAIT,
            1,
            r#"{"character":"John Watson","stage":"TestStage","position":"TestRight","facing":"Left"}"#,
        );

        PortraitSerializer.decode(&item, &mut scene).unwrap();

        let watson = PortraitSaveState::from_character(scene.character(WATSON).unwrap());
        assert_eq!(watson.position_name, "TestRight");
        assert_eq!(watson.facing_direction, FacingDirection::Left);
        assert!(!watson.dimmed);
    }

    #[test]
    fn test_decode_rejects_future_version() {
        let mut scene = baker_street();
        let item = SaveDataItem::new(kinds::PORTRAIT, 3, "{}");

        assert!(matches!(
            PortraitSerializer.decode(&item, &mut scene),
            Err(SaveError::UnsupportedVersion { found: 3, .. })
        ));
    }

    #[test]
    fn test_encode_payload_field_names() {
        let item = PortraitSerializer.encode(&baker_street(), WATSON).unwrap();

        assert_eq!(item.version, PORTRAIT_SAVE_VERSION);
        assert_eq!(
            item.payload,
            r#"{"characterName":"John Watson","stageName":"TestStage","positionName":"TestLeft","facingDirection":"Right","dimmed":true}"#
        );
    }
}
