//! Live scene model
//!
//! This is the minimal in-memory stand-in for the host engine's scene:
//! stages with named positions, characters shown on them as portraits, and
//! flowcharts holding dialogue variables. Serializers read from it during
//! capture and write into it during restore.
//!
//! # Architecture
//!
//! - `stage`: `Stage` and its named position slots
//! - `character`: `Character`, `PortraitState`, `FacingDirection`
//! - `flowchart`: `Flowchart` and typed `VariableValue`s

pub mod character;
pub mod flowchart;
pub mod stage;

pub use character::{Character, FacingDirection, PortraitState};
pub use flowchart::{Flowchart, Variable, VariableValue};
pub use stage::Stage;

use crate::save::SaveError;

/// Entity kind ids, shared by the scene's enumeration and the serializers
pub mod kinds {
    pub const PORTRAIT: &str = "portrait";
    pub const STAGE: &str = "stage";
    pub const FLOWCHART: &str = "flowchart";
}

/// A reference to one live entity, by kind and name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRef {
    pub kind_id: String,
    pub name: String,
}

impl EntityRef {
    pub fn new(kind_id: impl Into<String>, name: impl Into<String>) -> Self {
        EntityRef {
            kind_id: kind_id.into(),
            name: name.into(),
        }
    }
}

/// Result of a by-name lookup
#[derive(Debug, Clone, Copy)]
pub enum SceneEntity<'a> {
    Stage(&'a Stage),
    Character(&'a Character),
    Flowchart(&'a Flowchart),
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub name: String,
    stages: Vec<Stage>,
    characters: Vec<Character>,
    flowcharts: Vec<Flowchart>,
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Scene {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn add_stage(&mut self, stage: Stage) {
        self.stages.push(stage);
    }

    pub fn add_character(&mut self, character: Character) {
        self.characters.push(character);
    }

    pub fn add_flowchart(&mut self, flowchart: Flowchart) {
        self.flowcharts.push(flowchart);
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn flowcharts(&self) -> &[Flowchart] {
        &self.flowcharts
    }

    pub fn stage(&self, name: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.name == name)
    }

    pub fn stage_mut(&mut self, name: &str) -> Option<&mut Stage> {
        self.stages.iter_mut().find(|s| s.name == name)
    }

    pub fn character(&self, name: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.name == name)
    }

    pub fn character_mut(&mut self, name: &str) -> Option<&mut Character> {
        self.characters.iter_mut().find(|c| c.name == name)
    }

    pub fn flowchart(&self, name: &str) -> Option<&Flowchart> {
        self.flowcharts.iter().find(|f| f.name == name)
    }

    pub fn flowchart_mut(&mut self, name: &str) -> Option<&mut Flowchart> {
        self.flowcharts.iter_mut().find(|f| f.name == name)
    }

    /// Looks up a live entity by kind id and name
    ///
    /// Returns None for unknown kinds as well as unknown names.
    pub fn find_by_name(&self, kind_id: &str, name: &str) -> Option<SceneEntity<'_>> {
        match kind_id {
            kinds::STAGE => self.stage(name).map(SceneEntity::Stage),
            kinds::PORTRAIT => self.character(name).map(SceneEntity::Character),
            kinds::FLOWCHART => self.flowchart(name).map(SceneEntity::Flowchart),
            _ => None,
        }
    }

    /// Every saveable entity in discovery order: stages, flowcharts, then characters
    pub fn entities(&self) -> Vec<EntityRef> {
        let stages = self.stages.iter().map(|s| EntityRef::new(kinds::STAGE, &s.name));
        let flowcharts = self
            .flowcharts
            .iter()
            .map(|f| EntityRef::new(kinds::FLOWCHART, &f.name));
        let characters = self
            .characters
            .iter()
            .map(|c| EntityRef::new(kinds::PORTRAIT, &c.name));

        stages.chain(flowcharts).chain(characters).collect()
    }

    /// Shows a character on a stage at a named position
    ///
    /// The portrait starts undimmed. Showing an already visible character
    /// moves it and keeps its dim state.
    pub fn show(
        &mut self,
        character: &str,
        stage: &str,
        position: &str,
        facing: FacingDirection,
    ) -> Result<(), SaveError> {
        let target = self
            .stage(stage)
            .ok_or_else(|| SaveError::StageNotFound(stage.to_string()))?;
        if !target.has_position(position) {
            return Err(SaveError::PositionNotFound {
                stage: stage.to_string(),
                position: position.to_string(),
            });
        }

        let character = self
            .character_mut(character)
            .ok_or_else(|| SaveError::CharacterNotFound(character.to_string()))?;
        let (dimmed, dim_fade) = character
            .portrait
            .as_ref()
            .map(|p| (p.dimmed, p.dim_fade))
            .unwrap_or((false, 1.0));

        character.portrait = Some(PortraitState {
            stage: stage.to_string(),
            position: position.to_string(),
            facing,
            dimmed,
            dim_fade,
        });
        Ok(())
    }

    pub fn hide(&mut self, character: &str) -> Result<(), SaveError> {
        let character = self
            .character_mut(character)
            .ok_or_else(|| SaveError::CharacterNotFound(character.to_string()))?;
        character.portrait = None;
        Ok(())
    }

    pub fn set_facing(&mut self, character: &str, facing: FacingDirection) -> Result<(), SaveError> {
        self.portrait_mut(character)?.facing = facing;
        Ok(())
    }

    /// Dims or undims a character's portrait
    ///
    /// The target state is recorded immediately; the visual fade runs over
    /// the stage's `fade_duration` as the scene is advanced. Dim requests on
    /// a stage with `dim_portraits` off are ignored; undimming always applies.
    pub fn set_dimmed(&mut self, character: &str, dimmed: bool) -> Result<(), SaveError> {
        let stage_name = self.portrait_mut(character)?.stage.clone();
        let (fade_duration, dimming_enabled) = self
            .stage(&stage_name)
            .map(|s| (s.fade_duration, s.dim_portraits))
            .ok_or(SaveError::StageNotFound(stage_name))?;

        if dimmed && !dimming_enabled {
            return Ok(());
        }

        let portrait = self.portrait_mut(character)?;
        if portrait.dimmed != dimmed {
            portrait.dimmed = dimmed;
            portrait.dim_fade = if fade_duration > 0.0 { 0.0 } else { 1.0 };
        }
        Ok(())
    }

    /// Advances every running fade by `dt` seconds
    ///
    /// Negative steps are treated as zero.
    pub fn advance(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        for character in &mut self.characters {
            let Some(portrait) = character.portrait.as_mut() else {
                continue;
            };
            if !portrait.is_fading() {
                continue;
            }

            let duration = self
                .stages
                .iter()
                .find(|s| s.name == portrait.stage)
                .map(|s| s.fade_duration)
                .unwrap_or(0.0);

            portrait.dim_fade = if duration > 0.0 {
                (portrait.dim_fade + dt / duration).min(1.0)
            } else {
                1.0
            };
        }
    }

    /// True when no visual transition is in progress
    pub fn is_settled(&self) -> bool {
        self.characters
            .iter()
            .filter_map(|c| c.portrait.as_ref())
            .all(|p| !p.is_fading())
    }

    fn portrait_mut(&mut self, character: &str) -> Result<&mut PortraitState, SaveError> {
        let found = self
            .character_mut(character)
            .ok_or_else(|| SaveError::CharacterNotFound(character.to_string()))?;
        found
            .portrait
            .as_mut()
            .ok_or_else(|| SaveError::NotOnStage(character.to_string()))
    }
}
