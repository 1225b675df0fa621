use serde::{Deserialize, Serialize};

/// Which way a portrait is facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FacingDirection {
    #[default]
    Left,
    Right,
}

/// Where and how a character's portrait is currently shown
#[derive(Debug, Clone, PartialEq)]
pub struct PortraitState {
    pub stage: String,
    pub position: String,
    pub facing: FacingDirection,
    /// Target dim state. Set immediately when a dim is requested.
    pub dimmed: bool,
    /// Visual progress of the current dim fade, 0.0 (just started) to 1.0 (settled)
    pub dim_fade: f32,
}

impl PortraitState {
    pub fn is_fading(&self) -> bool {
        self.dim_fade < 1.0
    }
}

/// A character that can appear on a stage as a portrait
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    pub name: String,
    pub portrait: Option<PortraitState>,
}

impl Character {
    pub fn new(name: impl Into<String>) -> Self {
        Character {
            name: name.into(),
            portrait: None,
        }
    }

    pub fn is_on_stage(&self) -> bool {
        self.portrait.is_some()
    }
}
