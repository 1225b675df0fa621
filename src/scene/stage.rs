/// A named region characters can be shown on
///
/// Positions are named slots ("Left", "Right", ...) a portrait can occupy.
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    pub name: String,
    pub positions: Vec<String>,
    /// Whether portraits on this stage may be dimmed (see `Scene::set_dimmed`)
    pub dim_portraits: bool,
    /// Seconds a dim/undim fade takes
    pub fade_duration: f32,
    pub visible: bool,
}

impl Stage {
    pub fn new<I, S>(name: impl Into<String>, positions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Stage {
            name: name.into(),
            positions: positions.into_iter().map(Into::into).collect(),
            dim_portraits: true,
            fade_duration: 0.5,
            visible: true,
        }
    }

    pub fn with_fade_duration(mut self, seconds: f32) -> Self {
        self.fade_duration = seconds.max(0.0);
        self
    }

    pub fn has_position(&self, position: &str) -> bool {
        self.positions.iter().any(|p| p == position)
    }
}
