use serde::{Deserialize, Serialize};

use crate::save::{SaveDataItem, SaveDataSerializer, SaveError, check_version, decode_payload, encode_payload};
use crate::scene::{Scene, Stage, kinds};

pub const STAGE_SAVE_VERSION: u32 = 1;

/// Stage-level settings that change during play
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageSaveState {
    pub stage_name: String,
    pub dim_portraits: bool,
    pub visible: bool,
}

impl StageSaveState {
    pub fn from_stage(stage: &Stage) -> Self {
        StageSaveState {
            stage_name: stage.name.clone(),
            dim_portraits: stage.dim_portraits,
            visible: stage.visible,
        }
    }

    pub fn apply(&self, scene: &mut Scene) -> Result<(), SaveError> {
        let stage = scene
            .stage_mut(&self.stage_name)
            .ok_or_else(|| SaveError::StageNotFound(self.stage_name.clone()))?;
        stage.dim_portraits = self.dim_portraits;
        stage.visible = self.visible;
        Ok(())
    }
}

/// Serializer for the "stage" kind
pub struct StageSerializer;

impl SaveDataSerializer for StageSerializer {
    fn kind_id(&self) -> &str {
        kinds::STAGE
    }

    fn version(&self) -> u32 {
        STAGE_SAVE_VERSION
    }

    fn encode(&self, scene: &Scene, name: &str) -> Result<SaveDataItem, SaveError> {
        let stage = scene
            .stage(name)
            .ok_or_else(|| SaveError::StageNotFound(name.to_string()))?;
        encode_payload(kinds::STAGE, STAGE_SAVE_VERSION, &StageSaveState::from_stage(stage))
    }

    fn decode(&self, item: &SaveDataItem, scene: &mut Scene) -> Result<(), SaveError> {
        check_version(item, STAGE_SAVE_VERSION)?;
        decode_payload::<StageSaveState>(item)?.apply(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_settings_restored() {
        let mut scene = Scene::new("s");
        scene.add_stage(Stage::new("Main", ["Left"]));
        let item = StageSerializer.encode(&scene, "Main").unwrap();

        let stage = scene.stage_mut("Main").unwrap();
        stage.visible = false;
        stage.dim_portraits = false;
        StageSerializer.decode(&item, &mut scene).unwrap();

        let stage = scene.stage("Main").unwrap();
        assert!(stage.visible);
        assert!(stage.dim_portraits);
    }

    #[test]
    fn test_missing_stage_on_encode_and_decode() {
        let mut scene = Scene::new("s");
        let item = SaveDataItem::new(
            kinds::STAGE,
            1,
            r#"{"stageName":"Gone","dimPortraits":true,"visible":true}"#,
        );

        assert!(matches!(StageSerializer.encode(&scene, "Gone"), Err(SaveError::StageNotFound(_))));
        assert!(matches!(StageSerializer.decode(&item, &mut scene), Err(SaveError::StageNotFound(_))));
    }
}
