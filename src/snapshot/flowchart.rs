use serde::{Deserialize, Serialize};

use crate::save::{SaveDataItem, SaveDataSerializer, SaveError, check_version, decode_payload, encode_payload};
use crate::scene::{Flowchart, Scene, Variable, VariableValue, kinds};

pub const FLOWCHART_SAVE_VERSION: u32 = 1;

/// Dialogue variables of one flowchart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowchartSaveState {
    pub flowchart_name: String,
    pub variables: Vec<Variable>,
}

impl FlowchartSaveState {
    pub fn from_flowchart(flowchart: &Flowchart) -> Self {
        FlowchartSaveState {
            flowchart_name: flowchart.name.clone(),
            variables: flowchart.variables.clone(),
        }
    }

    /// Writes saved values back into existing variables
    ///
    /// Keys the live flowchart no longer declares, or whose type changed,
    /// are skipped.
    pub fn apply(&self, scene: &mut Scene) -> Result<(), SaveError> {
        let flowchart = scene
            .flowchart_mut(&self.flowchart_name)
            .ok_or_else(|| SaveError::FlowchartNotFound(self.flowchart_name.clone()))?;

        for saved in &self.variables {
            match flowchart.variables.iter_mut().find(|v| v.key == saved.key) {
                Some(live) if live.value.same_type(&saved.value) => live.value = saved.value.clone(),
                Some(_) => log::warn!(
                    "Variable '{}' in '{}' changed type, keeping live value",
                    saved.key,
                    self.flowchart_name
                ),
                None => log::warn!(
                    "Variable '{}' no longer exists in '{}', skipping",
                    saved.key,
                    self.flowchart_name
                ),
            }
        }
        Ok(())
    }
}

/// Serializer for the "flowchart" kind
pub struct FlowchartSerializer;

impl SaveDataSerializer for FlowchartSerializer {
    fn kind_id(&self) -> &str {
        kinds::FLOWCHART
    }

    fn version(&self) -> u32 {
        FLOWCHART_SAVE_VERSION
    }

    fn encode(&self, scene: &Scene, name: &str) -> Result<SaveDataItem, SaveError> {
        let flowchart = scene
            .flowchart(name)
            .ok_or_else(|| SaveError::FlowchartNotFound(name.to_string()))?;

        // JSON has no encoding for these; serde_json would write null
        if let Some(bad) = flowchart
            .variables
            .iter()
            .find(|v| matches!(v.value, VariableValue::Float(f) if !f.is_finite()))
        {
            return Err(SaveError::Format(format!(
                "variable '{}' in '{}' is not a finite float",
                bad.key, name
            )));
        }

        encode_payload(
            kinds::FLOWCHART,
            FLOWCHART_SAVE_VERSION,
            &FlowchartSaveState::from_flowchart(flowchart),
        )
    }

    fn decode(&self, item: &SaveDataItem, scene: &mut Scene) -> Result<(), SaveError> {
        check_version(item, FLOWCHART_SAVE_VERSION)?;
        decode_payload::<FlowchartSaveState>(item)?.apply(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dialogue_scene() -> Scene {
        let mut flowchart = Flowchart::new("Dialogue");
        flowchart.set("metWatson", VariableValue::Boolean(true));
        flowchart.set("clues", VariableValue::Integer(4));
        flowchart.set("suspect", VariableValue::String("Moriarty".to_string()));

        let mut scene = Scene::new("s");
        scene.add_flowchart(flowchart);
        scene
    }

    #[test]
    fn test_variables_restored() {
        let mut scene = dialogue_scene();
        let item = FlowchartSerializer.encode(&scene, "Dialogue").unwrap();

        let flowchart = scene.flowchart_mut("Dialogue").unwrap();
        flowchart.set("clues", VariableValue::Integer(0));
        flowchart.set("metWatson", VariableValue::Boolean(false));
        FlowchartSerializer.decode(&item, &mut scene).unwrap();

        let flowchart = scene.flowchart("Dialogue").unwrap();
        assert_eq!(flowchart.get("clues"), Some(&VariableValue::Integer(4)));
        assert_eq!(flowchart.get("metWatson"), Some(&VariableValue::Boolean(true)));
    }

    #[test]
    fn test_changed_type_and_unknown_keys_skipped() {
        let mut scene = dialogue_scene();
        let saved = FlowchartSaveState {
            flowchart_name: "Dialogue".to_string(),
            variables: vec![
                Variable { key: "clues".to_string(), value: VariableValue::Float(2.5) },
                Variable { key: "removed".to_string(), value: VariableValue::Integer(1) },
            ],
        };

        saved.apply(&mut scene).unwrap();

        let flowchart = scene.flowchart("Dialogue").unwrap();
        assert_eq!(flowchart.get("clues"), Some(&VariableValue::Integer(4)));
        assert_eq!(flowchart.get("removed"), None);
    }

    #[test]
    fn test_missing_flowchart() {
        let mut scene = Scene::new("empty");
        let saved = FlowchartSaveState::from_flowchart(&Flowchart::new("Dialogue"));

        assert!(matches!(saved.apply(&mut scene), Err(SaveError::FlowchartNotFound(_))));
    }

    #[test]
    fn test_non_finite_floats_refuse_to_encode() {
        for value in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let mut scene = dialogue_scene();
            scene.flowchart_mut("Dialogue").unwrap().set("ratio", VariableValue::Float(value));

            assert!(matches!(
                FlowchartSerializer.encode(&scene, "Dialogue"),
                Err(SaveError::Format(_))
            ));
        }
    }

    #[test]
    fn test_finite_float_round_trips() {
        let mut scene = dialogue_scene();
        scene.flowchart_mut("Dialogue").unwrap().set("ratio", VariableValue::Float(0.25));
        let item = FlowchartSerializer.encode(&scene, "Dialogue").unwrap();

        scene.flowchart_mut("Dialogue").unwrap().set("ratio", VariableValue::Float(9.0));
        FlowchartSerializer.decode(&item, &mut scene).unwrap();

        assert_eq!(
            scene.flowchart("Dialogue").unwrap().get("ratio"),
            Some(&VariableValue::Float(0.25))
        );
    }
}
