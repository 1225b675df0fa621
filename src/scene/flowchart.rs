use serde::{Deserialize, Serialize};

/// A typed dialogue variable value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum VariableValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl VariableValue {
    /// True when both values hold the same variant
    pub fn same_type(&self, other: &VariableValue) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub key: String,
    pub value: VariableValue,
}

/// A named bag of dialogue variables
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Flowchart {
    pub name: String,
    pub variables: Vec<Variable>,
}

impl Flowchart {
    pub fn new(name: impl Into<String>) -> Self {
        Flowchart {
            name: name.into(),
            variables: Vec::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&VariableValue> {
        self.variables.iter().find(|v| v.key == key).map(|v| &v.value)
    }

    /// Sets an existing variable or appends a new one
    pub fn set(&mut self, key: impl Into<String>, value: VariableValue) {
        let key = key.into();
        match self.variables.iter_mut().find(|v| v.key == key) {
            Some(existing) => existing.value = value,
            None => self.variables.push(Variable { key, value }),
        }
    }
}
