use std::collections::HashMap;

use super::error::SaveError;
use super::saveable::{FnSerializer, SaveDataSerializer};
use crate::scene::Scene;
use crate::snapshot::{FlowchartSerializer, PortraitSerializer, StageSerializer};

/// Central registry of serializers, keyed by kind id
///
/// Built once at startup and then only read. Capture and restore both look
/// up serializers here; nothing registers during a save or load pass.
pub struct SerializerRegistry {
    serializers: HashMap<String, Box<dyn SaveDataSerializer>>,
}

impl SerializerRegistry {
    /// Creates a new empty registry
    pub fn new() -> Self {
        SerializerRegistry {
            serializers: HashMap::new(),
        }
    }

    /// Creates a registry with the built-in portrait, stage and flowchart serializers
    pub fn with_builtins() -> Result<Self, SaveError> {
        let mut registry = Self::new();
        registry.register_base_serializers()?;
        Ok(registry)
    }

    /// Registers a serializer under its own kind id
    ///
    /// Returns error if the kind is already taken; the first registration stays.
    pub fn register(&mut self, serializer: Box<dyn SaveDataSerializer>) -> Result<(), SaveError> {
        let kind_id = serializer.kind_id().to_string();
        if self.serializers.contains_key(&kind_id) {
            return Err(SaveError::DuplicateKind(kind_id));
        }

        log::debug!("Registered serializer '{}' (v{})", kind_id, serializer.version());
        self.serializers.insert(kind_id, serializer);
        Ok(())
    }

    /// Registers a kind from an encode/decode closure pair
    pub fn register_fns<E, D>(
        &mut self,
        kind_id: impl Into<String>,
        version: u32,
        encode: E,
        decode: D,
    ) -> Result<(), SaveError>
    where
        E: Fn(&Scene, &str) -> Result<String, SaveError> + 'static,
        D: Fn(u32, &str, &mut Scene) -> Result<(), SaveError> + 'static,
    {
        self.register(Box::new(FnSerializer::new(kind_id, version, encode, decode)))
    }

    /// Gets the serializer for a kind
    pub fn resolve(&self, kind_id: &str) -> Result<&dyn SaveDataSerializer, SaveError> {
        self.serializers
            .get(kind_id)
            .map(|s| &**s)
            .ok_or_else(|| SaveError::UnknownKind(kind_id.to_string()))
    }

    pub fn contains(&self, kind_id: &str) -> bool {
        self.serializers.contains_key(kind_id)
    }

    /// Returns all registered kind ids, sorted
    pub fn kind_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.serializers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.serializers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.serializers.is_empty()
    }

    fn register_base_serializers(&mut self) -> Result<(), SaveError> {
        self.register(Box::new(StageSerializer))?;
        self.register(Box::new(FlowchartSerializer))?;
        self.register(Box::new(PortraitSerializer))?;
        Ok(())
    }
}

impl Default for SerializerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
