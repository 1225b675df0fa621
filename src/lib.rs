//! savepoint - state capture and restore for narrative scenes
//!
//! Core modules:
//! - `save`: versioned save container, serializer registry, capture/restore passes, file slots
//! - `scene`: live stages, character portraits and dialogue variables
//! - `snapshot`: comparable snapshot values for each entity kind, and their serializers
//! - `config`: save system settings

pub mod config;
pub mod save;
pub mod scene;
pub mod snapshot;

pub use config::SaveConfig;
pub use save::{SaveData, SaveError, SaveManager, SaveOrchestrator, SerializerRegistry};
pub use scene::Scene;
