//! Save/Load system
//!
//! This module provides the versioned save container and the machinery
//! around it:
//! - JSON-based save records (human-readable, debuggable)
//! - Per-kind serializers, each versioning its own payload
//! - A registry built once at startup and passed to every pass
//! - Capture/restore passes with per-item error reporting
//! - File slots and rotating autosaves
//!
//! # Architecture
//!
//! - `types`: `SaveData`, `SaveDataItem`, `StringPair`
//! - `error`: `SaveError` and `ItemError`
//! - `saveable`: `SaveDataSerializer` trait for entity kinds
//! - `registry`: `SerializerRegistry`
//! - `orchestrator`: `SaveOrchestrator` capture/restore passes
//! - `manager`: `SaveManager` for file operations
//!
//! # Example Usage
//!
//! ```ignore
//! let registry = SerializerRegistry::with_builtins()?;
//! let orchestrator = SaveOrchestrator::new(&registry);
//!
//! // Save point
//! let save_data = orchestrator.capture_scene("chapter_one", &scene)?;
//! save_manager.save_to_slot(1, &save_data)?;
//!
//! // Load
//! let loaded = save_manager.load_from_slot(1)?;
//! for failure in orchestrator.restore_all(&loaded, &mut scene) {
//!     log::warn!("{}", failure);
//! }
//! ```

pub mod error;
pub mod manager;
pub mod orchestrator;
pub mod registry;
pub mod saveable;
pub mod types;

// Re-export commonly used types
pub use error::{ItemError, SaveError};
pub use manager::{SaveFileInfo, SaveManager};
pub use orchestrator::{CancelToken, RestoreReport, SaveOrchestrator, SettleWait, WaitStatus};
pub use registry::SerializerRegistry;
pub use saveable::{FnSerializer, SaveDataSerializer, check_version, decode_payload, encode_payload};
pub use types::*;
