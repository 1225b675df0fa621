//! Save system configuration
//!
//! Loaded from a JSON file; any field left out takes its default.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::save::SaveError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveConfig {
    /// Where slot and autosave files are written
    pub save_directory: PathBuf,
    /// Number of manual slots (slots are numbered from 1)
    pub slot_count: u8,
    pub autosave_interval_secs: u64,
    /// Autosave files kept by `cleanup_autosaves`
    pub autosaves_to_keep: usize,
    /// Write indented JSON (readable/debuggable) instead of compact
    pub pretty_json: bool,
    /// How long to wait for fades to settle before capturing
    pub settle_timeout_secs: f32,
}

impl SaveConfig {
    pub fn load_from_file(path: &str) -> Result<Self, SaveError> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| SaveError::Format(format!("config '{}': {}", path, e)))
    }

    /// `~/.savepoint/saves`, or `./saves` without a home directory
    pub fn default_save_directory() -> PathBuf {
        dirs::home_dir()
            .map(|p| p.join(".savepoint/saves"))
            .unwrap_or_else(|| PathBuf::from("./saves"))
    }
}

impl Default for SaveConfig {
    fn default() -> Self {
        SaveConfig {
            save_directory: Self::default_save_directory(),
            slot_count: 5,
            autosave_interval_secs: 300, // 5 minutes
            autosaves_to_keep: 3,
            pretty_json: true,
            settle_timeout_secs: 2.0,
        }
    }
}
