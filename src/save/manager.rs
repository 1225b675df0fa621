//! Save manager for handling save/load operations
//!
//! This module provides the SaveManager struct which handles:
//! - Writing save data to slot files
//! - Loading save data from slot files
//! - Autosave timing and rotation
//! - Save file management (listing, deleting)

use chrono::{DateTime, FixedOffset};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::error::SaveError;
use super::types::SaveData;
use crate::config::SaveConfig;

const AUTOSAVE_PREFIX: &str = "autosave_";

pub struct SaveManager {
    save_directory: PathBuf,
    slot_count: u8,
    pretty_json: bool,
    autosave_interval: Duration,
    autosaves_to_keep: usize,
    last_autosave: Option<Instant>,
}

/// Summary of one save file on disk
#[derive(Debug, Clone)]
pub struct SaveFileInfo {
    pub filename: String,
    pub save_name: String,
    pub last_written: Option<DateTime<FixedOffset>>,
}

impl SaveManager {
    /// Creates a new SaveManager with default settings for `save_directory`
    ///
    /// The save directory will be created if it doesn't exist.
    pub fn new(save_directory: impl AsRef<Path>) -> Result<Self, SaveError> {
        let config = SaveConfig {
            save_directory: save_directory.as_ref().to_path_buf(),
            ..SaveConfig::default()
        };
        Self::from_config(&config)
    }

    pub fn from_config(config: &SaveConfig) -> Result<Self, SaveError> {
        if !config.save_directory.exists() {
            fs::create_dir_all(&config.save_directory)?;
        }

        Ok(SaveManager {
            save_directory: config.save_directory.clone(),
            slot_count: config.slot_count.max(1),
            pretty_json: config.pretty_json,
            autosave_interval: Duration::from_secs(config.autosave_interval_secs),
            autosaves_to_keep: config.autosaves_to_keep,
            last_autosave: None,
        })
    }

    pub fn save_directory(&self) -> &Path {
        &self.save_directory
    }

    /// Writes `save_data` to a slot, replacing what was there
    pub fn save_to_slot(&self, slot: u8, save_data: &SaveData) -> Result<PathBuf, SaveError> {
        let filepath = self.slot_path(slot);
        self.write_file(&filepath, save_data)?;
        log::info!("Saved '{}' to {}", save_data.save_name(), filepath.display());
        Ok(filepath)
    }

    pub fn load_from_slot(&self, slot: u8) -> Result<SaveData, SaveError> {
        let slot = self.clamp_slot(slot);
        let filepath = self.slot_path(slot);
        if !filepath.exists() {
            return Err(SaveError::SlotNotFound(slot));
        }
        Self::read_file(&filepath)
    }

    pub fn slot_exists(&self, slot: u8) -> bool {
        self.slot_path(slot).exists()
    }

    pub fn delete_slot(&self, slot: u8) -> Result<(), SaveError> {
        let slot = self.clamp_slot(slot);
        let filepath = self.slot_path(slot);
        if !filepath.exists() {
            return Err(SaveError::SlotNotFound(slot));
        }
        fs::remove_file(filepath)?;
        Ok(())
    }

    /// Check if autosave is needed
    pub fn should_autosave(&self) -> bool {
        match self.last_autosave {
            Some(last) => last.elapsed() >= self.autosave_interval,
            None => true, // Save if we've never autosaved
        }
    }

    /// Writes a timestamped autosave and prunes old ones
    pub fn autosave(&mut self, save_data: &SaveData) -> Result<PathBuf, SaveError> {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S%3f").to_string();
        let filepath = self.unused_autosave_path(&timestamp);

        self.write_file(&filepath, save_data)?;
        self.last_autosave = Some(Instant::now());
        log::info!("Autosaved '{}' to {}", save_data.save_name(), filepath.display());

        self.cleanup_autosaves()?;
        Ok(filepath)
    }

    /// Delete old autosaves, keeping only the most recent ones
    pub fn cleanup_autosaves(&self) -> Result<usize, SaveError> {
        let mut autosaves: Vec<PathBuf> = fs::read_dir(&self.save_directory)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|f| f.to_str())
                    .map(|s| s.starts_with(AUTOSAVE_PREFIX))
                    .unwrap_or(false)
            })
            .collect();

        // Timestamped names sort chronologically; newest first
        autosaves.sort_by(|a, b| b.cmp(a));

        let mut removed = 0;
        for path in autosaves.iter().skip(self.autosaves_to_keep) {
            fs::remove_file(path)?;
            removed += 1;
        }
        if removed > 0 {
            log::debug!("Removed {} old autosaves", removed);
        }
        Ok(removed)
    }

    /// List all save files, newest first
    ///
    /// Files that fail to parse are skipped.
    pub fn list_saves(&self) -> Result<Vec<SaveFileInfo>, SaveError> {
        let mut saves = Vec::new();

        for entry in fs::read_dir(&self.save_directory)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let Some(filename) = path.file_name().and_then(|f| f.to_str()) else {
                continue;
            };

            match Self::read_file(&path) {
                Ok(save_data) => saves.push(SaveFileInfo {
                    filename: filename.to_string(),
                    save_name: save_data.save_name().to_string(),
                    last_written: save_data.last_written().ok(),
                }),
                Err(e) => log::warn!("Skipping unreadable save {}: {}", filename, e),
            }
        }

        saves.sort_by(|a, b| b.last_written.cmp(&a.last_written));
        Ok(saves)
    }

    /// `autosave_<stamp>.json`, or `autosave_<stamp>_<n>.json` if that is taken
    fn unused_autosave_path(&self, stamp: &str) -> PathBuf {
        let mut filepath = self
            .save_directory
            .join(format!("{}{}.json", AUTOSAVE_PREFIX, stamp));
        let mut suffix = 1;
        while filepath.exists() {
            filepath = self
                .save_directory
                .join(format!("{}{}_{}.json", AUTOSAVE_PREFIX, stamp, suffix));
            suffix += 1;
        }
        filepath
    }

    fn clamp_slot(&self, slot: u8) -> u8 {
        slot.clamp(1, self.slot_count)
    }

    fn slot_path(&self, slot: u8) -> PathBuf {
        self.save_directory
            .join(format!("slot_{}.json", self.clamp_slot(slot)))
    }

    fn write_file(&self, path: &Path, save_data: &SaveData) -> Result<(), SaveError> {
        fs::write(path, save_data.to_json(self.pretty_json)?)?;
        Ok(())
    }

    fn read_file(path: &Path) -> Result<SaveData, SaveError> {
        let json = fs::read_to_string(path)?;
        SaveData::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::{SaveDataItem, StringPair};

    fn sample(name: &str) -> SaveData {
        let mut save = SaveData::with_pairs(name, vec![StringPair::new("chapter", "1")]);
        save.push_item(SaveDataItem::new("stage", 1, r#"{"stageName":"Main"}"#));
        save
    }

    #[test]
    fn test_save_and_load_slot() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SaveManager::new(dir.path()).unwrap();
        let save = sample("first");

        let path = manager.save_to_slot(2, &save).unwrap();
        assert!(path.ends_with("slot_2.json"));
        assert!(manager.slot_exists(2));
        assert_eq!(manager.load_from_slot(2).unwrap(), save);
    }

    #[test]
    fn test_slots_are_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SaveManager::new(dir.path()).unwrap();

        let path = manager.save_to_slot(9, &sample("high")).unwrap();
        assert!(path.ends_with("slot_5.json"));
        assert!(manager.slot_exists(5));
    }

    #[test]
    fn test_load_missing_slot() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SaveManager::new(dir.path()).unwrap();

        assert!(matches!(manager.load_from_slot(3), Err(SaveError::SlotNotFound(3))));
        assert!(matches!(manager.delete_slot(3), Err(SaveError::SlotNotFound(3))));
    }

    #[test]
    fn test_delete_slot() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SaveManager::new(dir.path()).unwrap();
        manager.save_to_slot(1, &sample("doomed")).unwrap();

        manager.delete_slot(1).unwrap();
        assert!(!manager.slot_exists(1));
    }

    #[test]
    fn test_corrupt_slot_is_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SaveManager::new(dir.path()).unwrap();
        fs::write(dir.path().join("slot_1.json"), "{ broken").unwrap();

        assert!(matches!(manager.load_from_slot(1), Err(SaveError::Format(_))));
    }

    #[test]
    fn test_list_saves_newest_first_and_skips_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SaveManager::new(dir.path()).unwrap();
        let old = SaveData::from_json(
            r#"{"version":1,"saveName":"old","saveDataItems":[],"stringPairs":[],"lastWrittenDateTimeString":"2020-01-01T00:00:00+00:00"}"#,
        )
        .unwrap();
        manager.save_to_slot(1, &old).unwrap();
        manager.save_to_slot(2, &sample("new")).unwrap();
        fs::write(dir.path().join("slot_3.json"), "nope").unwrap();

        let saves = manager.list_saves().unwrap();
        let names: Vec<&str> = saves.iter().map(|s| s.save_name.as_str()).collect();
        assert_eq!(names, vec!["new", "old"]);
    }

    #[test]
    fn test_autosave_name_collision_gets_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SaveManager::new(dir.path()).unwrap();
        let stamp = "20240101_000000000";

        let first = manager.unused_autosave_path(stamp);
        fs::write(&first, "{}").unwrap();
        let second = manager.unused_autosave_path(stamp);
        fs::write(&second, "{}").unwrap();
        let third = manager.unused_autosave_path(stamp);

        assert!(first.ends_with("autosave_20240101_000000000.json"));
        assert!(second.ends_with("autosave_20240101_000000000_1.json"));
        assert!(third.ends_with("autosave_20240101_000000000_2.json"));
    }

    #[test]
    fn test_autosave_rotation() {
        let dir = tempfile::tempdir().unwrap();
        let config = SaveConfig {
            save_directory: dir.path().to_path_buf(),
            autosaves_to_keep: 2,
            ..SaveConfig::default()
        };
        let mut manager = SaveManager::from_config(&config).unwrap();
        for day in 1..=3 {
            fs::write(
                dir.path().join(format!("autosave_2024010{}_000000000.json", day)),
                sample("older").to_json(false).unwrap(),
            )
            .unwrap();
        }
        assert!(manager.should_autosave());

        manager.autosave(&sample("latest")).unwrap();

        let mut remaining: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        remaining.sort();
        assert_eq!(remaining.len(), 2);
        assert_eq!(remaining[0], "autosave_20240103_000000000.json");
        assert!(!manager.should_autosave());
    }
}
