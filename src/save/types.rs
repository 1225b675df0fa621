//! Save data types
//!
//! This module defines the versioned container written at a save point.
//! Every entity's state is stored as an opaque string inside a
//! [`SaveDataItem`]; the serializers in `snapshot` decide what goes in it.
//! It uses Serde for serialization/deserialization to JSON format.

use chrono::{DateTime, FixedOffset, Local, SecondsFormat};
use serde::{Deserialize, Serialize};

use super::error::SaveError;

/// Current container format version
pub const CURRENT_SAVE_DATA_VERSION: u32 = 1;

/// Item version assumed for items written before items carried a version
pub const LEGACY_ITEM_VERSION: u32 = 1;

fn legacy_item_version() -> u32 {
    LEGACY_ITEM_VERSION
}

fn timestamp_now() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// A key/value string pair stored alongside the items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringPair {
    pub key: String,
    #[serde(rename = "val")]
    pub value: String,
}

impl StringPair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        StringPair {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// One entity's encoded state (polymorphic through `kind_id`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveDataItem {
    /// Which serializer wrote this item ("portrait", "stage", ...)
    #[serde(rename = "dataType")]
    pub kind_id: String,

    /// Format version of `payload`, owned by the serializer for `kind_id`
    #[serde(default = "legacy_item_version")]
    pub version: u32,

    /// Serializer-defined encoding of the entity's state
    #[serde(rename = "data")]
    pub payload: String,
}

impl SaveDataItem {
    pub fn new(kind_id: impl Into<String>, version: u32, payload: impl Into<String>) -> Self {
        SaveDataItem {
            kind_id: kind_id.into(),
            version,
            payload: payload.into(),
        }
    }
}

/// The root save record
///
/// `version` is fixed when the value is created (or read back) and has no
/// setter. `written_at` is stamped at construction; call [`SaveData::touch`]
/// to re-stamp it on an explicit re-save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveData {
    version: u32,
    #[serde(rename = "saveName")]
    save_name: String,
    #[serde(rename = "saveDataItems")]
    items: Vec<SaveDataItem>,
    #[serde(rename = "stringPairs")]
    string_pairs: Vec<StringPair>,
    #[serde(rename = "lastWrittenDateTimeString")]
    written_at: String,
}

impl SaveData {
    /// Creates an empty save with no string pairs
    pub fn new(save_name: impl Into<String>) -> Self {
        Self::with_pairs(save_name, Vec::new())
    }

    /// Creates an empty save, copying `pairs` into the string store
    pub fn with_pairs(
        save_name: impl Into<String>,
        pairs: impl IntoIterator<Item = StringPair>,
    ) -> Self {
        SaveData {
            version: CURRENT_SAVE_DATA_VERSION,
            save_name: save_name.into(),
            items: Vec::new(),
            string_pairs: pairs.into_iter().collect(),
            written_at: timestamp_now(),
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn save_name(&self) -> &str {
        &self.save_name
    }

    pub fn items(&self) -> &[SaveDataItem] {
        &self.items
    }

    pub fn string_pairs(&self) -> &[StringPair] {
        &self.string_pairs
    }

    /// The raw timestamp string as stored
    pub fn written_at(&self) -> &str {
        &self.written_at
    }

    pub fn push_item(&mut self, item: SaveDataItem) {
        self.items.push(item);
    }

    pub fn push_string_pair(&mut self, pair: StringPair) {
        self.string_pairs.push(pair);
    }

    /// Returns the value of the first pair whose key matches
    ///
    /// An absent key and a key stored with an empty value both give `""`.
    pub fn get_string_pair_value(&self, key: &str) -> &str {
        self.string_pairs
            .iter()
            .find(|pair| pair.key == key)
            .map(|pair| pair.value.as_str())
            .unwrap_or("")
    }

    /// Parses the stored timestamp
    pub fn last_written(&self) -> Result<DateTime<FixedOffset>, SaveError> {
        DateTime::parse_from_rfc3339(&self.written_at).map_err(|e| {
            SaveError::Format(format!("timestamp '{}': {}", self.written_at, e))
        })
    }

    /// Re-stamps the write time with the current local time
    pub fn touch(&mut self) {
        self.written_at = timestamp_now();
    }

    /// Serialize to the persisted JSON record
    pub fn to_json(&self, pretty: bool) -> Result<String, SaveError> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Parse a persisted JSON record
    ///
    /// Containers written by a newer format version are rejected; older
    /// ones are accepted as-is and their items are left to the serializers.
    pub fn from_json(json: &str) -> Result<Self, SaveError> {
        let save_data: SaveData = serde_json::from_str(json)
            .map_err(|e| SaveError::Format(format!("save container: {}", e)))?;

        if save_data.version > CURRENT_SAVE_DATA_VERSION {
            return Err(SaveError::UnsupportedVersion {
                kind: "save data".to_string(),
                found: save_data.version,
                supported: CURRENT_SAVE_DATA_VERSION,
            });
        }

        Ok(save_data)
    }
}
