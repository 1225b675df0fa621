//! Serializer capability for entity kinds that can be saved/loaded
//!
//! Each entity kind gets one [`SaveDataSerializer`]. It turns a live entity
//! into a [`SaveDataItem`] at a save point and applies an item back onto the
//! live scene at load time. The save system never looks inside a payload.

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::SaveError;
use super::types::SaveDataItem;
use crate::scene::Scene;

/// Encodes and decodes one entity kind
///
/// # Versioning
///
/// `version()` is the payload format this serializer writes. `decode` sees
/// the version the item was written with and must either read older layouts
/// or fail with [`SaveError::UnsupportedVersion`].
pub trait SaveDataSerializer {
    /// Kind id written into every item this serializer produces
    fn kind_id(&self) -> &str;

    /// Current payload format version
    fn version(&self) -> u32;

    /// Capture the named entity's state
    fn encode(&self, scene: &Scene, name: &str) -> Result<SaveDataItem, SaveError>;

    /// Apply an item's state to the matching live entity
    fn decode(&self, item: &SaveDataItem, scene: &mut Scene) -> Result<(), SaveError>;
}

/// Builds an item by serializing `state` to JSON
pub fn encode_payload<T: Serialize>(
    kind_id: &str,
    version: u32,
    state: &T,
) -> Result<SaveDataItem, SaveError> {
    Ok(SaveDataItem::new(kind_id, version, serde_json::to_string(state)?))
}

/// Parses an item's JSON payload
///
/// Parse failures are reported as [`SaveError::Format`] so they stay
/// item-level errors during restore.
pub fn decode_payload<T: DeserializeOwned>(item: &SaveDataItem) -> Result<T, SaveError> {
    serde_json::from_str(&item.payload)
        .map_err(|e| SaveError::Format(format!("{} payload: {}", item.kind_id, e)))
}

/// Fails unless `item.version` is between 1 and `supported`
pub fn check_version(item: &SaveDataItem, supported: u32) -> Result<(), SaveError> {
    if item.version == 0 || item.version > supported {
        return Err(SaveError::UnsupportedVersion {
            kind: item.kind_id.clone(),
            found: item.version,
            supported,
        });
    }
    Ok(())
}

type EncodeFn = dyn Fn(&Scene, &str) -> Result<String, SaveError>;
type DecodeFn = dyn Fn(u32, &str, &mut Scene) -> Result<(), SaveError>;

/// A serializer assembled from a pair of closures
///
/// The encode closure returns the payload; the decode closure receives the
/// item version and payload. Items newer than `version` are rejected before
/// the decode closure runs.
pub struct FnSerializer {
    kind_id: String,
    version: u32,
    encode: Box<EncodeFn>,
    decode: Box<DecodeFn>,
}

impl FnSerializer {
    pub fn new<E, D>(kind_id: impl Into<String>, version: u32, encode: E, decode: D) -> Self
    where
        E: Fn(&Scene, &str) -> Result<String, SaveError> + 'static,
        D: Fn(u32, &str, &mut Scene) -> Result<(), SaveError> + 'static,
    {
        FnSerializer {
            kind_id: kind_id.into(),
            version,
            encode: Box::new(encode),
            decode: Box::new(decode),
        }
    }
}

impl SaveDataSerializer for FnSerializer {
    fn kind_id(&self) -> &str {
        &self.kind_id
    }

    fn version(&self) -> u32 {
        self.version
    }

    fn encode(&self, scene: &Scene, name: &str) -> Result<SaveDataItem, SaveError> {
        let payload = (self.encode)(scene, name)?;
        Ok(SaveDataItem::new(self.kind_id.clone(), self.version, payload))
    }

    fn decode(&self, item: &SaveDataItem, scene: &mut Scene) -> Result<(), SaveError> {
        check_version(item, self.version)?;
        (self.decode)(item.version, &item.payload, scene)
    }
}
