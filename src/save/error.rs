use thiserror::Error;

/// Error types for save/load operations
///
/// Item-level variants (`UnknownKind` during restore, `StageNotFound`,
/// `CharacterNotFound`, ...) are recoverable: the orchestrator records them
/// and moves on to the next item. Container-level failures abort the pass.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Persisted data that cannot be parsed (container, payload or timestamp)
    #[error("Malformed save data: {0}")]
    Format(String),

    #[error("No serializer registered for kind '{0}'")]
    UnknownKind(String),

    #[error("Serializer for kind '{0}' already registered")]
    DuplicateKind(String),

    #[error("Unsupported {kind} version {found} (supported up to {supported})")]
    UnsupportedVersion {
        kind: String,
        found: u32,
        supported: u32,
    },

    #[error("Stage not found: {0}")]
    StageNotFound(String),

    #[error("Character not found: {0}")]
    CharacterNotFound(String),

    #[error("Position '{position}' not found on stage '{stage}'")]
    PositionNotFound { stage: String, position: String },

    #[error("Flowchart not found: {0}")]
    FlowchartNotFound(String),

    #[error("Character '{0}' is not on a stage")]
    NotOnStage(String),

    #[error("No save found in slot {0}")]
    SlotNotFound(u8),
}

/// A restore failure tied to the item that caused it
#[derive(Debug, Error)]
#[error("item {index} ({kind_id}): {source}")]
pub struct ItemError {
    pub index: usize,
    pub kind_id: String,
    #[source]
    pub source: SaveError,
}
