use std::path::PathBuf;

use crate::game::MoveError;

/// Errors that can occur while storing or loading agents.
#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    #[error("no stored agent state named '{0}'")]
    MissingAgentState(String),

    #[error("invalid agent name '{0}' (use letters, digits, '-' or '_')")]
    InvalidName(String),

    #[error("failed to encode agent state: {0}")]
    StateEncode(serde_json::Error),

    #[error("failed to decode agent state: {0}")]
    StateDecode(serde_json::Error),

    #[error("failed to read metadata from {path}: {source}")]
    MetadataRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse metadata from {path}: {source}")]
    MetadataParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur during training.
#[derive(Debug, thiserror::Error)]
pub enum TrainingError {
    #[error("opponent selected illegal column {column} (legal: {legal:?})")]
    IllegalOpponentMove { column: usize, legal: Vec<usize> },

    #[error("no legal column left for the side to move")]
    NoLegalMoves,

    #[error("move rejected: {0}")]
    Move(#[from] MoveError),

    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
