use std::path::PathBuf;

use crate::game::Move;

/// Errors raised by the board model and the decision engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("illegal move {mv}: target is occupied, full, or off the board")]
    IllegalMove { mv: Move },

    #[error("no legal moves remain on the board")]
    NoLegalMoves,

    #[error("unsupported board size {0} (expected 3..=7)")]
    InvalidBoardSize(usize),

    #[error("invalid board: {0}")]
    InvalidBoard(String),

    #[error("game is already over")]
    GameOver,
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

    #[error("unknown {field} '{value}'")]
    UnknownValue { field: &'static str, value: String },
}
