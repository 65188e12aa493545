//! Error types for the autosplitter

use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, AutosplitterError>;

/// Errors raised while attaching to, reading from, or configuring a game.
///
/// None of these ever reach the host as a fault: the runner turns them into
/// "no valid snapshot this tick".
#[derive(Debug, Error)]
pub enum AutosplitterError {
    #[error("failed to attach to process {pid}: {reason}")]
    AttachFailed { pid: u32, reason: String },

    #[error("pointer for '{0}' did not resolve")]
    PointerResolution(&'static str),

    #[error("failed to read '{name}' at 0x{address:X}")]
    ReadFailed { name: &'static str, address: usize },

    #[error("game is not initialized")]
    NotInitialized,

    #[error("unsupported game version: {0}")]
    UnsupportedVersion(String),

    #[error("unknown game: {0}")]
    GameNotFound(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to write configuration: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("failed to serialize state: {0}")]
    Serialization(#[from] serde_json::Error),
}
