//! Autosplitter state types

use serde::{Deserialize, Serialize};

use crate::config::RunMode;
use crate::Result;

/// Current state of the autosplitter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AutosplitterState {
    /// ID of the game being tracked (e.g., "tomb-raider-1")
    pub game_id: String,
    /// Version being tracked
    pub version: String,
    /// Whether a game process is currently attached
    pub process_attached: bool,
    /// Process ID if attached
    pub process_id: Option<u32>,
    /// Active run mode
    pub mode: RunMode,
    /// Current level name, if known
    pub current_level: Option<String>,
    /// Farthest level reached this run
    pub farthest_level: Option<String>,
    /// Raw level timer of the current level
    pub level_ticks: u32,
}

impl AutosplitterState {
    /// Create a new default state
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
