//! Run mode and persisted settings
//!
//! The host persists two flags, `FullGame` and `Deathrun`, as a small TOML
//! document. Loading is forgiving: a missing or malformed value is `false`,
//! and a document that does not parse at all falls back to individual-level
//! mode.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::Result;

/// The three mutually exclusive run modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    FullGame,
    #[default]
    IndividualLevel,
    Deathrun,
}

impl RunMode {
    pub const ALL: [RunMode; 3] = [RunMode::FullGame, RunMode::IndividualLevel, RunMode::Deathrun];

    pub fn is_full_game(self) -> bool {
        self == RunMode::FullGame
    }

    pub fn is_deathrun(self) -> bool {
        self == RunMode::Deathrun
    }

    /// UI radio indicators in [full game, individual level, deathrun] order.
    /// Exactly one is set.
    pub fn indicators(self) -> [bool; 3] {
        Self::ALL.map(|mode| mode == self)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            RunMode::FullGame => "Full Game",
            RunMode::IndividualLevel => "IL or Section Run",
            RunMode::Deathrun => "Deathrun",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Persisted component settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "FullGame", default)]
    pub full_game: bool,
    #[serde(rename = "Deathrun", default)]
    pub deathrun: bool,
}

impl Settings {
    /// Settings that select the given mode
    pub fn for_mode(mode: RunMode) -> Self {
        Self {
            full_game: mode == RunMode::FullGame,
            deathrun: mode == RunMode::Deathrun,
        }
    }

    /// The active mode. Full game wins if both flags are somehow set.
    pub fn mode(&self) -> RunMode {
        if self.full_game {
            RunMode::FullGame
        } else if self.deathrun {
            RunMode::Deathrun
        } else {
            RunMode::IndividualLevel
        }
    }

    pub fn set_mode(&mut self, mode: RunMode) {
        *self = Self::for_mode(mode);
    }

    /// Serialize to the persisted key/value document
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Load settings, defaulting anything unreadable to `false`
    pub fn from_toml_lenient(document: &str) -> Self {
        let table = match document.parse::<toml::Table>() {
            Ok(table) => table,
            Err(e) => {
                log::warn!("Settings document is malformed, using defaults: {}", e);
                return Self::default();
            }
        };

        let settings = Self {
            full_game: flag(&table, "FullGame"),
            deathrun: flag(&table, "Deathrun"),
        };
        // Normalize so exactly one mode is marked active
        Self::for_mode(settings.mode())
    }

    /// Load settings, surfacing parse errors
    pub fn from_toml_strict(document: &str) -> Result<Self> {
        let settings: Self = toml::from_str(document)?;
        Ok(Self::for_mode(settings.mode()))
    }
}

fn flag(table: &toml::Table, key: &str) -> bool {
    match table.get(key) {
        Some(toml::Value::Boolean(value)) => *value,
        Some(toml::Value::String(value)) => value.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Settings shared between the host's settings UI and the autosplitter
pub type SettingsHandle = Arc<RwLock<Settings>>;

pub fn settings_handle(settings: Settings) -> SettingsHandle {
    Arc::new(RwLock::new(settings))
}
