//! Game trait and implementations
//!
//! This module defines the `Game` trait that all game implementations must satisfy,
//! along with the `GameRegistry` for managing and discovering games.

mod registry;

// Game implementations
pub mod tomb_raider_1;

pub use registry::{GameFactory, GameRegistry};

// Re-export game factories
pub use tomb_raider_1::TombRaider1Factory;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::RunMode;
use crate::memory::ProcessContext;
use crate::Result;

/// Where the runner currently is, for status display
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameProgress {
    /// Display name of the current level, if the value is known
    pub current_level: Option<String>,
    /// Display name of the farthest level reached this run
    pub farthest_level: Option<String>,
    /// Raw level timer of the current level
    pub level_ticks: u32,
}

/// Trait that all game implementations must satisfy
///
/// The runner drives one instance per session: `init_pointers` on attach,
/// `refresh` once per tick, then the decision queries in the order start,
/// split, reset, paused, game time. Decision queries never fail; anything
/// unreadable answers "no".
pub trait Game: Send + Sync {
    /// Unique identifier for this game (e.g., "tomb-raider-1")
    fn id(&self) -> &'static str;

    /// Human-readable game name
    fn name(&self) -> &'static str;

    /// Human-readable name of the version being tracked
    fn version_name(&self) -> &'static str;

    /// Process names to search for
    fn process_names(&self) -> &[&'static str];

    /// Initialize pointers after attaching to process
    fn init_pointers(&mut self, context: &ProcessContext) -> Result<()>;

    /// Read a fresh snapshot from the attached process.
    ///
    /// On error the previous snapshot must be left untouched.
    fn refresh(&mut self, context: &ProcessContext) -> Result<()>;

    /// Drop the snapshot so the next refresh starts without history
    fn clear_snapshot(&mut self);

    /// Whether the timer should start
    fn should_start(&self, mode: RunMode) -> bool;

    /// Whether the timer should split; may advance per-run progress
    fn should_split(&mut self, mode: RunMode) -> bool;

    /// Whether the timer should reset
    fn should_reset(&self) -> bool;

    /// Current in-game time, if there is one
    fn game_time(&mut self, mode: RunMode) -> Option<Duration>;

    /// Whether game time is paused
    fn is_game_time_paused(&self) -> bool {
        false
    }

    /// Clear per-run progress
    fn reset_values(&mut self);

    /// The host timer started
    fn on_start(&mut self) {
        self.reset_values();
    }

    /// The host timer split (whether or not we asked for it)
    fn on_split(&mut self) {}

    /// The host undid its last split
    fn on_undo_split(&mut self) {}

    /// Snapshot of run progress for status display
    fn progress(&self) -> GameProgress {
        GameProgress::default()
    }
}

/// Boxed game that can be stored and passed around
pub type BoxedGame = Box<dyn Game>;
