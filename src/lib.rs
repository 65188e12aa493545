//! Tomb Raider Classic Autosplitter
//!
//! A memory-reading autosplitter for Tomb Raider (1996), running in DOSBox
//! or as TombATI. Each tick the runner reads the game's level, level timer,
//! stats-screen flag and passport page, then tells the host timer whether to
//! start, split or reset, and what the in-game time is.
//!
//! ```no_run
//! use tr_classic_autosplitter::{settings_handle, Autosplitter, GameRegistry, Settings};
//!
//! let mut registry = GameRegistry::new();
//! registry.register_builtin();
//!
//! let settings = settings_handle(Settings::default());
//! let mut autosplitter =
//!     Autosplitter::from_registry(&registry, "tomb-raider-1", "ati", settings)?;
//! if let Some(decisions) = autosplitter.tick() {
//!     println!("{:?}", decisions);
//! }
//! # Ok::<(), tr_classic_autosplitter::AutosplitterError>(())
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod games;
pub mod memory;

// Re-export commonly used types
pub use crate::config::{settings_handle, RunMode, Settings, SettingsHandle};
pub use crate::core::{
    Autosplitter, AutosplitterState, Decisions, ListenerId, SplitterAction, TimerEvent,
};
pub use crate::error::{AutosplitterError, Result};
pub use crate::games::tomb_raider_1::{GameVersion, Level, TombRaider1};
pub use crate::games::{BoxedGame, Game, GameRegistry};
pub use crate::memory::{ProcessContext, ProcessFinder, SystemProcessFinder};
