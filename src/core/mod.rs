//! Core autosplitter abstractions
//!
//! This module contains the host-facing types:
//! - `Autosplitter` - Runner that owns the attach lifecycle and ticks a game
//! - `Decisions` - What the host timer should do this tick
//! - `TimerEvent` / `SplitterAction` - Events in and out of the runner
//! - `AutosplitterState` - Serializable status of the runner

mod state;
mod runner;
mod events;

pub use state::AutosplitterState;
pub use runner::{Autosplitter, Decisions};
pub use events::{ActionCallback, EventHandler, ListenerId, SplitterAction, TimerEvent};
