//! Tomb Raider (1996) autosplitter
//!
//! Supports the DOS release running in DOSBox, TombATI and TombATI's
//! Unfinished Business build. Full-game runs split on each level's stats
//! screen and sum per-level timers into one IGT; individual-level and
//! deathrun sessions time a single level.

mod layout;
mod level;
mod snapshot;
mod splitter;

pub use layout::{AddressLayout, GameVersion};
pub use level::{Level, NUMBER_OF_LEVELS};
pub use snapshot::{Observation, Snapshot, PASSPORT_LOAD_GAME};
pub use splitter::{Splitter, IGT_TICKS_PER_SECOND};

use std::time::Duration;

use crate::config::RunMode;
use crate::games::{BoxedGame, Game, GameFactory, GameProgress};
use crate::memory::ProcessContext;
use crate::{AutosplitterError, Result};

pub const GAME_ID: &str = "tomb-raider-1";

/// Tomb Raider (1996) game implementation
pub struct TombRaider1 {
    version: GameVersion,
    layout: AddressLayout,
    snapshot: Snapshot,
    splitter: Splitter,
    initialized: bool,
}

impl TombRaider1 {
    /// Track the given version with its built-in address layout
    pub fn new(version: GameVersion) -> Self {
        Self::with_layout(version, version.layout())
    }

    /// Track the given version with an overridden address layout
    pub fn with_layout(version: GameVersion, layout: AddressLayout) -> Self {
        Self {
            version,
            layout,
            snapshot: Snapshot::new(),
            splitter: Splitter::new(),
            initialized: false,
        }
    }

    pub fn version(&self) -> GameVersion {
        self.version
    }

    pub fn layout(&self) -> &AddressLayout {
        &self.layout
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn splitter(&self) -> &Splitter {
        &self.splitter
    }
}

impl Game for TombRaider1 {
    fn id(&self) -> &'static str {
        GAME_ID
    }

    fn name(&self) -> &'static str {
        "Tomb Raider (1996)"
    }

    fn version_name(&self) -> &'static str {
        self.version.display_name()
    }

    fn process_names(&self) -> &[&'static str] {
        self.version.process_names()
    }

    fn init_pointers(&mut self, context: &ProcessContext) -> Result<()> {
        self.initialized = false;

        if !context.is_alive() {
            return Err(AutosplitterError::AttachFailed {
                pid: context.process_id,
                reason: "process exited".to_string(),
            });
        }

        let pointers = [
            ("level", &self.layout.level),
            ("level_time", &self.layout.level_time),
            ("stats_screen", &self.layout.stats_screen),
            ("picked_passport_page", &self.layout.picked_passport_page),
        ];
        for (name, pointer) in pointers {
            let address = context
                .resolve(pointer)
                .ok_or(AutosplitterError::PointerResolution(name))?;
            log::debug!("TR1: {} resolved to 0x{:X}", name, address);
        }

        log::info!(
            "TR1: Initialized {} at base 0x{:X} (pid {})",
            self.version,
            context.base_address,
            context.process_id
        );
        self.initialized = true;
        Ok(())
    }

    fn refresh(&mut self, context: &ProcessContext) -> Result<()> {
        if !self.initialized {
            return Err(AutosplitterError::NotInitialized);
        }
        let observation = Observation::read(context, &self.layout)?;
        self.snapshot.apply(observation);
        Ok(())
    }

    fn clear_snapshot(&mut self) {
        self.snapshot.clear();
    }

    fn should_start(&self, mode: RunMode) -> bool {
        self.splitter.should_start(&self.snapshot, mode)
    }

    fn should_split(&mut self, mode: RunMode) -> bool {
        self.splitter.should_split(&self.snapshot, mode)
    }

    fn should_reset(&self) -> bool {
        self.splitter.should_reset(&self.snapshot)
    }

    fn game_time(&mut self, mode: RunMode) -> Option<Duration> {
        self.splitter.game_time(&self.snapshot, mode)
    }

    fn is_game_time_paused(&self) -> bool {
        self.splitter.is_game_time_paused()
    }

    fn reset_values(&mut self) {
        self.splitter.reset_values();
    }

    fn on_undo_split(&mut self) {
        self.splitter.undo_split();
    }

    fn progress(&self) -> GameProgress {
        if !self.snapshot.is_primed() {
            return GameProgress::default();
        }
        GameProgress {
            current_level: self.snapshot.current_level().map(|level| level.name().to_string()),
            farthest_level: Some(self.splitter.farthest_level().name().to_string()),
            level_ticks: self.snapshot.level_time.current,
        }
    }
}

/// Factory for Tomb Raider (1996)
pub struct TombRaider1Factory;

impl GameFactory for TombRaider1Factory {
    fn game_id(&self) -> &'static str {
        GAME_ID
    }

    fn create(&self, version: &str) -> Result<BoxedGame> {
        let version: GameVersion = version.parse()?;
        Ok(Box::new(TombRaider1::new(version)))
    }
}
