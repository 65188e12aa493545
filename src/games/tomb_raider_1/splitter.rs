//! Start/split/reset/IGT decisions for Tomb Raider (1996)

use std::time::Duration;

use crate::config::RunMode;

use super::level::{Level, NUMBER_OF_LEVELS};
use super::snapshot::{Snapshot, PASSPORT_LOAD_GAME};

/// IGT ticks per second
pub const IGT_TICKS_PER_SECOND: u32 = 30;

/// Levels whose surrounding cutscenes/FMVs make the stats screen unreliable
const NO_STATS_SPLIT: [Level; 4] = [
    Level::Qualopec,
    Level::Tihocan,
    Level::Atlantis,
    Level::MinesToAtlantis,
];

/// Decision engine plus the per-run accumulators it owns
#[derive(Debug, Clone)]
pub struct Splitter {
    /// Farthest level reached in the current full-game attempt
    farthest_level: Level,
    /// Final tick counts for Caves..=The Great Pyramid
    level_times: [u32; NUMBER_OF_LEVELS],
}

impl Default for Splitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Splitter {
    pub fn new() -> Self {
        Self {
            farthest_level: Level::FIRST,
            level_times: [0; NUMBER_OF_LEVELS],
        }
    }

    pub fn farthest_level(&self) -> Level {
        self.farthest_level
    }

    /// Determines the IGT.
    ///
    /// In full game every level's latest tick count is recorded and summed up
    /// to the current level. Time is reported in whole seconds, as on the
    /// in-game stats screen.
    pub fn game_time(&mut self, snapshot: &Snapshot, mode: RunMode) -> Option<Duration> {
        let level_time = snapshot.level_time.current;
        let last_real_level = snapshot.current_level()?.last_real_level()?;

        if mode.is_full_game() {
            // Lara's Home is not part of a full-game run
            let index = (last_real_level.id() as usize).checked_sub(1)?;
            self.level_times[index] = level_time;

            let total: u64 = self.level_times[..=index].iter().map(|&t| u64::from(t)).sum();
            return Some(Duration::from_secs(total / u64::from(IGT_TICKS_PER_SECOND)));
        }

        Some(Duration::from_secs(u64::from(level_time / IGT_TICKS_PER_SECOND)))
    }

    /// The level timer itself stops while the game is paused
    pub fn is_game_time_paused(&self) -> bool {
        false
    }

    /// Determines if the timer should split.
    ///
    /// Advances the farthest level when a full-game split fires.
    pub fn should_split(&mut self, snapshot: &Snapshot, mode: RunMode) -> bool {
        let Some(current_level) = snapshot.current_level() else {
            return false;
        };

        // IL/section runs: a level whose play ends in a cutscene never shows
        // its stats screen in time
        if !mode.is_full_game() {
            if let Some(old_level) = snapshot.old_level() {
                if old_level.is_real() && !current_level.is_real() {
                    return true;
                }
            }
        }

        if NO_STATS_SPLIT.contains(&current_level) {
            return false;
        }

        if snapshot.stats_screen_active.rising_edge() && self.farthest_level < current_level {
            if let Some(next) = self.farthest_level.next() {
                self.farthest_level = next;
            }
            log::debug!("Stats screen on {}, farthest level now {}", current_level, self.farthest_level);
            return true;
        }

        false
    }

    /// Determines if the timer should reset.
    ///
    /// Loading an earlier level is deliberately not a reset: a runner
    /// reloading after an accidental death must keep their run.
    pub fn should_reset(&self, snapshot: &Snapshot) -> bool {
        snapshot.picked_passport_page.current == PASSPORT_LOAD_GAME
    }

    /// Determines if the timer should start.
    pub fn should_start(&self, snapshot: &Snapshot, mode: RunMode) -> bool {
        let Some(current_level) = snapshot.current_level() else {
            return false;
        };
        if snapshot.level_time.current != 0 {
            return false;
        }

        if mode.is_full_game() {
            current_level == Level::FIRST
        } else {
            current_level != Level::Manor && current_level != Level::TitleAndFirstFmv
        }
    }

    /// Resets values for full game runs.
    pub fn reset_values(&mut self) {
        self.farthest_level = Level::FIRST;
        self.level_times = [0; NUMBER_OF_LEVELS];
    }

    /// Steps the farthest level back after the host undoes a split
    pub fn undo_split(&mut self) {
        if self.farthest_level > Level::FIRST {
            if let Some(previous) = self.farthest_level.previous() {
                self.farthest_level = previous;
            }
        }
    }
}
