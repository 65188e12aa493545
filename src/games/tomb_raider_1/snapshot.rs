//! Two-tick view of the game state the decision engine works from

use crate::memory::{Pointer, ProcessContext, Watcher};
use crate::{AutosplitterError, Result};

use super::layout::AddressLayout;
use super::level::Level;

/// Passport page value meaning "load game" was picked
pub const PASSPORT_LOAD_GAME: u32 = 2;

/// One read of every tracked value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Observation {
    pub level: u32,
    pub level_time: u32,
    pub stats_screen_active: bool,
    pub picked_passport_page: u32,
}

impl Observation {
    /// Read every tracked value.
    ///
    /// Fails on the first value that cannot be resolved or read, so callers
    /// never see a half-updated observation.
    pub fn read(context: &ProcessContext, layout: &AddressLayout) -> Result<Self> {
        let reader = context.reader();

        let address = resolve(context, &layout.level, "level")?;
        let level = reader
            .read_u32(address)
            .ok_or(AutosplitterError::ReadFailed { name: "level", address })?;

        let address = resolve(context, &layout.level_time, "level_time")?;
        let level_time = reader
            .read_u32(address)
            .ok_or(AutosplitterError::ReadFailed { name: "level_time", address })?;

        let address = resolve(context, &layout.stats_screen, "stats_screen")?;
        let stats_screen_active = reader
            .read_bool(address)
            .ok_or(AutosplitterError::ReadFailed { name: "stats_screen", address })?;

        let address = resolve(context, &layout.picked_passport_page, "picked_passport_page")?;
        let picked_passport_page = reader.read_u32(address).ok_or(AutosplitterError::ReadFailed {
            name: "picked_passport_page",
            address,
        })?;

        Ok(Self {
            level,
            level_time,
            stats_screen_active,
            picked_passport_page,
        })
    }
}

fn resolve(context: &ProcessContext, pointer: &Pointer, name: &'static str) -> Result<usize> {
    context
        .resolve(pointer)
        .ok_or(AutosplitterError::PointerResolution(name))
}

/// Current and previous values of everything the splitter looks at
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Raw level value; may hold ids outside [`Level`]
    pub level: Watcher<u32>,
    /// Level-local IGT ticks; stops while paused and restarts at 0 on level entry
    pub level_time: Watcher<u32>,
    pub stats_screen_active: Watcher<bool>,
    pub picked_passport_page: Watcher<u32>,
    primed: bool,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a fresh observation.
    ///
    /// The first observation after [`Snapshot::clear`] fills both current and
    /// old, so nothing left over from a previous session produces an edge.
    pub fn apply(&mut self, observation: Observation) {
        if self.primed {
            self.level.update(observation.level);
            self.level_time.update(observation.level_time);
            self.stats_screen_active.update(observation.stats_screen_active);
            self.picked_passport_page.update(observation.picked_passport_page);
        } else {
            self.level.reset(observation.level);
            self.level_time.reset(observation.level_time);
            self.stats_screen_active.reset(observation.stats_screen_active);
            self.picked_passport_page.reset(observation.picked_passport_page);
            self.primed = true;
        }
    }

    /// Forget everything; the next observation primes both buffers
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_primed(&self) -> bool {
        self.primed
    }

    pub fn current_level(&self) -> Option<Level> {
        Level::from_id(self.level.current)
    }

    pub fn old_level(&self) -> Option<Level> {
        Level::from_id(self.level.old)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tomb_raider_1::GameVersion;
    use crate::memory::{MockMemoryReader, ProcessInfo};
    use std::sync::Arc;

    const BASE: usize = 0x400000;

    fn context(reader: MockMemoryReader) -> ProcessContext {
        let info = ProcessInfo {
            pid: 7,
            name: "tombati.exe".to_string(),
            base_address: BASE,
            module_size: 0x100000,
            is_64_bit: false,
        };
        ProcessContext::new(Arc::new(reader), &info)
    }

    fn observation(level: Level, level_time: u32, stats: bool) -> Observation {
        Observation {
            level: level.id(),
            level_time,
            stats_screen_active: stats,
            picked_passport_page: 0,
        }
    }

    #[test]
    fn test_first_observation_primes_both_buffers() {
        let mut snapshot = Snapshot::new();
        snapshot.apply(observation(Level::Cistern, 500, true));

        assert!(snapshot.is_primed());
        assert_eq!(snapshot.old_level(), Some(Level::Cistern));
        assert!(!snapshot.stats_screen_active.rising_edge());
    }

    #[test]
    fn test_following_observations_shift() {
        let mut snapshot = Snapshot::new();
        snapshot.apply(observation(Level::Cistern, 500, false));
        snapshot.apply(observation(Level::Cistern, 501, true));

        assert_eq!(snapshot.level_time.old, 500);
        assert_eq!(snapshot.level_time.current, 501);
        assert!(snapshot.stats_screen_active.rising_edge());
    }

    #[test]
    fn test_clear_prevents_stale_edges() {
        let mut snapshot = Snapshot::new();
        snapshot.apply(observation(Level::Caves, 10, false));
        snapshot.clear();
        snapshot.apply(observation(Level::Caves, 10, true));

        assert!(!snapshot.stats_screen_active.rising_edge());
    }

    #[test]
    fn test_unknown_level_id() {
        let mut snapshot = Snapshot::new();
        snapshot.apply(Observation {
            level: 99,
            ..Default::default()
        });
        assert_eq!(snapshot.current_level(), None);
    }

    #[test]
    fn test_read_observation_from_ati_layout() {
        let layout = GameVersion::Ati.layout();
        let mut reader = MockMemoryReader::new();
        reader.write_u32(BASE + 0x53C4C, Level::Colosseum.id());
        reader.write_u32(BASE + 0x5BB08, 1234);
        reader.write_bool(BASE + 0x5A014, true);
        reader.write_u32(BASE + 0x5A080, PASSPORT_LOAD_GAME);

        let observed = Observation::read(&context(reader), &layout).unwrap();
        assert_eq!(
            observed,
            Observation {
                level: Level::Colosseum.id(),
                level_time: 1234,
                stats_screen_active: true,
                picked_passport_page: PASSPORT_LOAD_GAME,
            }
        );
    }

    #[test]
    fn test_read_observation_reports_missing_value() {
        let layout = GameVersion::Ati.layout();
        let mut reader = MockMemoryReader::new();
        reader.write_u32(BASE + 0x53C4C, Level::Colosseum.id());
        reader.write_u32(BASE + 0x5BB08, 1234);

        let err = Observation::read(&context(reader), &layout).unwrap_err();
        assert!(matches!(
            err,
            AutosplitterError::ReadFailed { name: "stats_screen", .. }
        ));
    }

    #[test]
    fn test_read_observation_reports_unresolved_pointer() {
        let layout = GameVersion::DosBox.layout();
        let reader = MockMemoryReader::new();

        let err = Observation::read(&context(reader), &layout).unwrap_err();
        assert!(matches!(err, AutosplitterError::PointerResolution("level")));
    }
}
