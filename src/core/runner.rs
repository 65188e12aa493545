//! Main autosplitter runner

use std::time::Duration;

use parking_lot::Mutex;

use super::events::{ActionCallback, EventHandler, ListenerId, SplitterAction, TimerEvent};
use super::state::AutosplitterState;
use crate::config::SettingsHandle;
use crate::games::{BoxedGame, GameRegistry};
use crate::memory::{ProcessContext, ProcessFinder, SystemProcessFinder};
use crate::Result;

/// Everything the host should act on for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Decisions {
    pub start: bool,
    pub split: bool,
    pub reset: bool,
    pub game_time_paused: bool,
    pub game_time: Option<Duration>,
}

/// Main autosplitter runner: owns the attach lifecycle and drives one game
/// through a tick at a time
pub struct Autosplitter {
    game: BoxedGame,
    finder: Box<dyn ProcessFinder>,
    /// Attached process, if any
    context: Option<ProcessContext>,
    settings: SettingsHandle,
    events: Mutex<EventHandler>,
}

impl Autosplitter {
    /// Create a runner for the given game, attaching through `finder`
    pub fn new(game: BoxedGame, finder: Box<dyn ProcessFinder>, settings: SettingsHandle) -> Self {
        Self {
            game,
            finder,
            context: None,
            settings,
            events: Mutex::new(EventHandler::new()),
        }
    }

    /// Create a runner for a registered game, attaching to real processes
    pub fn from_registry(
        registry: &GameRegistry,
        game_id: &str,
        version: &str,
        settings: SettingsHandle,
    ) -> Result<Self> {
        let game = registry.create_game(game_id, version)?;
        log::info!("Autosplitter created for {} ({})", game.name(), game.version_name());
        Ok(Self::new(game, Box::new(SystemProcessFinder), settings))
    }

    /// Whether a game process is currently attached
    pub fn is_attached(&self) -> bool {
        self.context.is_some()
    }

    /// Register a listener for start/split/reset actions
    pub fn subscribe(&self, callback: ActionCallback) -> ListenerId {
        self.events.lock().subscribe(callback)
    }

    /// Remove a listener registered with [`Autosplitter::subscribe`]
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.events.lock().unsubscribe(id)
    }

    /// Attach if needed and refresh the game snapshot.
    ///
    /// Returns whether the snapshot is valid this tick. A `false` return
    /// means "skip this tick"; the snapshot keeps its last-known state.
    pub fn update(&mut self) -> bool {
        if self.context.as_ref().is_some_and(|context| !context.is_alive()) {
            log::info!("Game process exited");
            self.detach();
        }

        if self.context.is_none() && !self.try_attach() {
            return false;
        }

        let Some(context) = self.context.as_ref() else {
            return false;
        };

        match self.game.refresh(context) {
            Ok(()) => true,
            Err(e) => {
                if context.is_alive() {
                    log::warn!("Skipping tick: {}", e);
                } else {
                    log::info!("Game process exited");
                    self.detach();
                }
                false
            }
        }
    }

    /// One probe for a matching process
    fn try_attach(&mut self) -> bool {
        let Some(info) = self.finder.find_process(self.game.process_names()) else {
            return false;
        };
        let Some(reader) = self.finder.open_process(&info) else {
            log::warn!("Failed to open process {} (pid {})", info.name, info.pid);
            return false;
        };

        let context = ProcessContext::from_boxed(reader, &info);
        if let Err(e) = self.game.init_pointers(&context) {
            log::warn!("Failed to initialize {} (pid {}): {}", info.name, info.pid, e);
            return false;
        }

        // A new session never compares against values from the previous one
        self.game.clear_snapshot();
        log::info!("Attached to {} (pid {})", info.name, info.pid);
        self.context = Some(context);
        true
    }

    /// Drop the attached process, keeping run progress
    pub fn detach(&mut self) {
        if let Some(context) = self.context.take() {
            log::info!("Detached from {} (pid {})", context.process_name, context.process_id);
        }
    }

    /// Run one tick: update, then evaluate start, split, reset, pause and
    /// game time in that order. Returns `None` for a skipped tick.
    pub fn tick(&mut self) -> Option<Decisions> {
        if !self.update() {
            return None;
        }

        let mode = self.settings.read().mode();
        let decisions = Decisions {
            start: self.game.should_start(mode),
            split: self.game.should_split(mode),
            reset: self.game.should_reset(),
            game_time_paused: self.game.is_game_time_paused(),
            game_time: self.game.game_time(mode),
        };
        log::debug!("Tick decisions ({}): {:?}", mode, decisions);

        let mut events = self.events.lock();
        if decisions.start {
            log::info!("Start");
            events.emit(SplitterAction::Start);
        }
        if decisions.split {
            log::info!("Split");
            events.emit(SplitterAction::Split);
        }
        if decisions.reset {
            log::info!("Reset");
            events.emit(SplitterAction::Reset);
        }

        Some(decisions)
    }

    /// Forward a host timer event to the game
    pub fn handle_timer_event(&mut self, event: TimerEvent) {
        log::debug!("Timer event: {:?}", event);
        match event {
            TimerEvent::Started => self.game.on_start(),
            TimerEvent::Reset => self.game.reset_values(),
            TimerEvent::Split => self.game.on_split(),
            TimerEvent::UndoSplit => self.game.on_undo_split(),
        }
    }

    /// Get the current state
    pub fn state(&self) -> AutosplitterState {
        let progress = self.game.progress();
        AutosplitterState {
            game_id: self.game.id().to_string(),
            version: self.game.version_name().to_string(),
            process_attached: self.context.is_some(),
            process_id: self.context.as_ref().map(|context| context.process_id),
            mode: self.settings.read().mode(),
            current_level: progress.current_level,
            farthest_level: progress.farthest_level,
            level_ticks: progress.level_ticks,
        }
    }

    /// Current state as JSON
    pub fn state_json(&self) -> Result<String> {
        self.state().to_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{settings_handle, RunMode, Settings};
    use crate::games::tomb_raider_1::{GameVersion, Level, TombRaider1, PASSPORT_LOAD_GAME};
    use crate::memory::{MockMemoryReader, MockProcessFinder, ProcessInfo};
    use std::sync::Arc;

    const BASE: usize = 0x400000;

    struct Harness {
        finder: MockProcessFinder,
        memory: MockMemoryReader,
        settings: SettingsHandle,
        autosplitter: Autosplitter,
    }

    fn tombati(pid: u32) -> ProcessInfo {
        ProcessInfo {
            pid,
            name: "tombati.exe".to_string(),
            base_address: BASE,
            module_size: 0x80000,
            is_64_bit: false,
        }
    }

    fn harness(mode: RunMode) -> Harness {
        let finder = MockProcessFinder::new();
        let settings = settings_handle(Settings::for_mode(mode));
        let autosplitter = Autosplitter::new(
            Box::new(TombRaider1::new(GameVersion::Ati)),
            Box::new(finder.clone()),
            settings.clone(),
        );
        Harness {
            finder,
            memory: MockMemoryReader::new(),
            settings,
            autosplitter,
        }
    }

    impl Harness {
        fn launch(&mut self, pid: u32) {
            self.memory = MockMemoryReader::new();
            self.finder.add_process(tombati(pid), self.memory.clone());
        }

        fn set(&mut self, level: Level, time: u32, stats: bool, page: u32) {
            self.memory.write_u32(BASE + 0x53C4C, level.id());
            self.memory.write_u32(BASE + 0x5BB08, time);
            self.memory.write_bool(BASE + 0x5A014, stats);
            self.memory.write_u32(BASE + 0x5A080, page);
        }
    }

    #[test]
    fn test_no_process_skips_tick() {
        let mut h = harness(RunMode::FullGame);
        assert!(!h.autosplitter.update());
        assert_eq!(h.autosplitter.tick(), None);
        assert!(!h.autosplitter.is_attached());
    }

    #[test]
    fn test_attach_and_start() {
        let mut h = harness(RunMode::FullGame);
        h.launch(100);
        h.set(Level::Caves, 0, false, 0);

        let decisions = h.autosplitter.tick().unwrap();
        assert!(h.autosplitter.is_attached());
        assert!(decisions.start);
        assert!(!decisions.split);
        assert!(!decisions.reset);
        assert!(!decisions.game_time_paused);
        assert_eq!(decisions.game_time, Some(Duration::ZERO));

        h.set(Level::Caves, 1, false, 0);
        assert!(!h.autosplitter.tick().unwrap().start);
    }

    #[test]
    fn test_unreadable_value_skips_tick_without_detaching() {
        let mut h = harness(RunMode::FullGame);
        h.launch(100);
        h.set(Level::Caves, 10, false, 0);
        assert!(h.autosplitter.update());

        h.memory.unmap(BASE + 0x5BB08);
        assert_eq!(h.autosplitter.tick(), None);
        assert!(h.autosplitter.is_attached());
    }

    #[test]
    fn test_process_exit_detaches_and_reattach_primes() {
        let mut h = harness(RunMode::FullGame);
        h.launch(100);
        h.set(Level::Vilcabamba, 50, false, 0);
        assert!(h.autosplitter.update());

        h.finder.remove_process(100);
        assert!(!h.autosplitter.update());
        assert!(!h.autosplitter.is_attached());

        // New session already sitting on a stats screen: no stale edge
        h.launch(200);
        h.set(Level::Vilcabamba, 900, true, 0);
        let decisions = h.autosplitter.tick().unwrap();
        assert!(!decisions.split);
        assert_eq!(h.autosplitter.state().process_id, Some(200));
    }

    #[test]
    fn test_listeners_receive_actions() {
        let mut h = harness(RunMode::FullGame);
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();
        let id = h.autosplitter.subscribe(Box::new(move |action| sink.lock().push(action)));

        h.launch(100);
        h.set(Level::Caves, 0, false, PASSPORT_LOAD_GAME);
        h.autosplitter.tick();
        assert_eq!(*received.lock(), vec![SplitterAction::Start, SplitterAction::Reset]);

        assert!(h.autosplitter.unsubscribe(id));
        h.autosplitter.tick();
        assert_eq!(received.lock().len(), 2);
    }

    #[test]
    fn test_mode_change_applies_next_tick() {
        let mut h = harness(RunMode::FullGame);
        h.launch(100);
        h.set(Level::Colosseum, 0, false, 0);
        assert!(!h.autosplitter.tick().unwrap().start);

        h.settings.write().set_mode(RunMode::IndividualLevel);
        assert!(h.autosplitter.tick().unwrap().start);
        assert_eq!(h.autosplitter.state().mode, RunMode::IndividualLevel);
    }

    #[test]
    fn test_undo_split_allows_split_again() {
        let mut h = harness(RunMode::FullGame);
        h.launch(100);
        h.set(Level::Vilcabamba, 0, false, 0);
        h.autosplitter.tick();
        h.set(Level::Vilcabamba, 0, true, 0);
        assert!(h.autosplitter.tick().unwrap().split);
        h.autosplitter.handle_timer_event(TimerEvent::Split);

        // Same stats screen again is not a new level
        h.set(Level::Vilcabamba, 0, false, 0);
        h.autosplitter.tick();
        h.set(Level::Vilcabamba, 0, true, 0);
        assert!(!h.autosplitter.tick().unwrap().split);

        h.autosplitter.handle_timer_event(TimerEvent::UndoSplit);
        h.set(Level::Vilcabamba, 0, false, 0);
        h.autosplitter.tick();
        h.set(Level::Vilcabamba, 0, true, 0);
        assert!(h.autosplitter.tick().unwrap().split);
    }

    #[test]
    fn test_timer_reset_clears_progress() {
        let mut h = harness(RunMode::FullGame);
        h.launch(100);
        h.set(Level::Vilcabamba, 0, false, 0);
        h.autosplitter.tick();
        h.set(Level::Vilcabamba, 0, true, 0);
        h.autosplitter.tick();
        assert_eq!(h.autosplitter.state().farthest_level.as_deref(), Some("City of Vilcabamba"));

        h.autosplitter.handle_timer_event(TimerEvent::Reset);
        assert_eq!(h.autosplitter.state().farthest_level.as_deref(), Some("Caves"));
    }

    #[test]
    fn test_state_json_reports_progress() {
        let mut h = harness(RunMode::Deathrun);
        let json = h.autosplitter.state_json().unwrap();
        assert!(json.contains("\"process_attached\":false"));

        h.launch(321);
        h.set(Level::PalaceMidas, 42, false, 0);
        h.autosplitter.tick();

        let state = h.autosplitter.state();
        assert_eq!(state.game_id, "tomb-raider-1");
        assert_eq!(state.version, "TombATI [TR 1996]");
        assert_eq!(state.mode, RunMode::Deathrun);
        assert_eq!(state.current_level.as_deref(), Some("Palace Midas"));
        assert_eq!(state.level_ticks, 42);
    }

    #[test]
    fn test_from_registry_rejects_unknown_version() {
        let mut registry = GameRegistry::new();
        registry.register_builtin();
        let settings = settings_handle(Settings::default());

        assert!(Autosplitter::from_registry(&registry, "tomb-raider-1", "ub", settings.clone()).is_err());
        let splitter = Autosplitter::from_registry(&registry, "tomb-raider-1", "ati", settings).unwrap();
        assert!(!splitter.is_attached());
    }
}
