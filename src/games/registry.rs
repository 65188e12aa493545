//! Game registry for creating games by id

use std::collections::HashMap;

use super::BoxedGame;
use crate::{AutosplitterError, Result};

/// Factory for creating game instances
pub trait GameFactory: Send + Sync {
    /// Unique identifier for this game
    fn game_id(&self) -> &'static str;

    /// Create a new instance tracking the given version tag
    fn create(&self, version: &str) -> Result<BoxedGame>;
}

/// Games the host can pick from, keyed by game id
#[derive(Default)]
pub struct GameRegistry {
    factories: HashMap<&'static str, Box<dyn GameFactory>>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a game factory, replacing any factory with the same id
    pub fn register(&mut self, factory: Box<dyn GameFactory>) {
        if self.factories.insert(factory.game_id(), factory).is_some() {
            log::warn!("Replaced an already registered game factory");
        }
    }

    /// Register all built-in games
    pub fn register_builtin(&mut self) {
        use super::TombRaider1Factory;

        self.register(Box::new(TombRaider1Factory));

        log::info!("Registered built-in games: {}", self.game_ids().join(", "));
    }

    /// Registered game ids, sorted
    pub fn game_ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<&'static str> = self.factories.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Create a game instance by ID for the given version tag
    pub fn create_game(&self, game_id: &str, version: &str) -> Result<BoxedGame> {
        let factory = self
            .factories
            .get(game_id)
            .ok_or_else(|| AutosplitterError::GameNotFound(game_id.to_string()))?;
        factory.create(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunMode;
    use crate::games::Game;
    use crate::memory::ProcessContext;
    use std::time::Duration;

    // Test game implementation
    struct TestGame;

    impl Game for TestGame {
        fn id(&self) -> &'static str {
            "test-game"
        }
        fn name(&self) -> &'static str {
            "Test Game"
        }
        fn version_name(&self) -> &'static str {
            "Test Version"
        }
        fn process_names(&self) -> &[&'static str] {
            &["test.exe", "test_alt.exe"]
        }
        fn init_pointers(&mut self, _ctx: &ProcessContext) -> Result<()> {
            Ok(())
        }
        fn refresh(&mut self, _ctx: &ProcessContext) -> Result<()> {
            Ok(())
        }
        fn clear_snapshot(&mut self) {}
        fn should_start(&self, _mode: RunMode) -> bool {
            false
        }
        fn should_split(&mut self, _mode: RunMode) -> bool {
            false
        }
        fn should_reset(&self) -> bool {
            false
        }
        fn game_time(&mut self, _mode: RunMode) -> Option<Duration> {
            None
        }
        fn reset_values(&mut self) {}
    }

    struct TestGameFactory;

    impl GameFactory for TestGameFactory {
        fn game_id(&self) -> &'static str {
            "test-game"
        }
        fn create(&self, version: &str) -> Result<BoxedGame> {
            match version {
                "v1" => Ok(Box::new(TestGame)),
                other => Err(AutosplitterError::UnsupportedVersion(other.to_string())),
            }
        }
    }

    #[test]
    fn test_registry_registration() {
        let mut registry = GameRegistry::new();
        assert!(registry.game_ids().is_empty());

        registry.register(Box::new(TestGameFactory));
        registry.register(Box::new(TestGameFactory));
        assert_eq!(registry.game_ids(), vec!["test-game"]);
    }

    #[test]
    fn test_registry_create_game() {
        let mut registry = GameRegistry::new();
        registry.register(Box::new(TestGameFactory));

        let game = registry.create_game("test-game", "v1").unwrap();
        assert_eq!(game.id(), "test-game");
        assert_eq!(game.name(), "Test Game");

        assert!(matches!(
            registry.create_game("test-game", "v2"),
            Err(AutosplitterError::UnsupportedVersion(_))
        ));
        assert!(matches!(
            registry.create_game("unknown-game", "v1"),
            Err(AutosplitterError::GameNotFound(_))
        ));
    }

    #[test]
    fn test_builtin_registers_tomb_raider() {
        let mut registry = GameRegistry::new();
        registry.register_builtin();

        assert_eq!(registry.game_ids(), vec!["tomb-raider-1"]);

        let game = registry.create_game("tomb-raider-1", "ati").unwrap();
        assert_eq!(game.process_names(), &["tombati.exe"]);
        let game = registry.create_game("tomb-raider-1", "tombub").unwrap();
        assert_eq!(game.process_names(), &["tombub.exe"]);
    }
}
