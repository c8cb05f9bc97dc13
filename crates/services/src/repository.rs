//! Settings and question providers consumed by the game controller.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use composition_core::generator::{COUNT_OF_OPTIONS, generate_question};
use composition_core::model::{GameSettings, Level, Question};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Source of game parameters for a difficulty level.
pub trait GameSettingsProvider: Send + Sync {
    /// Settings for one session at `level`.
    ///
    /// # Errors
    ///
    /// Returns `composition_core::Error` if no valid settings exist for the level.
    fn game_settings(&self, level: Level) -> Result<GameSettings, composition_core::Error>;
}

/// Source of questions for a running session.
pub trait QuestionProvider: Send + Sync {
    /// A fresh question whose sum does not exceed `max_sum_value`.
    ///
    /// # Errors
    ///
    /// Returns `composition_core::Error` if no question can be built for the bound.
    fn generate_question(&self, max_sum_value: u32) -> Result<Question, composition_core::Error>;
}

/// Everything a session needs from the outside world.
pub trait GameRepository: GameSettingsProvider + QuestionProvider {}

impl<T: GameSettingsProvider + QuestionProvider> GameRepository for T {}

/// In-process repository backed by the level presets and a random generator.
pub struct LocalGameRepository {
    rng: Mutex<StdRng>,
    overrides: HashMap<Level, GameSettings>,
}

impl LocalGameRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    /// Repository whose question sequence is reproducible.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            overrides: HashMap::new(),
        }
    }

    /// Replace the preset settings for `level`.
    #[must_use]
    pub fn with_settings(mut self, level: Level, settings: GameSettings) -> Self {
        self.overrides.insert(level, settings);
        self
    }
}

impl Default for LocalGameRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSettingsProvider for LocalGameRepository {
    fn game_settings(&self, level: Level) -> Result<GameSettings, composition_core::Error> {
        Ok(self
            .overrides
            .get(&level)
            .copied()
            .unwrap_or_else(|| GameSettings::for_level(level)))
    }
}

impl QuestionProvider for LocalGameRepository {
    fn generate_question(&self, max_sum_value: u32) -> Result<Question, composition_core::Error> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(generate_question(&mut *rng, max_sum_value, COUNT_OF_OPTIONS)?)
    }
}
