use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::level::Level;

/// Smallest sum a question can ask for; one part is visible, the other is the answer.
pub const MIN_SUM_VALUE: u32 = 2;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameSettingsError {
    #[error("game time must be > 0 seconds")]
    InvalidGameTime,

    #[error("minimum percent of right answers must be <= 100, got {0}")]
    InvalidMinPercent(u32),

    #[error("max sum value must be >= 2, got {0}")]
    InvalidMaxSumValue(u32),
}

/// Parameters of one game, fixed for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameSettings {
    max_sum_value: u32,
    min_count_of_right_answers: u32,
    min_percent_of_right_answers: u32,
    game_time_in_seconds: u32,
}

impl GameSettings {
    /// Creates validated game settings.
    ///
    /// # Errors
    ///
    /// Returns `GameSettingsError` if the game time is zero, the percent exceeds 100,
    /// or the max sum is too small to split into two positive parts.
    pub fn new(
        max_sum_value: u32,
        min_count_of_right_answers: u32,
        min_percent_of_right_answers: u32,
        game_time_in_seconds: u32,
    ) -> Result<Self, GameSettingsError> {
        if game_time_in_seconds == 0 {
            return Err(GameSettingsError::InvalidGameTime);
        }
        if min_percent_of_right_answers > 100 {
            return Err(GameSettingsError::InvalidMinPercent(
                min_percent_of_right_answers,
            ));
        }
        if max_sum_value < MIN_SUM_VALUE {
            return Err(GameSettingsError::InvalidMaxSumValue(max_sum_value));
        }

        Ok(Self {
            max_sum_value,
            min_count_of_right_answers,
            min_percent_of_right_answers,
            game_time_in_seconds,
        })
    }

    /// Built-in settings for each difficulty level.
    #[must_use]
    pub fn for_level(level: Level) -> Self {
        let (max_sum_value, min_count, min_percent, seconds) = match level {
            Level::Test => (8, 3, 50, 8),
            Level::Easy => (10, 10, 70, 60),
            Level::Normal => (20, 20, 80, 40),
            Level::Hard => (30, 30, 90, 40),
        };
        Self {
            max_sum_value,
            min_count_of_right_answers: min_count,
            min_percent_of_right_answers: min_percent,
            game_time_in_seconds: seconds,
        }
    }

    #[must_use]
    pub fn max_sum_value(&self) -> u32 {
        self.max_sum_value
    }

    #[must_use]
    pub fn min_count_of_right_answers(&self) -> u32 {
        self.min_count_of_right_answers
    }

    #[must_use]
    pub fn min_percent_of_right_answers(&self) -> u32 {
        self.min_percent_of_right_answers
    }

    #[must_use]
    pub fn game_time_in_seconds(&self) -> u32 {
        self.game_time_in_seconds
    }

    /// Total game duration in milliseconds.
    #[must_use]
    pub fn game_time_millis(&self) -> u64 {
        u64::from(self.game_time_in_seconds) * crate::time::MILLIS_IN_SECOND
    }
}
