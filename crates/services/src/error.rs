//! Shared error types for the services crate.

use thiserror::Error;

use composition_core::model::Level;

/// Errors emitted by the game session controller and its collaborators.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GameError {
    #[error("game settings unavailable for level {level}")]
    SettingsUnavailable {
        level: Level,
        #[source]
        source: composition_core::Error,
    },
    #[error("question generation failed")]
    QuestionGenerationFailed(#[source] composition_core::Error),
    #[error("session already finished")]
    Finished,
    #[error("no tokio runtime available to drive the countdown")]
    RuntimeUnavailable,
}
