#![forbid(unsafe_code)]

pub mod error;
pub mod game;
pub mod repository;
pub mod resources;

pub use composition_core::Clock;

pub use error::GameError;
pub use game::{
    AnswerOutcome, Countdown, CountdownHandle, CountdownListener, GameController, GamePhase,
    GameSession, GameState, TICK_INTERVAL,
};
pub use repository::{GameRepository, GameSettingsProvider, LocalGameRepository, QuestionProvider};
pub use resources::{EnglishResources, TextResources, TextTemplate};
