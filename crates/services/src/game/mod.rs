mod controller;
mod countdown;
mod session;
mod state;

pub use controller::{GameController, TICK_INTERVAL};
pub use countdown::{Countdown, CountdownHandle, CountdownListener};
pub use session::{AnswerOutcome, GamePhase, GameSession};
pub use state::GameState;
